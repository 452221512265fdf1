pub mod event;
pub mod tool_use;

pub use event::Event;
pub use tool_use::ToolUse;
