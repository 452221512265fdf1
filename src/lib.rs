pub mod checks;
pub mod command;
pub mod config;
pub mod event_log;
pub mod protocol;

pub(crate) mod cli;

pub use cli::hook::HookOptions;

/// Run the hook subcommand: read one event from stdin, append it to the log,
/// and run any enabled lint/format checks.
///
/// This is the binary entry point. It exists to bridge the binary crate (`main.rs`)
/// to the library without exposing `cli` internals. Never fails; see
/// [`HookOptions`] for what can be configured.
pub fn run_hook(options: &HookOptions) {
    cli::hook::run(options)
}
