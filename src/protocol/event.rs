use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ToolUse;

/// The event received from Claude Code on stdin for a PostToolUse hook.
///
/// Kept as a raw JSON value so that every field, known or not, is logged
/// verbatim. Field access is best-effort: missing or wrongly-typed fields
/// read as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(Value);

impl Event {
    pub fn new(value: Value) -> Self {
        Event(value)
    }

    /// Parse an event from raw stdin text.
    ///
    /// Any syntactically valid JSON document is accepted, including
    /// non-objects; those simply have no readable fields.
    pub fn parse(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input).map(Event)
    }

    /// The `tool_name` field, if present and a string.
    pub fn tool_name(&self) -> Option<&str> {
        self.0.get("tool_name").and_then(Value::as_str)
    }

    /// The `tool_input` object, if present.
    pub fn tool_input(&self) -> Option<&Value> {
        self.0.get("tool_input")
    }

    /// Typed view of the tool invocation carried by this event.
    pub fn tool_use(&self) -> ToolUse {
        ToolUse::parse(
            self.tool_name().unwrap_or_default(),
            self.tool_input().unwrap_or(&Value::Null),
        )
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Event {
    fn from(value: Value) -> Self {
        Event(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_tool_use_json() -> Value {
        json!({
            "session_id": "sess-123",
            "transcript_path": "/tmp/transcript.json",
            "cwd": "/home/user/project",
            "hook_event_name": "PostToolUse",
            "tool_name": "Write",
            "tool_input": {"file_path": "/home/user/project/src/app.ts", "content": "x"},
            "tool_response": {"success": true}
        })
    }

    #[test]
    fn parse_reads_tool_fields() {
        let event = Event::parse(&post_tool_use_json().to_string()).expect("valid event");
        assert_eq!(event.tool_name(), Some("Write"));
        assert_eq!(
            event.tool_input().and_then(|v| v.get("file_path")),
            Some(&json!("/home/user/project/src/app.ts"))
        );
    }

    #[test]
    fn unknown_fields_survive_serialization() {
        let mut raw = post_tool_use_json();
        raw["brandNewField"] = json!({"nested": [1, 2, 3]});
        let event = Event::parse(&raw.to_string()).unwrap();

        let serialized = serde_json::to_value(&event).unwrap();
        assert_eq!(serialized, raw);
    }

    #[test]
    fn missing_tool_name_reads_as_none() {
        let event = Event::new(json!({"tool_input": {"file_path": "a.ts"}}));
        assert_eq!(event.tool_name(), None);
    }

    #[test]
    fn non_string_tool_name_reads_as_none() {
        let event = Event::new(json!({"tool_name": 7}));
        assert_eq!(event.tool_name(), None);
    }

    #[test]
    fn non_object_event_is_accepted() {
        let event = Event::parse("[1, 2]").expect("arrays are valid JSON");
        assert_eq!(event.tool_name(), None);
        assert!(event.tool_input().is_none());
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(Event::parse("this is not json").is_err());
        assert!(Event::parse("").is_err());
        assert!(Event::parse("{\"tool_name\": ").is_err());
    }
}
