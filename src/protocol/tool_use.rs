use serde_json::Value;

/// Typed representation of a tool invocation, parsed at the protocol boundary.
///
/// Only the file-editing tools carry fields this hook cares about; every
/// other tool collapses into [`ToolUse::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolUse {
    /// Targeted string replacement in one file.
    Edit { file_path: Option<String> },
    /// Several edits applied to one file.
    MultiEdit { file_path: Option<String> },
    /// Whole-file write.
    Write { file_path: Option<String> },
    /// Jupyter notebook cell edit.
    NotebookEdit { file_path: Option<String> },
    /// Any tool that does not edit files.
    Other { tool_name: String },
}

impl ToolUse {
    /// Parse from raw event fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use post_tool_use_hook::protocol::ToolUse;
    ///
    /// let tool_use = ToolUse::parse("Write", &serde_json::json!({"file_path": "src/app.ts"}));
    /// assert_eq!(tool_use.edited_path(), Some("src/app.ts"));
    ///
    /// let tool_use = ToolUse::parse("Bash", &serde_json::json!({"command": "ls"}));
    /// assert_eq!(tool_use.edited_path(), None);
    /// ```
    pub fn parse(tool_name: &str, tool_input: &Value) -> Self {
        match tool_name {
            "Edit" => ToolUse::Edit {
                file_path: extract_string(tool_input, "file_path"),
            },
            "MultiEdit" => ToolUse::MultiEdit {
                file_path: extract_string(tool_input, "file_path"),
            },
            "Write" => ToolUse::Write {
                file_path: extract_string(tool_input, "file_path"),
            },
            "NotebookEdit" => ToolUse::NotebookEdit {
                file_path: extract_string(tool_input, "file_path"),
            },
            _ => ToolUse::Other {
                tool_name: tool_name.to_string(),
            },
        }
    }

    /// Whether this invocation was one of the file-editing tools.
    pub fn is_edit(&self) -> bool {
        !matches!(self, ToolUse::Other { .. })
    }

    /// The edited file, for editing tools that supplied a non-empty path.
    pub fn edited_path(&self) -> Option<&str> {
        match self {
            ToolUse::Edit { file_path }
            | ToolUse::MultiEdit { file_path }
            | ToolUse::Write { file_path }
            | ToolUse::NotebookEdit { file_path } => file_path.as_deref(),
            ToolUse::Other { .. } => None,
        }
    }
}

/// Extract a non-empty string field from JSON.
fn extract_string(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}
