mod check;
mod document;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::command::CommandLine;
use crate::event_log::DEFAULT_LOG_PATH;

use document::{ConfigDocument, EntryValue, ParseNode};

pub use check::CheckConfig;

/// Seconds each external check may run before it is killed.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// File suffixes that make an edit eligible for lint and format checks.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".jsx", ".ts", ".tsx"];

/// Hook configuration, optionally loaded from a KDL file.
///
/// [`Config::default`] reproduces the built-in behavior: log to
/// `logs/post_tool_use.json`, 30 second timeouts, JavaScript/TypeScript
/// files only, `npm run lint` and `npm run prettier:check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Log file location. Relative paths resolve against the working directory.
    pub log_path: PathBuf,
    pub timeout: Duration,
    pub extensions: Vec<String>,
    pub lint: CheckConfig,
    pub format: CheckConfig,
}

/// Errors that can occur when loading or parsing a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid KDL syntax: {0}")]
    ParseError(String),
    #[error("invalid config: {0}")]
    ValidationError(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            lint: CheckConfig::lint(),
            format: CheckConfig::format(),
        }
    }
}

impl Config {
    /// Load a config from a KDL file at the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_document(&ConfigDocument::load(path)?)
    }

    /// Parse a KDL string into a Config.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::from_document(&ConfigDocument::parse(content)?)
    }

    fn from_document(doc: &ConfigDocument) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        for node in doc.root().nodes() {
            match node.name() {
                "log" => config.log_path = PathBuf::from(single_string(&node)?),
                "timeout" => config.timeout = parse_timeout(&node)?,
                "extensions" => config.extensions = parse_extensions(&node)?,
                "lint" => config.lint = check::parse_section(&node, CheckConfig::lint())?,
                "format" => config.format = check::parse_section(&node, CheckConfig::format())?,
                other => {
                    return Err(invalid(&node, format!("unknown setting `{other}`")));
                }
            }
        }
        Ok(config)
    }

    /// The log path, resolved against `cwd` when relative.
    pub fn resolve_log_path(&self, cwd: &Path) -> PathBuf {
        if self.log_path.is_absolute() {
            self.log_path.clone()
        } else {
            cwd.join(&self.log_path)
        }
    }

    /// Whether `path` ends in one of the configured extensions.
    ///
    /// Case-sensitive: `App.TS` does not match `.ts`.
    pub fn matches_extension(&self, path: &str) -> bool {
        self.extensions.iter().any(|ext| path.ends_with(ext.as_str()))
    }
}

fn invalid(node: &ParseNode<'_>, message: impl std::fmt::Display) -> ConfigError {
    ConfigError::ValidationError(format!("line {}: {message}", node.line()))
}

/// Exactly one non-empty string argument.
fn single_string(node: &ParseNode<'_>) -> Result<String, ConfigError> {
    match node.values().as_slice() {
        [EntryValue::String(s)] if !s.is_empty() => Ok(s.to_string()),
        _ => Err(invalid(
            node,
            format!("`{}` takes one non-empty string", node.name()),
        )),
    }
}

fn parse_timeout(node: &ParseNode<'_>) -> Result<Duration, ConfigError> {
    match node.values().as_slice() {
        [EntryValue::Integer(secs)] if *secs > 0 => u64::try_from(*secs)
            .map(Duration::from_secs)
            .map_err(|_| invalid(node, "`timeout` is too large")),
        _ => Err(invalid(
            node,
            "`timeout` takes one positive integer (seconds)",
        )),
    }
}

fn parse_extensions(node: &ParseNode<'_>) -> Result<Vec<String>, ConfigError> {
    let values = node.values();
    if values.is_empty() {
        return Err(invalid(node, "`extensions` needs at least one suffix"));
    }
    values
        .into_iter()
        .map(|value| match value {
            EntryValue::String(s) if !s.is_empty() => Ok(s.to_string()),
            _ => Err(invalid(node, "`extensions` takes non-empty strings")),
        })
        .collect()
}
