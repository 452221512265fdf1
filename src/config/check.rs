//! `lint { … }` and `format { … }` sections.

use crate::command::{self, CommandLine};

use super::document::{EntryValue, ParseNode};
use super::{invalid, single_string, ConfigError};

pub const LINT_ENV: &str = "HOOK_LINT_ENABLED";
pub const FORMAT_ENV: &str = "HOOK_PRETTIER_ENABLED";

/// One external check: the environment flag that enables it and the
/// command it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    /// Environment variable that must equal `true` (any case).
    pub env: String,
    pub command: CommandLine,
}

impl CheckConfig {
    /// `npm run lint`, enabled by `HOOK_LINT_ENABLED`.
    pub fn lint() -> Self {
        CheckConfig {
            env: LINT_ENV.to_string(),
            command: CommandLine::new("npm", ["run", "lint"]),
        }
    }

    /// `npm run prettier:check`, enabled by `HOOK_PRETTIER_ENABLED`.
    pub fn format() -> Self {
        CheckConfig {
            env: FORMAT_ENV.to_string(),
            command: CommandLine::new("npm", ["run", "prettier:check"]),
        }
    }
}

/// Apply a check section on top of `defaults`.
pub(super) fn parse_section(
    node: &ParseNode<'_>,
    defaults: CheckConfig,
) -> Result<CheckConfig, ConfigError> {
    if !node.values().is_empty() {
        return Err(invalid(
            node,
            format!("`{}` takes a block, not arguments", node.name()),
        ));
    }
    let Some(children) = node.children() else {
        return Ok(defaults);
    };

    let mut check = defaults;
    for child in children.nodes() {
        match child.name() {
            "env" => check.env = single_string(&child)?,
            "command" => check.command = parse_command(&child)?,
            other => {
                return Err(invalid(
                    &child,
                    format!("unknown setting `{other}` in `{}`", node.name()),
                ))
            }
        }
    }
    Ok(check)
}

/// A command may be written as one shell-style string (`command "npm run lint"`)
/// or as separate arguments (`command "npm" "run" "lint"`).
fn parse_command(node: &ParseNode<'_>) -> Result<CommandLine, ConfigError> {
    let values = node.values();
    let strings: Vec<&str> = values
        .iter()
        .map(|value| match value {
            EntryValue::String(s) => Ok(*s),
            _ => Err(invalid(node, "`command` takes strings")),
        })
        .collect::<Result<_, _>>()?;

    match strings.as_slice() {
        [] => Err(invalid(node, "`command` needs a program")),
        [line] => command::parse(line).map_err(|e| invalid(node, format!("`command`: {e}"))),
        [program, args @ ..] if !program.is_empty() => {
            Ok(CommandLine::new(program, args.iter().copied()))
        }
        _ => Err(invalid(node, "`command` needs a program")),
    }
}
