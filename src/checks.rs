//! Lint and format checks triggered by JavaScript/TypeScript edits.
//!
//! A check runs only when its environment flag is `true`, the tool was a
//! file-editing tool, and the edited path has a configured extension.
//! Check failures are reported to the caller as values; nothing here exits
//! or panics.

use std::path::Path;
use std::time::Duration;

use crate::command::CommandLine;
use crate::config::{CheckConfig, Config};
use crate::protocol::ToolUse;

/// Errors from running an external check command.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("failed waiting for `{command}`: {source}")]
    Wait {
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` timed out after {}s", .timeout.as_secs())]
    TimedOut { command: String, timeout: Duration },
    #[error("`{command}` exited with {status}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
    },
}

/// Runs an external command to completion or until `timeout` elapses.
pub trait CommandRunner {
    fn run(&self, command: &CommandLine, cwd: &Path, timeout: Duration) -> Result<(), CheckError>;
}

/// Runs commands as real child processes with all output discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &CommandLine, cwd: &Path, timeout: Duration) -> Result<(), CheckError> {
        log::debug!("running `{command}` in {} (timeout {timeout:?})", cwd.display());

        let handle = duct::cmd(&command.program, &command.args)
            .dir(cwd)
            .stdin_null()
            .stdout_null()
            .stderr_null()
            .unchecked()
            .start()
            .map_err(|source| CheckError::Spawn {
                command: command.to_string(),
                source,
            })?;

        match handle.wait_timeout(timeout) {
            Ok(Some(output)) if output.status.success() => Ok(()),
            Ok(Some(output)) => Err(CheckError::Failed {
                command: command.to_string(),
                status: output.status,
            }),
            Ok(None) => {
                if let Err(e) = handle.kill() {
                    log::debug!("failed to kill `{command}`: {e}");
                }
                Err(CheckError::TimedOut {
                    command: command.to_string(),
                    timeout,
                })
            }
            Err(source) => Err(CheckError::Wait {
                command: command.to_string(),
                source,
            }),
        }
    }
}

/// Source of environment variables for check gating.
pub trait Environment {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> Environment for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Whether a flag value enables a check: the literal `true`, any case.
pub fn flag_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// The two checks, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Lint,
    Format,
}

impl CheckKind {
    pub const ALL: [CheckKind; 2] = [CheckKind::Lint, CheckKind::Format];

    pub fn config(self, config: &Config) -> &CheckConfig {
        match self {
            CheckKind::Lint => &config.lint,
            CheckKind::Format => &config.format,
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckKind::Lint => write!(f, "lint"),
            CheckKind::Format => write!(f, "format"),
        }
    }
}

/// Why a check did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    NotAnEdit,
    NoFilePath,
    UnsupportedExtension,
}

/// What happened to one check during a hook run.
#[derive(Debug)]
pub enum CheckStatus {
    Skipped(SkipReason),
    Passed,
    Failed(CheckError),
}

/// Decide whether `kind` should run for this tool invocation.
pub fn gate(
    kind: CheckKind,
    tool_use: &ToolUse,
    config: &Config,
    env: &dyn Environment,
) -> Result<(), SkipReason> {
    let check = kind.config(config);
    if !flag_enabled(env.var(&check.env).as_deref()) {
        return Err(SkipReason::Disabled);
    }
    if !tool_use.is_edit() {
        return Err(SkipReason::NotAnEdit);
    }
    let path = tool_use.edited_path().ok_or(SkipReason::NoFilePath)?;
    if !config.matches_extension(path) {
        return Err(SkipReason::UnsupportedExtension);
    }
    Ok(())
}

/// Run every enabled check in order. One check failing never prevents the
/// next from running.
pub fn run_all(
    tool_use: &ToolUse,
    config: &Config,
    env: &dyn Environment,
    runner: &dyn CommandRunner,
    cwd: &Path,
) -> Vec<(CheckKind, CheckStatus)> {
    CheckKind::ALL
        .into_iter()
        .map(|kind| {
            let status = match gate(kind, tool_use, config, env) {
                Err(reason) => CheckStatus::Skipped(reason),
                Ok(()) => match runner.run(&kind.config(config).command, cwd, config.timeout) {
                    Ok(()) => CheckStatus::Passed,
                    Err(e) => CheckStatus::Failed(e),
                },
            };
            match &status {
                CheckStatus::Skipped(reason) => log::debug!("{kind} check skipped: {reason:?}"),
                CheckStatus::Passed => log::info!("{kind} check passed"),
                CheckStatus::Failed(e) => log::warn!("{kind} check failed: {e}"),
            }
            (kind, status)
        })
        .collect()
}
