use std::io::Read;
use std::path::{Path, PathBuf};

use crate::checks::{
    self, CheckKind, CheckStatus, CommandRunner, Environment, ProcessEnv, ProcessRunner,
};
use crate::config::{Config, ConfigError};
use crate::event_log::{EventLog, JsonArrayLog, LogError};
use crate::protocol::Event;

/// Environment variable holding the `env_logger` filter for diagnostics.
pub const LOG_ENV: &str = "POST_TOOL_USE_HOOK_LOG";

/// Dotenv file loaded before the check flags are read, relative to the
/// working directory.
pub const DEFAULT_ENV_FILE: &str = ".claude/.env";

/// Options for the `hook` subcommand.
#[derive(Debug, Clone, Default)]
pub struct HookOptions {
    /// Path to the KDL config file.
    pub config: Option<PathBuf>,
    /// Dotenv file to load instead of `.claude/.env`.
    pub env_file: Option<PathBuf>,
    /// Command-line error that made the binary fall back to defaults.
    pub usage_error: Option<String>,
}

/// Errors from the steps the hook runner performs itself.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("failed to read stdin: {0}")]
    Stdin(#[from] std::io::Error),
    #[error("input is not valid JSON: {0}")]
    InvalidInput(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Outcome of handling one event.
#[derive(Debug)]
pub struct HookReport {
    pub logged: Result<(), LogError>,
    pub checks: Vec<(CheckKind, CheckStatus)>,
}

/// Execute the hook subcommand: read one event from stdin, log it, run checks.
///
/// Never fails. Every error is downgraded to a diagnostic record, which is
/// only emitted when `POST_TOOL_USE_HOOK_LOG` asks for it; the host
/// pipeline always sees a successful hook.
pub fn run(options: &HookOptions) {
    init_logging();

    if let Some(e) = &options.usage_error {
        log::warn!("invalid arguments, using defaults: {}", e.trim_end());
    }

    let cwd = std::env::current_dir().unwrap_or_else(|e| {
        log::warn!("cannot determine working directory ({e}), using `.`");
        PathBuf::from(".")
    });

    load_env_file(options.env_file.as_deref(), &cwd);

    let config = match options.config.as_deref().map(load_config) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            log::warn!("{e}; using defaults");
            Config::default()
        }
        None => Config::default(),
    };

    let event = match read_event(std::io::stdin().lock()) {
        Ok(event) => event,
        Err(e) => {
            log::debug!("ignoring event: {e}");
            return;
        }
    };

    let report = handle_event(&event, &config, &cwd, &ProcessEnv, &ProcessRunner);
    log::debug!(
        "hook finished: logged={} checks={:?}",
        report.logged.is_ok(),
        report.checks
    );
}

/// Initialize `env_logger` from [`LOG_ENV`], silent by default.
fn init_logging() {
    let env = env_logger::Env::default().filter_or(LOG_ENV, "off");
    // Already initialized when called twice in one process.
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn load_config(path: &Path) -> Result<Config, HookError> {
    Ok(Config::load(path)?)
}

/// Load variables from the dotenv file without overriding the process
/// environment. A missing or malformed file is ignored.
fn load_env_file(explicit: Option<&Path>, cwd: &Path) {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.join(DEFAULT_ENV_FILE));
    match dotenvy::from_path(&path) {
        Ok(()) => log::debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("ignoring {}: {e}", path.display()),
    }
}

/// Read the whole of `reader` and parse it as a single event.
pub fn read_event(mut reader: impl Read) -> Result<Event, HookError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    Ok(Event::parse(&input)?)
}

/// Log the event, then run whichever checks apply.
///
/// A logging failure does not stop the checks.
pub fn handle_event(
    event: &Event,
    config: &Config,
    cwd: &Path,
    env: &dyn Environment,
    runner: &dyn CommandRunner,
) -> HookReport {
    let event_log = JsonArrayLog::new(config.resolve_log_path(cwd));
    let logged = event_log.append(event);
    if let Err(e) = &logged {
        log::warn!("event not logged: {e}");
    }

    let tool_use = event.tool_use();
    let checks = checks::run_all(&tool_use, config, env, runner, cwd);

    HookReport { logged, checks }
}
