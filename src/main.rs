use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use post_tool_use_hook::HookOptions;
use std::path::PathBuf;

/// PostToolUse hook for Claude Code: logs tool events and runs lint/format checks.
///
/// Always exits 0 so the host pipeline is never interrupted.
#[derive(Debug, Parser)]
#[command(name = "post-tool-use-hook", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run as a Claude Code PostToolUse hook (reads stdin, default when no subcommand is given)
    Hook(HookArgs),
}

#[derive(Debug, Default, Args)]
struct HookArgs {
    /// Path to the KDL config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Dotenv file to load (default: .claude/.env)
    #[arg(long)]
    env_file: Option<PathBuf>,
}

impl From<HookArgs> for HookOptions {
    fn from(args: HookArgs) -> Self {
        HookOptions {
            config: args.config,
            env_file: args.env_file,
            usage_error: None,
        }
    }
}

fn main() {
    let (args, usage_error) = match Cli::try_parse() {
        Ok(Cli {
            command: Some(Commands::Hook(args)),
        }) => (args, None),
        Ok(Cli { command: None }) => (HookArgs::default(), None),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        // A bad invocation must not lose the event; fall back to defaults.
        Err(e) => (HookArgs::default(), Some(e.render().to_string())),
    };

    std::panic::set_hook(Box::new(|info| {
        log::error!("hook panicked: {info}");
    }));

    let options = HookOptions {
        usage_error,
        ..HookOptions::from(args)
    };
    if std::panic::catch_unwind(|| post_tool_use_hook::run_hook(&options)).is_err() {
        log::error!("hook aborted after a panic");
    }
}
