// Shared test helpers for integration tests.
// Each run happens in its own temporary working directory so the log file
// and any dotenv file are isolated per test.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

pub const LOG_FILE: &str = "logs/post_tool_use.json";

/// Variables that would leak the developer's own settings into a run.
const SCRUBBED_ENV: &[&str] = &[
    "HOOK_LINT_ENABLED",
    "HOOK_PRETTIER_ENABLED",
    "POST_TOOL_USE_HOOK_LOG",
];

pub fn binary_path() -> PathBuf {
    let path = PathBuf::from(env!("CARGO_BIN_EXE_post-tool-use-hook"));
    assert!(path.exists(), "binary not found at {}", path.display());
    path
}

/// Result of one hook process.
pub struct HookRun {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// A temporary project directory the hook runs in.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Workspace {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn log_path(&self) -> PathBuf {
        self.path().join(LOG_FILE)
    }

    /// Parsed log entries; panics if the log is missing or not a JSON array.
    pub fn log_entries(&self) -> Vec<serde_json::Value> {
        let content = std::fs::read_to_string(self.log_path()).expect("log file should exist");
        serde_json::from_str(&content).expect("log file should hold a JSON array")
    }

    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&path, content).expect("failed to write file");
        path
    }

    pub fn run(&self, stdin_input: &str) -> HookRun {
        self.run_with(stdin_input, &["hook"], &[])
    }

    pub fn run_env(&self, stdin_input: &str, envs: &[(&str, &str)]) -> HookRun {
        self.run_with(stdin_input, &["hook"], envs)
    }

    /// Runs the binary in this workspace with the given args, stdin and
    /// extra environment variables.
    pub fn run_with(&self, stdin_input: &str, args: &[&str], envs: &[(&str, &str)]) -> HookRun {
        let mut cmd = Command::new(binary_path());
        cmd.args(args).current_dir(self.path());
        for name in SCRUBBED_ENV {
            cmd.env_remove(name);
        }
        for (name, value) in envs {
            cmd.env(name, value);
        }
        let output = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .and_then(|mut child| {
                use std::io::{ErrorKind, Write};
                let write_result = child
                    .stdin
                    .take()
                    .unwrap()
                    .write_all(stdin_input.as_bytes());
                if let Err(e) = write_result {
                    if e.kind() != ErrorKind::BrokenPipe {
                        return Err(e);
                    }
                }
                child.wait_with_output()
            })
            .expect("failed to execute binary");

        HookRun {
            stdout: String::from_utf8(output.stdout).expect("stdout not valid UTF-8"),
            stderr: String::from_utf8(output.stderr).expect("stderr not valid UTF-8"),
            exit_code: output.status.code().unwrap_or(-1),
        }
    }
}

pub fn make_input_json(tool_name: &str, tool_input: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "session_id": "sess-e2e-test",
        "transcript_path": "/tmp/transcript.json",
        "cwd": "/tmp/test",
        "hook_event_name": "PostToolUse",
        "tool_name": tool_name,
        "tool_input": tool_input,
        "tool_response": {"success": true}
    })
}

pub fn edit_input_json(tool_name: &str, file_path: &str) -> serde_json::Value {
    make_input_json(tool_name, serde_json::json!({"file_path": file_path}))
}

/// Installs an executable `npm` in `<workspace>/bin` that appends its
/// arguments to `<workspace>/npm-calls.txt`, then exits with `exit_code`.
/// Returns the `PATH` value that puts it first.
#[cfg(unix)]
pub fn install_fake_npm(ws: &Workspace, exit_code: i32) -> String {
    use std::os::unix::fs::PermissionsExt;

    let calls = ws.path().join("npm-calls.txt");
    let script = format!(
        "#!/bin/sh\necho \"$@\" >> '{}'\nexit {exit_code}\n",
        calls.display()
    );
    let npm = ws.write_file("bin/npm", &script);
    std::fs::set_permissions(&npm, std::fs::Permissions::from_mode(0o755))
        .expect("failed to make fake npm executable");

    let original = std::env::var("PATH").unwrap_or_default();
    format!("{}:{original}", ws.path().join("bin").display())
}

/// Argument lines recorded by the fake `npm`, one per invocation.
pub fn npm_calls(ws: &Workspace) -> Vec<String> {
    match std::fs::read_to_string(ws.path().join("npm-calls.txt")) {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}
