//! TestWorld pattern for declarative CLI test setup.
//!
//! Each world owns a temp directory used as `AGCONSOLE_PATH`, so the CLI
//! reads `config.toml`, task files and recordings from there.

use agconsole_providers::RawEvent;
use agconsole_runtime::{BotConfig, Config};
use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::events::to_jsonl;

/// Isolated environment for running the `agconsole` binary.
///
/// # Example
/// ```no_run
/// use agconsole_testing::TestWorld;
/// use agconsole_testing::events::chunk;
///
/// let world = TestWorld::new().with_recording("hello.jsonl", &[chunk("Hi")]);
/// let result = world.run(&["replay", "hello.jsonl"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    config: Config,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            temp_dir,
            config: Config::default(),
            env_vars: HashMap::new(),
        }
    }

    /// Data directory holding `config.toml`
    pub fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir().join("config.toml")
    }

    /// Register an agent id with its display name
    pub fn with_agent(mut self, agent_id: &str, name: &str) -> Self {
        self.config
            .agents
            .insert(agent_id.to_string(), name.to_string());
        self.save_config();
        self
    }

    pub fn with_bot(mut self, bot: BotConfig) -> Self {
        self.config.set_bot(bot);
        self.save_config();
        self
    }

    pub fn with_default_bot(mut self, bot_name: &str) -> Self {
        self.config.default_bot = Some(bot_name.to_string());
        self.save_config();
        self
    }

    /// Write a JSONL recording relative to the data directory
    pub fn with_recording(self, name: &str, events: &[RawEvent]) -> Self {
        self.write_file(name, &to_jsonl(events));
        self
    }

    /// Write any file relative to the data directory
    pub fn with_file(self, name: &str, content: &str) -> Self {
        self.write_file(name, content);
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    fn write_file(&self, name: &str, content: &str) {
        let path = self.data_dir().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
    }

    fn save_config(&self) {
        self.config
            .save_to(&self.config_path())
            .expect("Failed to write config");
    }

    /// Configure a CLI command with this environment's settings.
    ///
    /// The caller provides the base command (e.g. from `cargo_bin_cmd!("agconsole")`).
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.current_dir(self.data_dir())
            .env("AGCONSOLE_PATH", self.data_dir())
            .env_remove("BOT_NAME")
            .env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Run the `agconsole` binary with `args` and capture its output
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        self.run_with_stdin(args, "")
    }

    #[allow(deprecated)]
    pub fn run_with_stdin(&self, args: &[&str], stdin: &str) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("agconsole")
            .map_err(|e| anyhow::anyhow!("Failed to find agconsole binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args).write_stdin(stdin.to_string());

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
