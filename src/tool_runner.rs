//! Type-safe tool execution
//!
//! Every child process the bootstrapper starts goes through a [`ToolRunner`].
//! [`ProcessRunner`] is the real one: it spawns the tool in its own process
//! group, registers the PID for signal cleanup and waits for it.
//! [`DryRunRunner`] prints what would run and starts nothing.
//!
//! Runners report exit status; turning a failed status into an error is the
//! caller's decision (see [`ToolOutput::ensure_success`]).

use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus, Stdio};

use tracing::info;

use crate::error::{BootstrapError, Result};
use crate::process_guard::{ChildRegistry, CommandProcessGroup};
use crate::tool_traits::ToolArgs;

/// Seam between the bootstrap sequence and process execution
pub trait ToolRunner {
    fn run(&mut self, tool: &dyn ToolArgs) -> Result<ToolOutput>;
}

/// Output from a tool execution.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Captured standard output (empty unless the tool captures output).
    pub stdout: String,
    /// Captured standard error (empty unless the tool captures output).
    pub stderr: String,
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    /// Terminating signal, if any.
    pub signal: Option<i32>,
    pub success: bool,
    /// Nothing was executed.
    pub dry_run: bool,
}

impl ToolOutput {
    pub fn from_status(status: ExitStatus, stdout: String, stderr: String) -> Self {
        Self {
            stdout,
            stderr,
            exit_code: status.code(),
            signal: status.signal(),
            success: status.success(),
            dry_run: false,
        }
    }

    /// Status to propagate: the exit code, or 128 + signal like a shell.
    pub fn status_code(&self) -> i32 {
        match (self.exit_code, self.signal) {
            (Some(code), _) => code,
            (None, Some(sig)) => 128 + sig,
            (None, None) => 1,
        }
    }

    /// Check if the tool succeeded and return a step failure if not.
    pub fn ensure_success(&self, step: &str) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(BootstrapError::step_failed(step, self.status_code()))
        }
    }
}

/// Runs tools as real child processes.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&mut self, tool: &dyn ToolArgs) -> Result<ToolOutput> {
        let program = tool.program();
        let cli_args = tool.to_cli_args();
        let env_vars = tool.get_env_vars();
        let step = tool.step();

        let env_keys: Vec<_> = env_vars.iter().map(|(k, _)| k.to_string_lossy()).collect();
        info!(
            step = %step,
            command = %tool.command_line(),
            env = ?env_keys,
            "running tool"
        );

        let mut cmd = Command::new(&program);
        cmd.args(&cli_args)
            .envs(env_vars.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .in_new_process_group();
        for key in tool.removed_env_vars() {
            cmd.env_remove(key);
        }
        if tool.captures_output() {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }

        let child = cmd.spawn().map_err(|source| BootstrapError::Spawn {
            step: step.to_string(),
            program: program.display().to_string(),
            source,
        })?;
        let pid = child.id();

        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.register(pid);
        }

        let waited = child.wait_with_output();

        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.unregister(pid);
        }

        let output = waited?;
        let result = ToolOutput::from_status(
            output.status,
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
        );

        if result.success {
            info!(step = %step, "tool finished");
        } else {
            info!(step = %step, code = result.status_code(), "tool failed");
        }

        Ok(result)
    }
}

/// Records each command instead of running it.
///
/// The caller prints the plan; every output is marked `dry_run`.
#[derive(Debug, Default)]
pub struct DryRunRunner {
    /// Command lines that would have run, in order
    pub planned: Vec<String>,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ToolRunner for DryRunRunner {
    fn run(&mut self, tool: &dyn ToolArgs) -> Result<ToolOutput> {
        let line = tool.command_line();
        info!(step = %tool.step(), command = %line, "dry run: skipping");
        self.planned.push(line);

        Ok(ToolOutput {
            exit_code: Some(0),
            success: true,
            dry_run: true,
            ..ToolOutput::default()
        })
    }
}
