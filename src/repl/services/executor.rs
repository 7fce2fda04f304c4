//! # Command Executor
//!
//! Runs the final command line through the host's command interpreter and
//! captures its output. The child is raced against Ctrl-C so an interrupt
//! kills the request and hands control back to the prompt.

use anyhow::{Context, Result};
use encoding_rs::UTF_8;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutput {
    /// Process exit code, `-1` when the process ended without one
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Cancelled by Ctrl-C before it finished
    pub interrupted: bool,
}

impl ExecutionOutput {
    pub fn interrupted() -> Self {
        Self {
            exit_code: -1,
            stderr: "interrupted".to_string(),
            interrupted: true,
            ..Default::default()
        }
    }
}

/// Runs a command string and reports what it printed
#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn execute(&mut self, command: &str) -> Result<ExecutionOutput>;
}

/// Command interpreter used to run command lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostShell {
    /// `sh -c`
    Posix,
    /// `cmd /C`
    Cmd,
}

impl HostShell {
    pub fn current() -> Self {
        if cfg!(windows) {
            HostShell::Cmd
        } else {
            HostShell::Posix
        }
    }
}

/// Executor backed by a real child process
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: HostShell,
}

impl ShellExecutor {
    pub fn new(shell: HostShell) -> Self {
        Self { shell }
    }

    fn build_command(&self, command: &str) -> Command {
        let mut cmd = match self.shell {
            HostShell::Posix => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(command);
                cmd
            }
            HostShell::Cmd => {
                let mut cmd = Command::new("cmd");
                cmd.arg("/C");
                append_verbatim(&mut cmd, command);
                cmd
            }
        };
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new(HostShell::current())
    }
}

// cmd.exe does its own parsing; the line must reach it without extra quoting
#[cfg(windows)]
fn append_verbatim(cmd: &mut Command, command: &str) {
    cmd.raw_arg(command);
}

#[cfg(not(windows))]
fn append_verbatim(cmd: &mut Command, command: &str) {
    cmd.arg(command);
}

impl Executor for ShellExecutor {
    async fn execute(&mut self, command: &str) -> Result<ExecutionOutput> {
        tracing::debug!("executor: spawning via {:?}", self.shell);
        let child = self
            .build_command(command)
            .spawn()
            .with_context(|| format!("failed to start {:?} command interpreter", self.shell))?;

        tokio::select! {
            output = child.wait_with_output() => {
                let output = output.context("failed to collect command output")?;
                let exit_code = output.status.code().unwrap_or(-1);
                tracing::info!("executor: finished with exit code {}", exit_code);
                Ok(ExecutionOutput {
                    exit_code,
                    stdout: decode_text(&output.stdout),
                    stderr: decode_text(&output.stderr),
                    interrupted: false,
                })
            }
            _ = tokio::signal::ctrl_c() => {
                // Dropping the wait future drops the child, which kills it
                tracing::warn!("executor: interrupted by Ctrl-C");
                Ok(ExecutionOutput::interrupted())
            }
        }
    }
}

/// Decode captured bytes as UTF-8, replacing invalid sequences and dropping a BOM
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        tracing::debug!("executor: output contained invalid UTF-8, replaced");
    }
    text.into_owned()
}
