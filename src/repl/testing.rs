//! Testing infrastructure for session components
//!
//! Provides doubles for the executor and the output writer so the session
//! controller can be exercised without spawning curl or touching a terminal.

use anyhow::Result;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::repl::pipeline::{CODE_MARKER, IP_MARKER, TIME_MARKER};
use crate::repl::services::{ExecutionOutput, Executor};

/// Mock writer that captures output instead of writing to terminal
///
/// Clones share one buffer, so a test can keep a handle while the renderer
/// owns another.
#[derive(Clone, Default)]
pub struct MockWriter {
    output: Arc<Mutex<Vec<u8>>>,
}

impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut output = self
            .output
            .lock()
            .map_err(|_| io::Error::other("mock writer poisoned"))?;
        output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // No-op for mock writer
        Ok(())
    }
}

impl MockWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_output(&self) -> String {
        self.output
            .lock()
            .map(|output| String::from_utf8_lossy(&output).to_string())
            .unwrap_or_default()
    }
}

/// Build stdout the way curl prints it with the marker trailer attached
pub fn curl_stdout(status: u16, headers: &[&str], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {status} OK\r\n");
    for header in headers {
        out.push_str(header);
        out.push_str("\r\n");
    }
    out.push_str("\r\n");
    out.push_str(body);
    out.push_str(&format!(
        "\n{CODE_MARKER}:{status}\n{TIME_MARKER}:0.123456\n{IP_MARKER}:127.0.0.1\n"
    ));
    out
}

/// Successful run printing `stdout`
pub fn successful_output(stdout: impl Into<String>) -> ExecutionOutput {
    ExecutionOutput {
        exit_code: 0,
        stdout: stdout.into(),
        stderr: String::new(),
        interrupted: false,
    }
}

/// Executor double that records commands and replays scripted outputs
///
/// Once the script runs out every call answers `200` with an empty JSON body.
#[derive(Clone, Default)]
pub struct MockExecutor {
    commands: Arc<Mutex<Vec<String>>>,
    outputs: Arc<Mutex<VecDeque<ExecutionOutput>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the output for the next call
    pub fn push_output(&self, output: ExecutionOutput) {
        if let Ok(mut outputs) = self.outputs.lock() {
            outputs.push_back(output);
        }
    }

    /// Commands received so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .map(|commands| commands.clone())
            .unwrap_or_default()
    }
}

impl Executor for MockExecutor {
    async fn execute(&mut self, command: &str) -> Result<ExecutionOutput> {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command.to_string());
        }
        let scripted = self.outputs.lock().ok().and_then(|mut o| o.pop_front());
        Ok(scripted.unwrap_or_else(|| successful_output(curl_stdout(200, &[], "{}"))))
    }
}
