//! Terminal implementation of [`LineSource`] backed by tokio's stdin.

use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use super::LineSource;

/// Reads prompt lines from standard input
pub struct TerminalLineSource {
    lines: Lines<BufReader<Stdin>>,
}

impl TerminalLineSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for TerminalLineSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for TerminalLineSource {
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{prompt}").context("Failed to write prompt")?;
        stdout.flush().context("Failed to flush prompt")?;

        tokio::select! {
            line = self.lines.next_line() => {
                let line = line.context("Failed to read from stdin")?;
                Ok(line.map(|l| l.trim_end_matches('\r').to_string()))
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("Ctrl-C received at prompt");
                // Move past the echoed ^C
                writeln!(stdout).ok();
                Ok(None)
            }
        }
    }
}
