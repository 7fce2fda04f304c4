//! Scripted [`LineSource`] for tests.

use anyhow::Result;
use std::collections::VecDeque;

use super::LineSource;

/// Replays queued lines, then reports end of input
#[derive(Debug, Default)]
pub struct MockLineSource {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl MockLineSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for MockLineSource {
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}
