//! Common test utilities for session integration tests
//!
//! Builds a [`SessionController`] wired to a JSON store in a temporary
//! directory, a scripted executor, scripted input lines and a captured writer.

use curlline::repl::models::{History, HistoryEntry, Presets, SessionConfig};
use curlline::repl::testing::{MockExecutor, MockWriter};
use curlline::{JsonStore, MockLineSource, QuoteStyle, SessionController, SessionStorage, TerminalRenderer};
use std::fs;
use tempfile::TempDir;

pub type TestController = SessionController<MockExecutor, MockLineSource, MockWriter>;

/// A session plus handles to everything it touches
pub struct SessionHarness {
    pub dir: TempDir,
    pub executor: MockExecutor,
    pub writer: MockWriter,
}

impl SessionHarness {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
            executor: MockExecutor::new(),
            writer: MockWriter::new(),
        }
    }

    pub fn store(&self) -> JsonStore {
        JsonStore::new(self.dir.path())
    }

    /// Seed history with `count` requests to `https://x.io/N`
    pub fn with_history(self, count: usize) -> Self {
        let mut history = History::new();
        for i in 1..=count {
            history.push(HistoryEntry::new(
                format!("curl https://x.io/{i}"),
                format!("curl https://x.io/{i} -H \"Accept: application/json\""),
                Some(200),
            ));
        }
        self.store().save_history(&history).expect("seed history");
        self
    }

    pub fn with_config(self, config: &SessionConfig) -> Self {
        self.store().save_config(config).expect("seed config");
        self
    }

    pub fn controller(&self, lines: &[&str]) -> TestController {
        SessionController::new(
            Box::new(self.store()),
            self.executor.clone(),
            MockLineSource::new(lines.iter().copied()),
            TerminalRenderer::new(self.writer.clone(), false),
            QuoteStyle::Native,
        )
    }

    /// Run a whole session over `lines` and return the controller afterwards
    pub async fn run(&self, lines: &[&str]) -> TestController {
        let mut controller = self.controller(lines);
        controller.run().await.expect("session run");
        controller
    }

    pub fn output(&self) -> String {
        self.writer.get_output()
    }

    pub fn commands(&self) -> Vec<String> {
        self.executor.commands()
    }

    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).unwrap_or_default()
    }

    pub fn presets(&self) -> Presets {
        self.store().load().presets
    }
}
