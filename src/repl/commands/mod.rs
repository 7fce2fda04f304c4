//! # Commands
//!
//! Classification of prompt input and the events that `:` commands produce.

pub mod ex_commands;

pub use ex_commands::{ExCommand, ExCommandRegistry};

use crate::repl::errors::SessionError;
use crate::repl::models::DefaultHeader;
use regex::Regex;
use std::sync::LazyLock;

/// Prefix that marks a session command
pub const COMMAND_SIGIL: char = ':';

/// Input that executes the armed preset
pub const EXECUTE_LOADED: &str = "e";

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("url pattern is valid"));

/// What one line of prompt input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    /// Empty line: run the last command again
    RepeatLast,
    /// `!N`
    HistoryRecall(usize),
    /// `:command args`, sigil stripped
    Command(String),
    /// A bare URL wrapped into a minimal fetch
    Url(String),
    /// Anything else, run through the full pipeline
    Request(String),
}

impl InputLine {
    pub fn parse(line: &str) -> Result<Self, SessionError> {
        let line = line.trim_end();
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Ok(InputLine::RepeatLast);
        }
        if let Some(command) = line.strip_prefix(COMMAND_SIGIL) {
            return Ok(InputLine::Command(command.trim().to_string()));
        }
        if let Some(index) = line.strip_prefix('!') {
            return index
                .trim()
                .parse::<usize>()
                .map(InputLine::HistoryRecall)
                .map_err(|_| SessionError::HistoryIndexUsage);
        }
        if BARE_URL.is_match(trimmed) {
            return Ok(InputLine::Url(wrap_url(trimmed)));
        }
        Ok(InputLine::Request(line.to_string()))
    }
}

/// Minimal fetch for a bare URL
pub fn wrap_url(url: &str) -> String {
    format!(r#"curl -s "{}""#, url.trim())
}

/// Events produced by `:` commands and applied by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
    QuitRequested,
    HelpRequested,
    ShowHistoryRequested,
    ShowPresetsRequested,
    ShowDefaultsRequested,
    ShowVariablesRequested,
    PasteModeRequested,
    SavePresetRequested { name: String },
    LoadPresetRequested { name: String },
    DefaultHeaderChangeRequested { header: DefaultHeader, value: String },
    SetVariableRequested { key: String, value: String },
    UnsetVariableRequested { key: String },
}

/// Text of `:help`
pub const HELP_TEXT: &str = "\
Commands:
  (empty line)     Re-run the last request
  !N               Re-run history item N (shown by :history)
  :history         Show recent history
  :save NAME       Save last command as preset NAME
  :load NAME       Load preset NAME (type 'e' to execute)
  :presets         List presets
  :token VALUE     Set default Authorization header (e.g. 'Bearer X')
  :accept VALUE    Set default Accept (e.g. application/json)
  :ctype [VALUE]   Set default Content-Type (blank = auto for JSON)
  :headers         Show current defaults
  :set KEY VALUE   Define a variable (use as {{KEY}} in curl/JSON)
  :unset KEY       Remove a variable
  :vars            Show variables
  :paste           Enter multi-line paste mode (end with a single .)
  :help            Show this help
  :quit / :q       Exit";
