//! # History Model
//!
//! One record per executed request, appended in order.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::repl::pipeline::SecretMasker;

/// Timestamp format used in history records and panel titles
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number of entries `:history` shows
pub const HISTORY_DISPLAY_LIMIT: usize = 20;

/// Current local time in [`TIMESTAMP_FORMAT`]
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// A single executed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    /// Line as typed, masked before it is stored
    pub input: String,
    /// Command after expansion and defaults, masked before it is stored
    pub expanded_command: String,
    pub status: Option<u16>,
    /// Masking changed `input`, so the stored text cannot be replayed
    #[serde(default)]
    pub redacted: bool,
    /// Unmasked input for `!N`, held in memory for the current session only
    #[serde(skip)]
    original_input: Option<String>,
}

impl HistoryEntry {
    pub fn new(input: String, expanded_command: String, status: Option<u16>) -> Self {
        Self {
            timestamp: now_timestamp(),
            input,
            expanded_command,
            status,
            redacted: false,
            original_input: None,
        }
    }

    /// Record `input` masked, keeping the original in memory when masking changed it
    pub fn masked(
        input: &str,
        expanded_command: &str,
        status: Option<u16>,
        masker: &SecretMasker,
    ) -> Self {
        let stored = masker.mask(input);
        let redacted = stored != input;
        Self {
            redacted,
            original_input: redacted.then(|| input.to_string()),
            ..Self::new(stored, masker.mask(expanded_command), status)
        }
    }

    /// Text `!N` runs; `None` when only the redacted copy survived a restart
    pub fn replay_input(&self) -> Option<&str> {
        match (&self.original_input, self.redacted) {
            (Some(original), _) => Some(original),
            (None, false) => Some(&self.input),
            (None, true) => None,
        }
    }

    /// Text shown in the history table
    pub fn display_command(&self) -> &str {
        if self.expanded_command.is_empty() {
            &self.input
        } else {
            &self.expanded_command
        }
    }
}

/// Append-only list of executed requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by 1-based id as shown to the user
    pub fn get(&self, id: usize) -> Option<&HistoryEntry> {
        id.checked_sub(1).and_then(|index| self.entries.get(index))
    }

    /// Last `limit` entries paired with their 1-based ids
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = (usize, &HistoryEntry)> {
        let start = self.entries.len().saturating_sub(limit);
        self.entries
            .iter()
            .enumerate()
            .skip(start)
            .map(|(index, entry)| (index + 1, entry))
    }
}
