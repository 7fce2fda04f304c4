//! Input errors reported at the prompt. None of them changes session state.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Invalid history ID {id}: {len} entries recorded.")]
    HistoryIndexOutOfRange { id: usize, len: usize },
    #[error("History entry {id} was stored with credentials masked; type it again.")]
    RedactedHistoryEntry { id: usize },
    #[error("Usage: !N (number from :history)")]
    HistoryIndexUsage,
    #[error("Usage: :{command} NAME")]
    MissingPresetName { command: &'static str },
    #[error("Preset '{0}' not found.")]
    PresetNotFound(String),
    #[error("Nothing to save (no last command).")]
    NothingToSave,
    #[error("No last command.")]
    NoLastCommand,
    #[error("Usage: :set KEY VALUE")]
    SetUsage,
    #[error("Usage: :unset KEY")]
    UnsetUsage,
    #[error("Variable '{0}' is not set.")]
    UnknownVariable(String),
    #[error("Usage: :{command} VALUE")]
    MissingValue { command: &'static str },
    #[error("Unknown command ':{0}'. Try :help")]
    UnknownCommand(String),
}
