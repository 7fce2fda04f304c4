//! # Models Module
//!
//! Plain data held by the session: configuration, history, presets and the
//! per-request response records.

pub mod config_model;
pub mod history;
pub mod response_model;

use std::collections::BTreeMap;

pub use config_model::{DefaultHeader, DefaultHeaders, SessionConfig, DEFAULT_ACCEPT};
pub use history::{now_timestamp, History, HistoryEntry, HISTORY_DISPLAY_LIMIT};
pub use response_model::{DecodedResponse, HeaderField, ResponseBody, ResponseRecord};

/// Preset name to saved command line
pub type Presets = BTreeMap<String, String>;

/// All state the session reads before and writes after each request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub config: SessionConfig,
    pub history: History,
    pub presets: Presets,
}
