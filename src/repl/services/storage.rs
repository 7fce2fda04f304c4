//! # Session Storage
//!
//! Configuration, history and presets each live in their own JSON file.
//! Loading is forgiving: a missing or corrupt file yields the default value.
//! Saving rewrites the whole file through a temporary file and a rename, and
//! failures are returned to the caller.

use crate::repl::models::{History, Presets, SessionConfig, SessionState};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.json";
pub const HISTORY_FILE: &str = "history.json";
pub const PRESETS_FILE: &str = "presets.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create storage directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize {name}: {source}")]
    Serialize {
        name: &'static str,
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Persistence for the session's mutable state
pub trait SessionStorage {
    /// Load everything, substituting defaults for anything unreadable
    fn load(&self) -> SessionState;

    fn save_config(&self, config: &SessionConfig) -> Result<(), StoreError>;

    fn save_history(&self, history: &History) -> Result<(), StoreError>;

    fn save_presets(&self, presets: &Presets) -> Result<(), StoreError>;
}

/// JSON files in a single directory
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, file: &str) -> T {
        let path = self.path(file);
        match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("storage: {} is corrupt, using defaults: {}", path.display(), e);
                    T::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("storage: {} not found, using defaults", path.display());
                T::default()
            }
            Err(e) => {
                tracing::warn!("storage: cannot read {}, using defaults: {}", path.display(), e);
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, file: &'static str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let json = serde_json::to_string_pretty(value)
            .map_err(|source| StoreError::Serialize { name: file, source })?;

        let path = self.path(file);
        let write_err = |source: std::io::Error| StoreError::Write {
            path: path.clone(),
            source,
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        tracing::debug!("storage: wrote {}", path.display());
        Ok(())
    }
}

impl SessionStorage for JsonStore {
    fn load(&self) -> SessionState {
        SessionState {
            config: self.load_or_default(CONFIG_FILE),
            history: self.load_or_default(HISTORY_FILE),
            presets: self.load_or_default(PRESETS_FILE),
        }
    }

    fn save_config(&self, config: &SessionConfig) -> Result<(), StoreError> {
        self.save(CONFIG_FILE, config)
    }

    fn save_history(&self, history: &History) -> Result<(), StoreError> {
        self.save(HISTORY_FILE, history)
    }

    fn save_presets(&self, presets: &Presets) -> Result<(), StoreError> {
        self.save(PRESETS_FILE, presets)
    }
}
