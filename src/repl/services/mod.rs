//! # Services Layer
//!
//! The collaborators the session talks to: the process executor that runs
//! commands and the storage that persists configuration, history and presets.

pub mod executor;
pub mod storage;

pub use executor::{decode_text, ExecutionOutput, Executor, HostShell, ShellExecutor};
pub use storage::{JsonStore, SessionStorage, StoreError};
