//! # Interactive Session
//!
//! Everything behind the `curl>` prompt.
//!
//! - `pipeline`: pure request and response transformations
//! - `models`: configuration, history, presets and response records
//! - `services`: curl execution and JSON persistence
//! - `commands`: input classification and `:` command handlers
//! - `controllers`: the session loop that ties them together
//! - `io` / `views`: input lines and rendered output

pub mod commands;
pub mod controllers;
pub mod errors;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod testing;
pub mod views;

pub use controllers::SessionController;
pub use errors::SessionError;
pub use io::{LineSource, MockLineSource, TerminalLineSource};
pub use models::SessionState;
pub use pipeline::QuoteStyle;
pub use services::{Executor, JsonStore, SessionStorage, ShellExecutor};
pub use views::TerminalRenderer;
