//! # curlline - Interactive curl Shell
//!
//! A prompt that accepts curl command lines, fills in default headers and
//! `{{variables}}`, runs them through the system `curl` and renders status,
//! headers and body as structured panels. Credentials are masked before
//! anything is shown, logged or written to history.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐  line   ┌───────────────────┐  command  ┌──────────────┐
//! │ LineSource │────────▶│ SessionController │──────────▶│   Executor   │
//! └────────────┘         │                   │◀──────────│ (sh -c curl) │
//!                        │  - SessionState   │  stdout   └──────────────┘
//!                        │  - ExCommands     │
//!                        └───────────────────┘
//!                           │             │
//!                 pipeline  ▼             ▼  records
//!                ┌────────────────┐   ┌──────────────────┐
//!                │ expand, quote, │   │ TerminalRenderer │
//!                │ augment, mask, │   └──────────────────┘
//!                │ decode         │   ┌──────────────────┐
//!                └────────────────┘   │ JsonStore        │
//!                                     └──────────────────┘
//! ```

pub mod cmd_args;
pub mod config;
pub mod repl;

// Re-export main types for easy access
pub use repl::*;
