//! # View Layer
//!
//! Rendering of records and session views as plain text panels on a writer.

pub mod ansi_escape_codes;
pub mod terminal_renderer;

pub use terminal_renderer::TerminalRenderer;
