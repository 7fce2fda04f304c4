//! # Controllers Module
//!
//! The session controller owns all mutable state and drives the prompt loop.

pub mod app_controller;

// Re-export main types for convenience
pub use app_controller::{SessionController, PASTE_PROMPT, PROMPT};
