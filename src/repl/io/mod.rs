//! # I/O Abstraction Layer
//!
//! Input lines reach the session controller through [`LineSource`] so the
//! prompt loop can be driven from a terminal or from a scripted queue.
//!
//! ```text
//! Production:  SessionController ──▶ TerminalLineSource ──▶ tokio::io::stdin()
//!
//! Testing:     SessionController ──▶ MockLineSource     ──▶ VecDeque<String>
//! ```

use anyhow::Result;

pub mod mock;
pub mod terminal;

pub use mock::MockLineSource;
pub use terminal::TerminalLineSource;

/// Source of prompt input lines
///
/// `Ok(None)` means the input is exhausted: end of file, or Ctrl-C while
/// waiting at the prompt. The controller treats both as a quit request.
#[allow(async_fn_in_trait)]
pub trait LineSource {
    /// Show `prompt` and read one line without its trailing newline
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}
