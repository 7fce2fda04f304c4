//! # Quote Normalization
//!
//! `cmd.exe` does not understand single quotes, so commands written for a
//! POSIX shell are rewritten with every single-quoted segment turned into a
//! double-quoted one. Already double-quoted segments pass through untouched.
//!
//! ```text
//!            '                      '
//!   Default ───────▶ InSingleQuote ───────▶ Default      (" inside emitted as \")
//!      │
//!      │ "                             unescaped "
//!      └───────▶ InDoubleQuote ───────────────────▶ Default
//! ```

/// Which quoting dialect the host command interpreter expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// POSIX shells: single quotes are understood, nothing to rewrite
    Native,
    /// Windows `cmd.exe`: only double quotes group arguments
    DoubleOnly,
}

impl QuoteStyle {
    /// Style for the current host, optionally forced to `DoubleOnly`
    pub fn for_host(force_double_only: bool) -> Self {
        if force_double_only || cfg!(windows) {
            QuoteStyle::DoubleOnly
        } else {
            QuoteStyle::Native
        }
    }

    /// Rewrite `command` for this style
    pub fn apply(self, command: &str) -> String {
        match self {
            QuoteStyle::Native => command.to_string(),
            QuoteStyle::DoubleOnly => normalize_quotes(command),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    Default,
    InSingleQuote,
    InDoubleQuote,
}

/// Convert single-quoted segments into double-quoted ones in a single pass.
///
/// An unterminated single-quoted segment is closed at end of input.
pub fn normalize_quotes(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 8);
    let mut state = QuoteState::Default;
    let mut previous: Option<char> = None;

    for ch in input.chars() {
        state = match (state, ch) {
            (QuoteState::Default, '\'') => {
                out.push('"');
                QuoteState::InSingleQuote
            }
            (QuoteState::Default, '"') => {
                out.push('"');
                QuoteState::InDoubleQuote
            }
            (QuoteState::Default, _) => {
                out.push(ch);
                QuoteState::Default
            }
            (QuoteState::InSingleQuote, '\'') => {
                out.push('"');
                QuoteState::Default
            }
            (QuoteState::InSingleQuote, '"') => {
                out.push_str("\\\"");
                QuoteState::InSingleQuote
            }
            (QuoteState::InSingleQuote, _) => {
                out.push(ch);
                QuoteState::InSingleQuote
            }
            (QuoteState::InDoubleQuote, '"') if previous != Some('\\') => {
                out.push('"');
                QuoteState::Default
            }
            (QuoteState::InDoubleQuote, _) => {
                out.push(ch);
                QuoteState::InDoubleQuote
            }
        };
        previous = Some(ch);
    }

    if state == QuoteState::InSingleQuote {
        out.push('"');
    }

    out
}
