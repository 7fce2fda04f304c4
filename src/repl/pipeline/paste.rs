//! # Multi-line Paste
//!
//! Commands copied from documentation are often split across lines with a
//! shell continuation marker: `\` (POSIX), `` ` `` (PowerShell) or `^`
//! (`cmd.exe`). Collapsing joins them back into one logical command line.

use regex::Regex;
use std::sync::LazyLock;

/// Line that ends paste mode
pub const PASTE_TERMINATOR: &str = ".";

static CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\\`^]\r?\n").expect("continuation pattern is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// True when `line` closes paste mode
pub fn is_paste_terminator(line: &str) -> bool {
    line.trim() == PASTE_TERMINATOR
}

/// Join pasted lines into one command line
pub fn collapse_pasted_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let text = lines
        .iter()
        .map(|line| line.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    let joined = CONTINUATION.replace_all(&text, " ");
    WHITESPACE_RUN.replace_all(&joined, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_should_join_posix_continuations() {
        let lines = [
            "curl https://x.io/users \\",
            "  -H 'Accept: application/json' \\",
            "  -d '{\"a\": 1}'",
        ];
        assert_eq!(
            collapse_pasted_lines(&lines),
            "curl https://x.io/users -H 'Accept: application/json' -d '{\"a\": 1}'"
        );
    }

    #[test]
    fn collapse_should_join_powershell_and_cmd_continuations() {
        assert_eq!(
            collapse_pasted_lines(&["curl `", "https://x.io ^", "-s"]),
            "curl https://x.io -s"
        );
    }

    #[test]
    fn collapse_should_handle_crlf_line_endings() {
        assert_eq!(collapse_pasted_lines(&["curl \\\r", "https://x.io"]), "curl https://x.io");
    }

    #[test]
    fn collapse_should_join_lines_without_markers() {
        assert_eq!(collapse_pasted_lines(&["curl", "", "  https://x.io  "]), "curl https://x.io");
    }

    #[test]
    fn collapse_should_return_empty_for_blank_paste() {
        let lines: [&str; 0] = [];
        assert_eq!(collapse_pasted_lines(&lines), "");
        assert_eq!(collapse_pasted_lines(&["   "]), "");
    }

    #[test]
    fn terminator_should_ignore_surrounding_whitespace() {
        assert!(is_paste_terminator(" . "));
        assert!(!is_paste_terminator(".."));
    }
}
