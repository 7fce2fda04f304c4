//! # Secret Masking
//!
//! Partially redacts credentials wherever they appear in text that is about
//! to be shown or stored. The rule set is data: every sensitive key is paired
//! with the syntactic contexts it can appear in, and each pair compiles to
//! one case-insensitive search-and-replace pass.
//!
//! Masking keeps the first and last four characters of long values so a user
//! can still tell two tokens apart:
//!
//! ```text
//! Authorization: Bearer abcdef123456  ──▶  Authorization: Bear***********3456
//! ?api_key=k3y                        ──▶  unchanged (key not configured)
//! ?apikey=k3y                         ──▶  ?apikey=***
//! ```
//!
//! Masked output is a fixed point: masking it again changes nothing.

use regex::{Captures, Regex};

/// Keys masked when no custom set is configured
pub const DEFAULT_SENSITIVE_KEYS: &[&str] = &[
    "authorization",
    "x-api-key",
    "api-key",
    "apikey",
    "token",
    "bearer",
];

/// Values up to this many characters are hidden entirely
const FULL_MASK_LIMIT: usize = 8;

/// Characters kept visible at each end of a longer value
const VISIBLE_EDGE: usize = 4;

const MASK_CHAR: char = '*';

/// Syntactic context a sensitive key can appear in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskContext {
    /// `-H 'key: value'` or `--header "key: value"`, value runs to the closing quote
    HeaderFlag,
    /// `key: value`, value runs to end of line or `;`
    HeaderColon,
    /// `key=value`, value runs to `&` or whitespace
    KeyValue,
}

impl MaskContext {
    /// Pass order applied for every key
    pub const ALL: [MaskContext; 3] = [
        MaskContext::HeaderFlag,
        MaskContext::HeaderColon,
        MaskContext::KeyValue,
    ];
}

/// One compiled (key, context) pass
#[derive(Debug, Clone)]
pub struct MaskingRule {
    key: String,
    context: MaskContext,
    patterns: Vec<Regex>,
}

impl MaskingRule {
    pub fn new(key: &str, context: MaskContext) -> Self {
        let key_pattern = regex::escape(key);
        let sources = match context {
            // No backreferences in `regex`, so each quote style gets its own pattern
            MaskContext::HeaderFlag => vec![
                format!(r#"(?i)(-H|--header)\s+(')({key_pattern})\s*:\s*([^'"]+)'"#),
                format!(r#"(?i)(-H|--header)\s+(")({key_pattern})\s*:\s*([^'"]+)""#),
            ],
            MaskContext::HeaderColon => vec![format!(r"(?i)({key_pattern}\s*:\s*)([^\r\n;]+)")],
            MaskContext::KeyValue => vec![format!(r"(?i)({key_pattern}\s*=\s*)([^&\s]+)")],
        };
        let patterns = sources
            .iter()
            .map(|source| Regex::new(source).expect("escaped key always forms a valid pattern"))
            .collect();

        Self {
            key: key.to_string(),
            context,
            patterns,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn context(&self) -> MaskContext {
        self.context
    }

    /// Apply this pass to `text`
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for pattern in &self.patterns {
            out = match self.context {
                MaskContext::HeaderFlag => pattern
                    .replace_all(&out, |caps: &Captures| {
                        format!(
                            "{} {}{}: {}{}",
                            &caps[1],
                            &caps[2],
                            &caps[3],
                            mask_value(&caps[4]),
                            &caps[2]
                        )
                    })
                    .into_owned(),
                MaskContext::HeaderColon => {
                    let haystack = out.as_str();
                    pattern
                        .replace_all(haystack, |caps: &Captures| mask_colon_value(haystack, caps))
                        .into_owned()
                }
                MaskContext::KeyValue => pattern
                    .replace_all(&out, |caps: &Captures| {
                        format!("{}{}", &caps[1], mask_value(&caps[2]))
                    })
                    .into_owned(),
            };
        }
        out
    }
}

/// Inside a quoted argument the value stops at the closing quote so the
/// rest of the command line stays readable.
fn mask_colon_value(haystack: &str, caps: &Captures) -> String {
    let start = caps.get(0).map_or(0, |m| m.start());
    let value = &caps[2];

    match open_quote_at_end(&haystack[..start]).and_then(|quote| value.find(quote)) {
        Some(end) => format!("{}{}{}", &caps[1], mask_value(&value[..end]), &value[end..]),
        None => format!("{}{}", &caps[1], mask_value(value)),
    }
}

/// Quote character still open at the end of the last line of `prefix`
fn open_quote_at_end(prefix: &str) -> Option<char> {
    let line = prefix.rsplit('\n').next().unwrap_or(prefix);
    let mut open: Option<char> = None;
    let mut previous: Option<char> = None;

    for ch in line.chars() {
        open = match (open, ch) {
            (None, '\'' | '"') => Some(ch),
            (Some('\''), '\'') => None,
            (Some('"'), '"') if previous != Some('\\') => None,
            (state, _) => state,
        };
        previous = Some(ch);
    }

    open
}

/// Ordered set of masking passes
#[derive(Debug, Clone)]
pub struct SecretMasker {
    rules: Vec<MaskingRule>,
}

impl SecretMasker {
    /// Build passes for `keys`, each in every [`MaskContext`]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = keys
            .into_iter()
            .filter(|key| !key.as_ref().trim().is_empty())
            .flat_map(|key| {
                let key = key.as_ref().trim().to_string();
                MaskContext::ALL
                    .into_iter()
                    .map(move |context| MaskingRule::new(&key, context))
            })
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[MaskingRule] {
        &self.rules
    }

    /// Return `text` with every sensitive value partially redacted
    pub fn mask(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }
}

impl Default for SecretMasker {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVE_KEYS)
    }
}

/// Characters that decide quoting on a command line; never starred
fn is_quoting(c: char) -> bool {
    matches!(c, '"' | '\'' | '\\')
}

/// Redact a single value.
///
/// Surrounding whitespace and quote characters are kept in place; the core
/// is fully starred when it is short, otherwise its middle is starred.
/// Quotes and backslashes inside the core also stay where they are, so a
/// masked line has the same quote structure as the original.
pub fn mask_value(raw: &str) -> String {
    let is_edge = |c: char| c.is_whitespace() || c == '"' || c == '\'';
    let core = raw.trim_matches(is_edge);
    if core.is_empty() {
        return raw.to_string();
    }
    let lead = &raw[..raw.len() - raw.trim_start_matches(is_edge).len()];
    let trail = &raw[lead.len() + core.len()..];

    let chars: Vec<char> = core.chars().collect();
    let visible = if chars.len() <= FULL_MASK_LIMIT {
        0
    } else {
        VISIBLE_EDGE
    };
    let masked: String = chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let in_edge = i < visible || i >= chars.len() - visible;
            if in_edge || is_quoting(c) {
                c
            } else {
                MASK_CHAR
            }
        })
        .collect();

    format!("{lead}{masked}{trail}")
}
