//! # Request Pipeline
//!
//! Pure transformations between a line typed at the prompt and the command
//! handed to the executor, plus the decoding and masking applied to what
//! comes back.
//!
//! ```text
//! input ─▶ expand_variables ─▶ ensure_curl_prefix ─▶ QuoteStyle::apply
//!       ─▶ RequestAugmenter ─▶ executor ─▶ decode_response ─▶ SecretMasker
//! ```

pub mod augment;
pub mod decode;
pub mod masking;
pub mod paste;
pub mod quoting;
pub mod variables;

pub use augment::{
    carries_payload, ensure_curl_prefix, inject_marker_trailer, AugmentedCommand, MarkerMode,
    RequestAugmenter, CODE_MARKER, IP_MARKER, TIME_MARKER,
};
pub use decode::{decode_response, split_headers_body, split_markers, StatusMarkers};
pub use masking::{mask_value, MaskContext, MaskingRule, SecretMasker, DEFAULT_SENSITIVE_KEYS};
pub use paste::{collapse_pasted_lines, is_paste_terminator};
pub use quoting::{normalize_quotes, QuoteStyle};
pub use variables::{expand_variables, unresolved_variables, VariableTable};

use crate::repl::models::SessionConfig;

/// Run every request-side stage over `input`
pub fn prepare_request(input: &str, config: &SessionConfig, quoting: QuoteStyle) -> AugmentedCommand {
    let unresolved = unresolved_variables(input, &config.vars);
    if !unresolved.is_empty() {
        tracing::debug!("pipeline: unresolved variables left verbatim: {:?}", unresolved);
    }

    let expanded = expand_variables(input, &config.vars);
    let prefixed = ensure_curl_prefix(&expanded);
    let normalized = quoting.apply(&prefixed);
    RequestAugmenter::new(&config.defaults).augment(&normalized)
}
