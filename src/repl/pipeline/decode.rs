//! # Response Decoding
//!
//! Turns the captured stdout of one `curl -i` run back into structured
//! fields: the status-marker trailer, the header block and the body.
//! Decoding never fails; anything that cannot be recovered is left absent.

use crate::repl::models::DecodedResponse;
use crate::repl::pipeline::augment::MarkerMode;
use regex::Regex;
use std::sync::LazyLock;

static TRAILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?:\A|\r?\n)",
        r"__CURL_CODE__:([^\r\n]*)\r?\n",
        r"__CURL_TIME__:([^\r\n]*)\r?\n",
        r"__CURL_IP__:([^\r\n]*)",
        r"\s*\z"
    ))
    .expect("trailer pattern is valid")
});

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\r?\n").expect("separator pattern is valid"));

/// Values recovered from the marker trailer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusMarkers {
    pub status_code: Option<u16>,
    pub elapsed_seconds: Option<f64>,
    pub remote_address: Option<String>,
}

/// Decode raw stdout into a [`DecodedResponse`]
pub fn decode_response(raw: &str, markers: MarkerMode) -> DecodedResponse {
    let (remainder, status) = match markers {
        MarkerMode::Injected => split_markers(raw),
        MarkerMode::Absent => (raw, StatusMarkers::default()),
    };
    let (headers_text, body_text) = split_headers_body(remainder);

    tracing::debug!(
        "decode: status={:?} time={:?} header_bytes={} body_bytes={}",
        status.status_code,
        status.elapsed_seconds,
        headers_text.len(),
        body_text.len()
    );

    DecodedResponse {
        headers_text,
        body_text,
        status_code: status.status_code,
        elapsed_seconds: status.elapsed_seconds,
        remote_address: status.remote_address,
    }
}

/// Strip the trailer from the end of `raw`.
///
/// All three marker lines must be present for the trailer to count; a partial
/// trailer is left in the text and every field stays absent.
pub fn split_markers(raw: &str) -> (&str, StatusMarkers) {
    let Some(caps) = TRAILER.captures(raw) else {
        return (raw, StatusMarkers::default());
    };

    let start = caps.get(0).map_or(raw.len(), |m| m.start());
    let remote = caps[3].trim();
    let markers = StatusMarkers {
        status_code: caps[1].trim().parse().ok(),
        elapsed_seconds: caps[2]
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|secs| secs.is_finite()),
        remote_address: (!remote.is_empty()).then(|| remote.to_string()),
    };

    (&raw[..start], markers)
}

/// Split on the first blank line into (header block, body).
///
/// Without a blank line the whole text is body and the header block is empty.
pub fn split_headers_body(text: &str) -> (String, String) {
    match BLANK_LINE.find(text) {
        Some(sep) => (
            text[..sep.start()].trim().to_string(),
            text[sep.end()..].to_string(),
        ),
        None => (String::new(), text.to_string()),
    }
}
