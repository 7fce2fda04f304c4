//! Response model
//!
//! Structured results of one execution: the decoded stdout fields and the
//! masked record handed to the renderer.

use crate::repl::pipeline::SecretMasker;
use crate::repl::services::ExecutionOutput;

/// Fields recovered from the raw stdout of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedResponse {
    /// Header block in original order, trimmed only at its edges
    pub headers_text: String,
    pub body_text: String,
    pub status_code: Option<u16>,
    pub elapsed_seconds: Option<f64>,
    pub remote_address: Option<String>,
}

impl DecodedResponse {
    /// Non-empty header lines in order
    pub fn header_lines(&self) -> impl Iterator<Item = &str> {
        self.headers_text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
    }
}

/// One row of the header table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderField {
    /// A line without a colon, normally the `HTTP/1.1 200 OK` status line
    Status(String),
    Field { name: String, value: String },
}

impl HeaderField {
    /// Parse a header line, masking it first
    pub fn parse_masked(line: &str, masker: &SecretMasker) -> Self {
        let masked = masker.mask(line);
        match masked.split_once(':') {
            Some((name, value)) => HeaderField::Field {
                name: name.trim().to_string(),
                value: value.trim().to_string(),
            },
            None => HeaderField::Status(masked.trim().to_string()),
        }
    }
}

/// How the body is presented
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    /// Parsed as JSON and re-indented
    Json(String),
    Raw(String),
}

impl ResponseBody {
    pub fn from_text(body: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return ResponseBody::Empty;
        }
        match serde_json::from_str::<serde_json::Value>(trimmed)
            .and_then(|value| serde_json::to_string_pretty(&value))
        {
            Ok(pretty) => ResponseBody::Json(pretty),
            Err(_) => ResponseBody::Raw(trimmed.to_string()),
        }
    }
}

/// Everything shown for one execution. Command and headers are already masked.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRecord {
    pub command: String,
    pub executed_at: String,
    pub exit_code: i32,
    pub interrupted: bool,
    pub status_code: Option<u16>,
    pub elapsed_seconds: Option<f64>,
    pub remote_address: Option<String>,
    pub headers: Vec<HeaderField>,
    pub body: ResponseBody,
    pub stderr: String,
}

impl ResponseRecord {
    pub fn new(
        command: &str,
        executed_at: String,
        output: &ExecutionOutput,
        decoded: &DecodedResponse,
        masker: &SecretMasker,
    ) -> Self {
        Self {
            command: masker.mask(command),
            executed_at,
            exit_code: output.exit_code,
            interrupted: output.interrupted,
            status_code: decoded.status_code,
            elapsed_seconds: decoded.elapsed_seconds,
            remote_address: decoded.remote_address.clone(),
            headers: decoded
                .header_lines()
                .map(|line| HeaderField::parse_masked(line, masker))
                .collect(),
            body: ResponseBody::from_text(&decoded.body_text),
            stderr: output.stderr.trim().to_string(),
        }
    }

    /// Exit code zero and not interrupted
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0 && !self.interrupted
    }
}
