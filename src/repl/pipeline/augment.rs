//! # Request Augmentation
//!
//! Adds the session's default headers and the status-marker trailer to a
//! curl command line. Every step looks at the current command text first,
//! so running the augmenter over its own output changes nothing.

use crate::repl::models::DefaultHeaders;
use regex::Regex;
use std::sync::LazyLock;

/// Invocation keyword every executed command starts with
pub const CURL_KEYWORD: &str = "curl";

/// Content type used for payload-carrying requests when no default is set
pub const FALLBACK_CONTENT_TYPE: &str = "application/json";

/// Sentinel tokens curl is asked to print after the response
pub const CODE_MARKER: &str = "__CURL_CODE__";
pub const TIME_MARKER: &str = "__CURL_TIME__";
pub const IP_MARKER: &str = "__CURL_IP__";

/// Flags appended so curl prints headers plus the three marker lines
pub const MARKER_TRAILER: &str = concat!(
    r#" -sS -i -w "\n"#,
    "__CURL_CODE__",
    r#":%{http_code}\n"#,
    "__CURL_TIME__",
    r#":%{time_total}\n"#,
    "__CURL_IP__",
    r#":%{remote_ip}\n""#
);

static AUTHORIZATION_FLAG: LazyLock<Regex> = LazyLock::new(|| header_flag_pattern("authorization"));
static ACCEPT_FLAG: LazyLock<Regex> = LazyLock::new(|| header_flag_pattern("accept"));
static CONTENT_TYPE_FLAG: LazyLock<Regex> = LazyLock::new(|| header_flag_pattern("content-type"));

static MUTATING_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:-X\s*|--request\s+)(?i:POST|PUT|PATCH)\b")
        .expect("method pattern is valid")
});

static DATA_FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:--data|-d|--data-raw|--data-binary|--data-urlencode|--json)\b")
        .expect("data flag pattern is valid")
});

static WRITE_OUT_FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:-w|--write-out)\b").expect("write-out pattern is valid")
});

fn header_flag_pattern(name: &str) -> Regex {
    Regex::new(&format!(
        r#"(?i)(?:^|\s)(?:-H|--header)\s+['"]{}\s*:"#,
        regex::escape(name)
    ))
    .expect("header flag pattern is valid")
}

/// Whether the status-marker trailer ended up in the executed command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerMode {
    /// Trailer appended; the decoder looks for the marker lines
    Injected,
    /// The user asked for their own `--write-out`, no markers to expect
    Absent,
}

/// Result of augmenting one command
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedCommand {
    /// Command with defaults applied, before the trailer (what gets echoed and recorded)
    pub command: String,
    /// Command handed to the executor
    pub executable: String,
    pub markers: MarkerMode,
}

/// Applies [`DefaultHeaders`] to command lines
#[derive(Debug, Clone, Copy)]
pub struct RequestAugmenter<'a> {
    defaults: &'a DefaultHeaders,
}

impl<'a> RequestAugmenter<'a> {
    pub fn new(defaults: &'a DefaultHeaders) -> Self {
        Self { defaults }
    }

    /// Run every augmentation step in order
    pub fn augment(&self, command: &str) -> AugmentedCommand {
        let command = ensure_curl_prefix(&self.with_default_headers(command));
        let (executable, markers) = inject_marker_trailer(&command);
        AugmentedCommand {
            command,
            executable,
            markers,
        }
    }

    /// Append Authorization, Accept and Content-Type flags that are not already present
    pub fn with_default_headers(&self, command: &str) -> String {
        let mut cmd = command.to_string();

        if !self.defaults.authorization.is_empty() && !AUTHORIZATION_FLAG.is_match(&cmd) {
            tracing::debug!("augment: adding default Authorization header");
            push_header(&mut cmd, "Authorization", &self.defaults.authorization);
        }

        if !self.defaults.accept.is_empty() && !ACCEPT_FLAG.is_match(&cmd) {
            tracing::debug!("augment: adding default Accept header");
            push_header(&mut cmd, "Accept", &self.defaults.accept);
        }

        if carries_payload(&cmd) && !CONTENT_TYPE_FLAG.is_match(&cmd) {
            let content_type = if self.defaults.content_type.is_empty() {
                FALLBACK_CONTENT_TYPE
            } else {
                &self.defaults.content_type
            };
            tracing::debug!("augment: adding Content-Type {}", content_type);
            push_header(&mut cmd, "Content-Type", content_type);
        }

        cmd
    }
}

fn push_header(cmd: &mut String, name: &str, value: &str) {
    cmd.push_str(&format!(r#" -H "{name}: {value}""#));
}

/// True when the command uses POST/PUT/PATCH or sends a data payload
pub fn carries_payload(command: &str) -> bool {
    MUTATING_METHOD.is_match(command) || DATA_FLAG.is_match(command)
}

/// Prepend `curl ` unless the command already starts with it
pub fn ensure_curl_prefix(command: &str) -> String {
    let trimmed = command.trim_start();
    let starts_with_curl = trimmed
        .get(..CURL_KEYWORD.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(CURL_KEYWORD));
    if starts_with_curl {
        command.to_string()
    } else {
        format!("{CURL_KEYWORD} {command}")
    }
}

/// Append the marker trailer unless the command already has a write-out format
pub fn inject_marker_trailer(command: &str) -> (String, MarkerMode) {
    if WRITE_OUT_FLAG.is_match(command) {
        tracing::debug!("augment: custom --write-out present, markers skipped");
        (command.to_string(), MarkerMode::Absent)
    } else {
        (format!("{command}{MARKER_TRAILER}"), MarkerMode::Injected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults(authorization: &str, accept: &str, content_type: &str) -> DefaultHeaders {
        DefaultHeaders {
            authorization: authorization.to_string(),
            accept: accept.to_string(),
            content_type: content_type.to_string(),
        }
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn augment_should_add_configured_defaults() {
        let policy = defaults("Bearer abc", "application/json", "");
        let result = RequestAugmenter::new(&policy).augment("curl https://x.io");
        assert_eq!(
            result.command,
            r#"curl https://x.io -H "Authorization: Bearer abc" -H "Accept: application/json""#
        );
        assert_eq!(result.markers, MarkerMode::Injected);
        assert!(result.executable.ends_with(MARKER_TRAILER));
    }

    #[test]
    fn augment_should_skip_headers_user_already_supplied() {
        let policy = defaults("Bearer abc", "application/json", "");
        let cmd = r#"curl -H 'authorization: Basic zzz' --header "ACCEPT: text/plain" https://x.io"#;
        let result = RequestAugmenter::new(&policy).augment(cmd);
        assert_eq!(result.command, cmd);
    }

    #[test]
    fn augment_should_add_content_type_for_mutating_method() {
        let policy = defaults("", "", "");
        let result = RequestAugmenter::new(&policy).augment("curl -X POST https://x.io");
        assert!(result.command.ends_with(r#"-H "Content-Type: application/json""#));
    }

    #[test]
    fn augment_should_add_configured_content_type_for_data_flag() {
        let policy = defaults("", "", "text/plain");
        let result = RequestAugmenter::new(&policy).augment("curl https://x.io -d 'hello'");
        assert!(result.command.ends_with(r#"-H "Content-Type: text/plain""#));
    }

    #[test]
    fn augment_should_not_add_content_type_for_get() {
        let policy = defaults("", "", "text/plain");
        let result = RequestAugmenter::new(&policy).augment("curl -X GET https://x.io");
        assert!(!result.command.contains("Content-Type"));
    }

    #[test]
    fn augment_should_not_treat_proxy_flag_as_method() {
        let policy = defaults("", "", "");
        let result = RequestAugmenter::new(&policy).augment("curl -x post.proxy:80 https://x.io");
        assert!(!result.command.contains("Content-Type"));
    }

    #[test]
    fn augment_should_be_idempotent() {
        let policy = defaults("Bearer abc", "application/json", "");
        let augmenter = RequestAugmenter::new(&policy);
        let once = augmenter.augment("curl -X PUT https://x.io -d '{}'");
        let twice = augmenter.augment(&once.executable);

        assert_eq!(twice.executable, once.executable);
        assert_eq!(count(&twice.executable, "Authorization:"), 1);
        assert_eq!(count(&twice.executable, "Accept:"), 1);
        assert_eq!(count(&twice.executable, "Content-Type:"), 1);
        assert_eq!(count(&twice.executable, CODE_MARKER), 1);
    }

    #[test]
    fn augment_should_prepend_curl_when_missing() {
        let policy = defaults("", "", "");
        let result = RequestAugmenter::new(&policy).augment("https://x.io");
        assert_eq!(result.command, "curl https://x.io");
    }

    #[test]
    fn ensure_prefix_should_accept_mixed_case_keyword() {
        assert_eq!(ensure_curl_prefix("  CURL https://x.io"), "  CURL https://x.io");
        assert_eq!(ensure_curl_prefix(""), "curl ");
    }

    #[test]
    fn trailer_should_be_skipped_when_write_out_present() {
        let (cmd, mode) = inject_marker_trailer(r#"curl -w "%{http_code}" https://x.io"#);
        assert_eq!(cmd, r#"curl -w "%{http_code}" https://x.io"#);
        assert_eq!(mode, MarkerMode::Absent);

        let (_, mode) = inject_marker_trailer("curl --write-out '%{size_download}' https://x.io");
        assert_eq!(mode, MarkerMode::Absent);
    }

    #[test]
    fn trailer_should_contain_all_three_markers_in_order() {
        let code = MARKER_TRAILER.find(CODE_MARKER).unwrap();
        let time = MARKER_TRAILER.find(TIME_MARKER).unwrap();
        let ip = MARKER_TRAILER.find(IP_MARKER).unwrap();
        assert!(code < time && time < ip);
    }
}
