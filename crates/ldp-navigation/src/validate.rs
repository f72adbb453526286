//! Preview URL validation
//!
//! The validator is a pure predicate. Normalization lives next to it but is
//! only ever applied by the session controller, after validation.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::NavigationError;
use crate::Result;

/// Prefixes accepted no matter what the restriction policy says.
pub const LOOPBACK_PREFIXES: [&str; 4] = [
    "http://localhost",
    "http://127.1.1.0",
    "localhost",
    "127.1.1.0",
];

pub const REJECT_REASON: &str = "must start with http:// (loopback-restricted)";

const RECOGNIZED_SCHEMES: [&str; 2] = ["http://", "https://"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RestrictionPolicy {
    /// Only loopback addresses are accepted when set
    pub http_only: bool,
}

impl RestrictionPolicy {
    pub fn new(http_only: bool) -> Self {
        Self { http_only }
    }
}

/// Outcome of validating a candidate URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlCheck {
    Accept,
    Reject(String),
}

impl UrlCheck {
    pub fn is_accepted(&self) -> bool {
        matches!(self, UrlCheck::Accept)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            UrlCheck::Accept => None,
            UrlCheck::Reject(reason) => Some(reason),
        }
    }

    /// Message shown inline at the prompt, `None` when accepted.
    pub fn message(&self) -> Option<String> {
        self.reason().map(|reason| {
            format!(
                "URL {reason}. This previewer targets local dev servers; to lift the \
                 restriction turn off 'LDP › Restrict To Http' in settings."
            )
        })
    }
}

/// Decide whether `candidate` may be used as the preview URL.
pub fn validate(candidate: &str, policy: RestrictionPolicy) -> UrlCheck {
    if LOOPBACK_PREFIXES
        .iter()
        .any(|prefix| candidate.starts_with(prefix))
    {
        return UrlCheck::Accept;
    }

    if !policy.http_only && has_scheme(candidate) {
        return UrlCheck::Accept;
    }

    UrlCheck::Reject(REJECT_REASON.to_string())
}

pub fn has_scheme(input: &str) -> bool {
    RECOGNIZED_SCHEMES
        .iter()
        .any(|scheme| input.starts_with(scheme))
}

/// Trim `input` and prepend `http://` when it has no recognized scheme.
///
/// Blank input normalizes to an empty string.
pub fn normalize(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() || has_scheme(input) {
        input.to_string()
    } else {
        format!("http://{input}")
    }
}

/// Validate then normalize, for callers that need a storable URL.
pub fn accept(input: &str, policy: RestrictionPolicy) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(NavigationError::Empty);
    }

    match validate(trimmed, policy) {
        UrlCheck::Accept => Ok(normalize(trimmed)),
        UrlCheck::Reject(reason) => {
            tracing::debug!(url = %trimmed, reason = %reason, "URL rejected");
            Err(NavigationError::Rejected {
                url: trimmed.to_string(),
                reason,
            })
        }
    }
}

/// Byte span of the `host:port` part of `value`, used to pre-select it in
/// the prompt so typing replaces just the address.
pub fn value_selection(value: &str) -> Option<(usize, usize)> {
    let parsed = Url::parse(value).ok()?;
    parsed.host_str()?;

    let start = value.find("://")? + 3;
    let rest = &value[start..];
    let len = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    if len == 0 {
        return None;
    }

    Some((start, start + len))
}
