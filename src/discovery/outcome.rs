//! Probe outcome classification
//!
//! Every response (or transport failure) is folded into one of a closed set
//! of [`ProbeOutcome`] variants. Provider-specific body patterns stay behind
//! the [`ResponseClassifier`] trait so nothing downstream inspects raw error
//! text.

use serde_json::Value;
use std::fmt;

/// Maximum bytes of a response body kept in outcome details
pub const DETAIL_LIMIT: usize = 200;

/// Classified result of probing one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The candidate works; carries the extracted content
    Success { payload: String },
    NotFound,
    Unauthorized,
    RateLimited,
    /// Connection refused, DNS failure, timeout, broken body
    TransientNetworkError { detail: String },
    UnknownError { detail: String },
}

/// Fieldless mirror of [`ProbeOutcome`] for counting and matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutcomeKind {
    Success,
    NotFound,
    Unauthorized,
    RateLimited,
    TransientNetworkError,
    UnknownError,
}

impl ProbeOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            ProbeOutcome::Success { .. } => OutcomeKind::Success,
            ProbeOutcome::NotFound => OutcomeKind::NotFound,
            ProbeOutcome::Unauthorized => OutcomeKind::Unauthorized,
            ProbeOutcome::RateLimited => OutcomeKind::RateLimited,
            ProbeOutcome::TransientNetworkError { .. } => OutcomeKind::TransientNetworkError,
            ProbeOutcome::UnknownError { .. } => OutcomeKind::UnknownError,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            ProbeOutcome::Success { payload } => Some(payload),
            _ => None,
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Success { .. } => write!(f, "success"),
            ProbeOutcome::NotFound => write!(f, "not found"),
            ProbeOutcome::Unauthorized => write!(f, "unauthorized (endpoint exists, access denied)"),
            ProbeOutcome::RateLimited => write!(f, "rate limited"),
            ProbeOutcome::TransientNetworkError { detail } => write!(f, "network error: {}", detail),
            ProbeOutcome::UnknownError { detail } => write!(f, "error: {}", detail),
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutcomeKind::Success => "success",
            OutcomeKind::NotFound => "not found",
            OutcomeKind::Unauthorized => "unauthorized",
            OutcomeKind::RateLimited => "rate limited",
            OutcomeKind::TransientNetworkError => "network error",
            OutcomeKind::UnknownError => "unknown error",
        };
        f.write_str(label)
    }
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Provider-specific knowledge needed to classify a reply
pub trait ResponseClassifier: Send + Sync {
    /// Extract the success payload from a parsed 200 body, if the expected
    /// content is present
    fn success_payload(&self, body: &Value) -> Option<String>;

    /// Whether a reply signals an unknown deployment, model or resource
    fn is_not_found(&self, status: u16, body: &str) -> bool;
}

/// Classify a completed HTTP exchange
///
/// A 200 must carry the provider's success marker; a 200 without it is
/// treated as not-found when the body embeds a not-found error, otherwise
/// as an unknown error.
pub fn classify(reply: &HttpReply, classifier: &dyn ResponseClassifier) -> ProbeOutcome {
    if reply.status == 200 {
        let payload = serde_json::from_str::<Value>(&reply.body)
            .ok()
            .and_then(|json| classifier.success_payload(&json));

        return match payload {
            Some(payload) => ProbeOutcome::Success { payload },
            None if classifier.is_not_found(reply.status, &reply.body) => ProbeOutcome::NotFound,
            None => ProbeOutcome::UnknownError {
                detail: format!(
                    "HTTP 200 without expected content: {}",
                    truncate(&reply.body, DETAIL_LIMIT)
                ),
            },
        };
    }

    if reply.status == 404 || classifier.is_not_found(reply.status, &reply.body) {
        return ProbeOutcome::NotFound;
    }

    match reply.status {
        401 | 403 => ProbeOutcome::Unauthorized,
        429 => ProbeOutcome::RateLimited,
        status => ProbeOutcome::UnknownError {
            detail: format!("HTTP {}: {}", status, truncate(&reply.body, DETAIL_LIMIT)),
        },
    }
}

/// Truncate a string at a UTF-8 character boundary
pub fn truncate(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut boundary = max_bytes;
    while boundary > 0 && !s.is_char_boundary(boundary) {
        boundary -= 1;
    }

    &s[..boundary]
}
