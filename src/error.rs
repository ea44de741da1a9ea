//! Error types for configuration and setup failures
//!
//! Candidate-level failures never surface here: they are classified into
//! [`ProbeOutcome`](crate::discovery::ProbeOutcome) values instead.

use thiserror::Error;

/// Result alias used throughout the crate
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A credential the selected scenario needs is not configured
    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),

    /// A non-secret setting the selected scenario needs is not configured
    #[error("missing setting: {0} is not set")]
    MissingSetting(&'static str),

    #[error("invalid value for {var}: '{value}'")]
    InvalidSetting { var: &'static str, value: String },

    /// A probe target was handed a candidate without one of its axes
    #[error("candidate has no '{0}' axis")]
    MissingAxis(String),

    /// Holds the error with its URL stripped
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

// Request URLs can carry credentials in their query string
impl From<reqwest::Error> for DiscoveryError {
    fn from(e: reqwest::Error) -> Self {
        DiscoveryError::Http(e.without_url())
    }
}
