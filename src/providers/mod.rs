//! Provider adapters
//!
//! Each adapter implements [`ProbeTarget`](crate::discovery::ProbeTarget):
//! it builds the provider's request from a candidate and holds the
//! provider-specific markers used to classify replies.

pub mod azure;
pub mod gemini;

pub use azure::AzureChatTarget;
pub use gemini::{GeminiTarget, ModelListing};

/// Axis names shared by the scenarios and the adapters
pub mod axis {
    pub const RESOURCE: &str = "resource";
    pub const ENDPOINT_TEMPLATE: &str = "endpoint_template";
    pub const ENDPOINT: &str = "endpoint";
    pub const DEPLOYMENT: &str = "deployment";
    pub const API_VERSION: &str = "api_version";
    pub const MODEL: &str = "model";
}

use crate::discovery::Candidate;
use crate::error::{DiscoveryError, DiscoveryResult};

/// Fetch a required axis value from a candidate
pub(crate) fn require<'a>(candidate: &'a Candidate, name: &str) -> DiscoveryResult<&'a str> {
    candidate
        .get(name)
        .ok_or_else(|| DiscoveryError::MissingAxis(name.to_string()))
}
