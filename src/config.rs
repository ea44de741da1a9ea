//! Runtime configuration
//!
//! Everything comes from environment variables read once at process start.
//! Credentials are never compiled in; a scenario asks for the key it needs
//! and gets [`DiscoveryError::MissingCredential`] if it is absent.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{DiscoveryError, DiscoveryResult};
use crate::providers::gemini::{DEFAULT_API_BASE, DEFAULT_API_VERSION};

pub const AZURE_API_KEY_VAR: &str = "AZURE_OPENAI_API_KEY";
pub const AZURE_ENDPOINT_VAR: &str = "AZURE_OPENAI_ENDPOINT";
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

const DEFAULT_LOG_FILE: &str = "logs/steve-probe.log";
const DEFAULT_STEVE_URL: &str = "http://localhost:5178";
const DEFAULT_AZURE_DEPLOYMENT: &str = "o4-mini";
const DEFAULT_AZURE_API_VERSION: &str = "2024-12-01-preview";
const DEFAULT_PROMPT: &str = "Hello! This is a connectivity test. Please reply with a brief greeting.";

/// Azure OpenAI settings
#[derive(Debug, Clone, PartialEq)]
pub struct AzureSettings {
    pub api_key: Option<String>,
    /// Known endpoint, required by deployment and version discovery
    pub endpoint: Option<String>,
    /// Deployment held fixed while other axes vary
    pub deployment: String,
    /// API version held fixed while other axes vary
    pub api_version: String,
}

/// Gemini settings
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub api_base: String,
    pub api_version: String,
}

/// Local application health check settings
#[derive(Debug, Clone, PartialEq)]
pub struct HealthSettings {
    pub url: String,
    /// Substrings the root page must contain to count as the right app
    pub markers: Vec<String>,
    pub timeout: Duration,
    pub interval: Duration,
}

/// Candidate list overrides; `None` means use the built-in defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateOverrides {
    pub azure_resources: Option<Vec<String>>,
    pub azure_endpoint_templates: Option<Vec<String>>,
    pub azure_deployments: Option<Vec<String>>,
    pub azure_api_versions: Option<Vec<String>>,
    pub gemini_models: Option<Vec<String>>,
}

/// Complete runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    pub azure: AzureSettings,
    pub gemini: GeminiSettings,
    pub health: HealthSettings,
    pub candidates: CandidateOverrides,
    /// Test prompt sent with every probe
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Per-request timeout for ordinary models
    pub request_timeout: Duration,
    /// Per-request timeout for thinking / reasoning models
    pub thinking_timeout: Duration,
    /// Courtesy pause between candidates
    pub inter_candidate_delay: Duration,
    /// Append-only log file
    pub log_file: PathBuf,
}

impl ProbeConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> DiscoveryResult<Self> {
        tracing::debug!("Loading configuration from environment");
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> DiscoveryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let list = |name: &str| lookup(name).map(|v| split_list(&v));

        let config = Self {
            azure: AzureSettings {
                api_key: get(AZURE_API_KEY_VAR),
                endpoint: get(AZURE_ENDPOINT_VAR),
                deployment: get("AZURE_OPENAI_DEPLOYMENT")
                    .unwrap_or_else(|| DEFAULT_AZURE_DEPLOYMENT.to_string()),
                api_version: get("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
            },
            gemini: GeminiSettings {
                api_key: get(GEMINI_API_KEY_VAR).or_else(|| get("GOOGLE_API_KEY")),
                api_base: get("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                api_version: get("GEMINI_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            },
            health: HealthSettings {
                url: get("STEVE_URL").unwrap_or_else(|| DEFAULT_STEVE_URL.to_string()),
                markers: list("STEVE_MARKERS").unwrap_or_default(),
                timeout: Duration::from_secs(parse_or("HEALTH_TIMEOUT_SECS", get("HEALTH_TIMEOUT_SECS"), 5)?),
                interval: Duration::from_secs(parse_or("HEALTH_INTERVAL_SECS", get("HEALTH_INTERVAL_SECS"), 30)?),
            },
            candidates: CandidateOverrides {
                azure_resources: list("PROBE_AZURE_RESOURCES"),
                azure_endpoint_templates: list("PROBE_AZURE_ENDPOINT_TEMPLATES"),
                azure_deployments: list("PROBE_AZURE_DEPLOYMENTS"),
                azure_api_versions: list("PROBE_AZURE_API_VERSIONS"),
                gemini_models: list("PROBE_GEMINI_MODELS"),
            },
            prompt: get("PROBE_PROMPT").unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            max_tokens: parse_or("PROBE_MAX_TOKENS", get("PROBE_MAX_TOKENS"), 20)?,
            temperature: parse_or("PROBE_TEMPERATURE", get("PROBE_TEMPERATURE"), 0.7)?,
            request_timeout: Duration::from_secs(parse_or("PROBE_TIMEOUT_SECS", get("PROBE_TIMEOUT_SECS"), 15)?),
            thinking_timeout: Duration::from_secs(parse_or(
                "PROBE_THINKING_TIMEOUT_SECS",
                get("PROBE_THINKING_TIMEOUT_SECS"),
                120,
            )?),
            inter_candidate_delay: Duration::from_millis(parse_or("PROBE_DELAY_MS", get("PROBE_DELAY_MS"), 1000)?),
            log_file: get("PROBE_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        };

        tracing::debug!(
            "Configuration loaded: azure key {}, gemini key {}",
            if config.azure.api_key.is_some() { "set" } else { "unset" },
            if config.gemini.api_key.is_some() { "set" } else { "unset" }
        );
        Ok(config)
    }

    /// The Azure key, or an error naming the variable to set
    pub fn azure_api_key(&self) -> DiscoveryResult<&str> {
        self.azure
            .api_key
            .as_deref()
            .ok_or(DiscoveryError::MissingCredential(AZURE_API_KEY_VAR))
    }

    /// The Azure endpoint, or an error naming the variable to set
    pub fn azure_endpoint(&self) -> DiscoveryResult<&str> {
        self.azure
            .endpoint
            .as_deref()
            .ok_or(DiscoveryError::MissingSetting(AZURE_ENDPOINT_VAR))
    }

    /// The Gemini key, or an error naming the variable to set
    pub fn gemini_api_key(&self) -> DiscoveryResult<&str> {
        self.gemini
            .api_key
            .as_deref()
            .ok_or(DiscoveryError::MissingCredential(GEMINI_API_KEY_VAR))
    }
}

/// Split a comma-separated list, dropping blanks
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_or<T: FromStr>(var: &'static str, value: Option<String>, default: T) -> DiscoveryResult<T> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| DiscoveryError::InvalidSetting { var, value: raw }),
    }
}
