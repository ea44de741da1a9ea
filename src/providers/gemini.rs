//! Google Gemini adapter for the generativelanguage REST API
//!
//! The credential travels as the `key` query parameter, so every URL built
//! here must go through [`redact_url`](crate::discovery::redact_url) before
//! it is logged.

use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::{axis, require};
use crate::config::ProbeConfig;
use crate::discovery::{redact_url, truncate, Candidate, ProbeTarget, RequestPlan, ResponseClassifier};
use crate::error::{DiscoveryError, DiscoveryResult};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v1beta";

/// Name fragments of models that think before answering
const THINKING_MARKERS: &[&str] = &["2.5-pro", "2.0-pro", "thinking"];

/// A model returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelListing {
    /// Model id without the `models/` prefix
    pub id: String,
    pub display_name: String,
    pub supports_generation: bool,
}

/// Probe target for Gemini `generateContent`
#[derive(Debug, Clone)]
pub struct GeminiTarget {
    api_key: String,
    api_base: String,
    api_version: String,
    prompt: String,
    max_output_tokens: u32,
    temperature: f32,
    timeout: Duration,
    thinking_timeout: Duration,
}

impl GeminiTarget {
    /// Create a target with a specific API key and default request options
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            prompt: "Hello".to_string(),
            max_output_tokens: 50,
            temperature: 0.7,
            timeout: Duration::from_secs(15),
            thinking_timeout: Duration::from_secs(120),
        }
    }

    /// Create a target from the loaded configuration
    pub fn from_config(config: &ProbeConfig) -> DiscoveryResult<Self> {
        Ok(Self::new(config.gemini_api_key()?)
            .with_api_base(&config.gemini.api_base)
            .with_api_version(&config.gemini.api_version)
            .with_prompt(&config.prompt)
            .with_max_output_tokens(config.max_tokens)
            .with_temperature(config.temperature)
            .with_timeouts(config.request_timeout, config.thinking_timeout))
    }

    /// Point at a different API host (proxies, tests)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Version used when a candidate has no `api_version` axis
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the regular and thinking-model timeouts
    pub fn with_timeouts(mut self, timeout: Duration, thinking_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.thinking_timeout = thinking_timeout;
        self
    }

    /// URL of the model listing for the configured version
    pub fn models_url(&self) -> String {
        format!("{}/{}/models?key={}", self.api_base, self.api_version, self.api_key)
    }

    /// List the models visible to this key
    ///
    /// Listing consumes no generation quota, so it doubles as a cheap
    /// credential check.
    pub async fn list_models(&self, client: &Client) -> DiscoveryResult<Vec<ModelListing>> {
        let url = self.models_url();
        tracing::info!("[Gemini] Listing models: {}", redact_url(&url));

        let response = client.get(&url).timeout(self.timeout).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("[Gemini] Model listing failed: {}", status);
            return Err(DiscoveryError::Other(format!(
                "Gemini model listing failed ({}): {}",
                status,
                truncate(&body, 500)
            )));
        }

        let json: Value = serde_json::from_str(&body)?;
        let models = json["models"]
            .as_array()
            .ok_or_else(|| DiscoveryError::Other("no models array in listing".to_string()))?;

        let listings: Vec<ModelListing> = models
            .iter()
            .filter_map(|m| {
                let name = m["name"].as_str()?;
                let id = name.strip_prefix("models/").unwrap_or(name);
                let supports_generation = m["supportedGenerationMethods"]
                    .as_array()
                    .map(|methods| methods.iter().any(|v| v.as_str() == Some("generateContent")))
                    .unwrap_or(false);

                Some(ModelListing {
                    id: id.to_string(),
                    display_name: m["displayName"].as_str().unwrap_or(id).to_string(),
                    supports_generation,
                })
            })
            .collect();

        tracing::info!("[Gemini] {} models listed", listings.len());
        Ok(listings)
    }

    fn build_body(&self) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": self.prompt }] }],
            "generationConfig": {
                "maxOutputTokens": self.max_output_tokens,
                "temperature": self.temperature,
            }
        })
    }
}

/// Whether a model is a thinking variant that needs the long timeout
pub fn is_thinking_model(model: &str) -> bool {
    let name = model.to_lowercase();
    THINKING_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Ids of listed Gemini models that can generate content, in listing order
pub fn generation_models(listings: &[ModelListing]) -> Vec<String> {
    listings
        .iter()
        .filter(|m| m.supports_generation && m.id.to_lowercase().contains("gemini"))
        .map(|m| m.id.clone())
        .collect()
}

impl ResponseClassifier for GeminiTarget {
    fn success_payload(&self, body: &Value) -> Option<String> {
        let parts = body["candidates"]
            .as_array()?
            .first()?
            .pointer("/content/parts")?
            .as_array()?;

        let text: Vec<&str> = parts
            .iter()
            .filter_map(|p| p["text"].as_str())
            .filter(|t| !t.is_empty())
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text.join(""))
        }
    }

    fn is_not_found(&self, _status: u16, body: &str) -> bool {
        serde_json::from_str::<Value>(body)
            .map(|json| json["error"]["status"].as_str() == Some("NOT_FOUND"))
            .unwrap_or(false)
    }
}

impl ProbeTarget for GeminiTarget {
    fn name(&self) -> &str {
        "gemini"
    }

    fn plan(&self, candidate: &Candidate) -> DiscoveryResult<RequestPlan> {
        let model = require(candidate, axis::MODEL)?;
        let version = candidate.get(axis::API_VERSION).unwrap_or(&self.api_version);

        let url = format!(
            "{}/{}/models/{}:generateContent?key={}",
            self.api_base, version, model, self.api_key
        );
        let timeout = if is_thinking_model(model) {
            self.thinking_timeout
        } else {
            self.timeout
        };

        Ok(RequestPlan::post(url, self.build_body(), timeout)
            .with_header("Content-Type", "application/json"))
    }
}
