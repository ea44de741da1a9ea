//! Azure-hosted OpenAI chat completions
//!
//! URL shape:
//! `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={version}`
//!
//! The endpoint comes either from an `endpoint` axis or from an
//! `endpoint_template` axis with `{resource}` replaced by the `resource` axis.

use serde_json::{json, Value};
use std::time::Duration;

use super::{axis, require};
use crate::config::ProbeConfig;
use crate::discovery::{Candidate, ProbeTarget, RequestPlan, ResponseClassifier};
use crate::error::DiscoveryResult;

/// Placeholder substituted in endpoint templates
pub const RESOURCE_PLACEHOLDER: &str = "{resource}";

/// Error codes Azure uses for an unknown deployment or resource
const NOT_FOUND_CODES: &[&str] = &["DeploymentNotFound", "NotFound", "ResourceNotFound"];

/// Probe target for Azure OpenAI deployments
#[derive(Debug, Clone)]
pub struct AzureChatTarget {
    api_key: String,
    prompt: String,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
    reasoning_timeout: Duration,
}

impl AzureChatTarget {
    /// Create a target with a specific API key and default request options
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            prompt: "Hello".to_string(),
            max_tokens: 20,
            temperature: 0.7,
            timeout: Duration::from_secs(15),
            reasoning_timeout: Duration::from_secs(120),
        }
    }

    /// Create a target from the loaded configuration
    pub fn from_config(config: &ProbeConfig) -> DiscoveryResult<Self> {
        Ok(Self::new(config.azure_api_key()?)
            .with_prompt(&config.prompt)
            .with_max_tokens(config.max_tokens)
            .with_temperature(config.temperature)
            .with_timeouts(config.request_timeout, config.thinking_timeout))
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the regular and reasoning-deployment timeouts
    pub fn with_timeouts(mut self, timeout: Duration, reasoning_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.reasoning_timeout = reasoning_timeout;
        self
    }

    /// Resolve the endpoint base URL for a candidate
    pub fn endpoint_for(candidate: &Candidate) -> DiscoveryResult<String> {
        let endpoint = match candidate.get(axis::ENDPOINT) {
            Some(endpoint) => endpoint.to_string(),
            None => {
                let template = require(candidate, axis::ENDPOINT_TEMPLATE)?;
                let resource = require(candidate, axis::RESOURCE)?;
                template.replace(RESOURCE_PLACEHOLDER, resource)
            }
        };
        Ok(endpoint.trim_end_matches('/').to_string())
    }

    fn build_body(&self, deployment: &str) -> Value {
        let messages = json!([{ "role": "user", "content": self.prompt }]);

        // Reasoning deployments reject max_tokens and temperature
        if is_reasoning_deployment(deployment) {
            json!({
                "messages": messages,
                "max_completion_tokens": self.max_tokens,
            })
        } else {
            json!({
                "messages": messages,
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
            })
        }
    }
}

/// Reasoning models (o-series, gpt-5.x) take longer and use different
/// token parameters
pub fn is_reasoning_deployment(deployment: &str) -> bool {
    let name = deployment.to_lowercase();
    ["o1", "o3", "o4", "gpt-5"]
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

impl ResponseClassifier for AzureChatTarget {
    fn success_payload(&self, body: &Value) -> Option<String> {
        let choice = body["choices"].as_array()?.first()?;
        let message = choice.get("message")?;

        let content = message["content"].as_str().unwrap_or_default();
        if content.is_empty() {
            let reason = choice["finish_reason"].as_str().unwrap_or("unknown");
            return Some(format!("(empty completion, finish_reason={})", reason));
        }
        Some(content.to_string())
    }

    fn is_not_found(&self, _status: u16, body: &str) -> bool {
        if let Ok(json) = serde_json::from_str::<Value>(body) {
            if let Some(code) = json["error"]["code"].as_str() {
                if NOT_FOUND_CODES.contains(&code) {
                    return true;
                }
            }
        }
        body.contains("DeploymentNotFound")
    }
}

impl ProbeTarget for AzureChatTarget {
    fn name(&self) -> &str {
        "azure"
    }

    fn plan(&self, candidate: &Candidate) -> DiscoveryResult<RequestPlan> {
        let endpoint = Self::endpoint_for(candidate)?;
        let deployment = require(candidate, axis::DEPLOYMENT)?;
        let api_version = require(candidate, axis::API_VERSION)?;

        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint, deployment, api_version
        );
        let timeout = if is_reasoning_deployment(deployment) {
            self.reasoning_timeout
        } else {
            self.timeout
        };

        Ok(RequestPlan::post(url, self.build_body(deployment), timeout)
            .with_header("api-key", &self.api_key)
            .with_header("Content-Type", "application/json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{classify, HttpReply, ProbeOutcome};
    use crate::error::DiscoveryError;

    fn candidate() -> Candidate {
        Candidate::from_pairs([
            (axis::RESOURCE, "steve-openai"),
            (axis::ENDPOINT_TEMPLATE, "https://{resource}.openai.azure.com/"),
            (axis::DEPLOYMENT, "gpt-4o"),
            (axis::API_VERSION, "2024-06-01"),
        ])
    }

    #[test]
    fn test_plan_from_template() {
        let target = AzureChatTarget::new("secret");
        let plan = target.plan(&candidate()).unwrap();

        assert_eq!(
            plan.url,
            "https://steve-openai.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-06-01"
        );
        assert!(plan
            .headers
            .contains(&("api-key".to_string(), "secret".to_string())));

        let body = plan.body.unwrap();
        assert_eq!(body["max_tokens"], 20);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(plan.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_reasoning_deployment_body_and_timeout() {
        let target = AzureChatTarget::new("k");
        let c = Candidate::from_pairs([
            (axis::ENDPOINT, "https://x.cognitiveservices.azure.com"),
            (axis::DEPLOYMENT, "o4-mini"),
            (axis::API_VERSION, "2024-12-01-preview"),
        ]);
        let plan = target.plan(&c).unwrap();
        let body = plan.body.unwrap();

        assert_eq!(body["max_completion_tokens"], 20);
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("temperature").is_none());
        assert_eq!(plan.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_missing_axis_is_an_error() {
        let target = AzureChatTarget::new("k");
        let c = Candidate::from_pairs([(axis::DEPLOYMENT, "gpt-4o")]);

        assert!(matches!(
            target.plan(&c),
            Err(DiscoveryError::MissingAxis(ref name)) if name == axis::ENDPOINT_TEMPLATE
        ));
    }

    #[test]
    fn test_classification() {
        let target = AzureChatTarget::new("k");

        let ok = HttpReply::new(
            200,
            r#"{"choices":[{"message":{"role":"assistant","content":"Hi there"},"finish_reason":"stop"}]}"#,
        );
        assert_eq!(
            classify(&ok, &target),
            ProbeOutcome::Success {
                payload: "Hi there".to_string()
            }
        );

        let empty = HttpReply::new(
            200,
            r#"{"choices":[{"message":{"role":"assistant","content":""},"finish_reason":"length"}]}"#,
        );
        assert_eq!(
            classify(&empty, &target).payload(),
            Some("(empty completion, finish_reason=length)")
        );

        let missing = HttpReply::new(
            400,
            r#"{"error":{"code":"DeploymentNotFound","message":"The API deployment for this resource does not exist."}}"#,
        );
        assert_eq!(classify(&missing, &target), ProbeOutcome::NotFound);

        let denied = HttpReply::new(401, r#"{"error":{"code":"401","message":"Access denied"}}"#);
        assert_eq!(classify(&denied, &target), ProbeOutcome::Unauthorized);
    }
}
