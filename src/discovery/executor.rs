//! Probe execution
//!
//! A [`ProbeTarget`] knows how to turn a candidate into a concrete HTTP
//! request and how to read the provider's replies. [`HttpProbe`] sends that
//! request exactly once and folds whatever happens into a [`ProbeOutcome`].

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;

use super::candidate::Candidate;
use super::outcome::{classify, truncate, HttpReply, ProbeOutcome, ResponseClassifier, DETAIL_LIMIT};
use crate::error::DiscoveryResult;

/// Query parameters whose values are scrubbed from logged URLs
const SECRET_QUERY_PARAMS: &[&str] = &["key", "api-key", "api_key"];

/// Anything that can test one candidate
///
/// Implementations never fail: every problem is an outcome.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, candidate: &Candidate) -> ProbeOutcome;
}

/// A fully resolved request for one candidate
#[derive(Debug, Clone)]
pub struct RequestPlan {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl RequestPlan {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout,
        }
    }

    pub fn post(url: impl Into<String>, body: Value, timeout: Duration) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
            timeout,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// The URL with credential query parameters replaced by `***`
    pub fn redacted_url(&self) -> String {
        redact_url(&self.url)
    }
}

/// Replace the values of credential query parameters in a URL
pub fn redact_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let params: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if SECRET_QUERY_PARAMS.contains(&name) => format!("{}=***", name),
            _ => pair.to_string(),
        })
        .collect();

    format!("{}?{}", base, params.join("&"))
}

/// Render a reqwest error and its causes without the request URL
///
/// reqwest puts the full URL into its messages, and for Gemini that URL
/// carries the key.
pub fn describe_error(e: reqwest::Error) -> String {
    let e = e.without_url();
    let mut detail = e.to_string();
    let mut source = std::error::Error::source(&e);
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    redact_url(&detail)
}

/// Provider adapter: request construction plus reply classification
pub trait ProbeTarget: ResponseClassifier {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Build the request for a candidate
    fn plan(&self, candidate: &Candidate) -> DiscoveryResult<RequestPlan>;
}

/// Sends one HTTP request per candidate and classifies the reply
pub struct HttpProbe<T> {
    client: Client,
    target: T,
}

impl<T: ProbeTarget> HttpProbe<T> {
    pub fn new(target: T) -> Self {
        Self {
            client: Client::new(),
            target,
        }
    }

    /// Share an existing client (connection pool) with other probes
    pub fn with_client(client: Client, target: T) -> Self {
        Self { client, target }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    async fn execute(&self, plan: &RequestPlan) -> Result<HttpReply, reqwest::Error> {
        let mut request = self
            .client
            .request(plan.method.clone(), &plan.url)
            .timeout(plan.timeout);

        for (name, value) in &plan.headers {
            request = request.header(name, value);
        }
        if let Some(ref body) = plan.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpReply { status, body })
    }
}

#[async_trait]
impl<T: ProbeTarget> Probe for HttpProbe<T> {
    async fn probe(&self, candidate: &Candidate) -> ProbeOutcome {
        let plan = match self.target.plan(candidate) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!("[{}] Cannot build request for {}: {}", self.target.name(), candidate, e);
                return ProbeOutcome::UnknownError {
                    detail: e.to_string(),
                };
            }
        };

        tracing::debug!(
            "[{}] {} {} (timeout {:?})",
            self.target.name(),
            plan.method,
            plan.redacted_url(),
            plan.timeout
        );

        match self.execute(&plan).await {
            Ok(reply) => {
                tracing::debug!(
                    "[{}] HTTP {} body: {}",
                    self.target.name(),
                    reply.status,
                    truncate(&reply.body, DETAIL_LIMIT)
                );
                classify(&reply, &self.target)
            }
            Err(e) => transport_outcome(e),
        }
    }
}

/// Map a transport error to an outcome
///
/// Request-building problems (malformed URL, bad header) are configuration
/// mistakes rather than network weather, so they become unknown errors.
fn transport_outcome(e: reqwest::Error) -> ProbeOutcome {
    if e.is_builder() {
        return ProbeOutcome::UnknownError {
            detail: format!("invalid request: {}", describe_error(e)),
        };
    }

    let detail = if e.is_timeout() {
        "timed out".to_string()
    } else if e.is_connect() {
        "connection failed (host unreachable or DNS failure)".to_string()
    } else {
        describe_error(e)
    };

    ProbeOutcome::TransientNetworkError { detail }
}
