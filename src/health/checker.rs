//! One-shot health checks

use reqwest::Client;
use std::fmt;
use std::time::{Duration, Instant};

use crate::config::{HealthSettings, ProbeConfig};
use crate::discovery::{describe_error, redact_url};
use crate::providers::GeminiTarget;

/// Result of checking one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    /// Something answered 200 but the page lacks the expected markers
    WrongApplication { missing: Vec<String> },
    RateLimited,
    HttpError(u16),
    Unreachable(String),
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "HEALTHY"),
            HealthStatus::WrongApplication { missing } => {
                write!(f, "RESPONDING, but page lacks: {}", missing.join(", "))
            }
            HealthStatus::RateLimited => write!(f, "RATE LIMITED"),
            HealthStatus::HttpError(status) => write!(f, "HTTP {}", status),
            HealthStatus::Unreachable(detail) => write!(f, "UNREACHABLE - {}", detail),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthReport {
    pub service: String,
    pub status: HealthStatus,
    pub elapsed: Duration,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Checks the local application and, when a key is configured, the
/// Gemini API
pub struct HealthChecker {
    client: Client,
    settings: HealthSettings,
    gemini: Option<GeminiTarget>,
}

impl HealthChecker {
    pub fn new(settings: HealthSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
            gemini: None,
        }
    }

    /// Build from configuration; the Gemini check is enabled only when a
    /// Gemini key is set
    pub fn from_config(config: &ProbeConfig) -> Self {
        let gemini = GeminiTarget::from_config(config).ok();
        Self {
            client: Client::new(),
            settings: config.health.clone(),
            gemini,
        }
    }

    pub fn with_gemini(mut self, target: GeminiTarget) -> Self {
        self.gemini = Some(target);
        self
    }

    pub fn url(&self) -> &str {
        &self.settings.url
    }

    /// GET the application root and look for the configured markers
    pub async fn check_app(&self) -> HealthReport {
        let started = Instant::now();
        let result = self
            .client
            .get(&self.settings.url)
            .timeout(self.settings.timeout)
            .send()
            .await;

        let status = match result {
            Err(e) => HealthStatus::Unreachable(describe_error(e)),
            Ok(response) if response.status().as_u16() == 200 => match response.text().await {
                Ok(page) => {
                    let missing: Vec<String> = self
                        .settings
                        .markers
                        .iter()
                        .filter(|m| !page.contains(m.as_str()))
                        .cloned()
                        .collect();
                    if missing.is_empty() {
                        HealthStatus::Healthy
                    } else {
                        HealthStatus::WrongApplication { missing }
                    }
                }
                Err(e) => HealthStatus::Unreachable(describe_error(e)),
            },
            Ok(response) => HealthStatus::HttpError(response.status().as_u16()),
        };

        HealthReport {
            service: format!("app {}", self.settings.url),
            status,
            elapsed: started.elapsed(),
        }
    }

    /// List Gemini models; costs no generation quota
    pub async fn check_gemini(&self) -> Option<HealthReport> {
        let target = self.gemini.as_ref()?;
        let url = target.models_url();
        tracing::debug!("Checking Gemini reachability: {}", redact_url(&url));

        let started = Instant::now();
        let status = match self
            .client
            .get(&url)
            .timeout(self.settings.timeout)
            .send()
            .await
        {
            Err(e) => HealthStatus::Unreachable(describe_error(e)),
            Ok(response) => match response.status().as_u16() {
                200 => HealthStatus::Healthy,
                429 => HealthStatus::RateLimited,
                other => HealthStatus::HttpError(other),
            },
        };

        Some(HealthReport {
            service: "gemini api".to_string(),
            status,
            elapsed: started.elapsed(),
        })
    }

    /// Run every enabled check in sequence
    pub async fn check_all(&self) -> Vec<HealthReport> {
        let mut reports = vec![self.check_app().await];
        if let Some(report) = self.check_gemini().await {
            reports.push(report);
        }
        reports
    }
}
