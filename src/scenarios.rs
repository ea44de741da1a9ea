//! The four discovery scenarios
//!
//! Each builds a [`CandidateSpace`] from the configuration: the axis under
//! investigation gets a list of guesses (overridable through the
//! environment), the rest are held fixed at their configured value.

use crate::config::ProbeConfig;
use crate::discovery::CandidateSpace;
use crate::error::DiscoveryResult;
use crate::providers::axis;

pub const DEFAULT_AZURE_RESOURCES: &[&str] = &[
    "steve-openai-resource",
    "steveopenai",
    "steve-openai",
    "steve",
    "openai-steve",
    "steve-ai",
];

pub const DEFAULT_AZURE_ENDPOINT_TEMPLATES: &[&str] = &[
    "https://{resource}.openai.azure.com",
    "https://{resource}.cognitiveservices.azure.com",
    "https://{resource}.eastus.cognitiveservices.azure.com",
    "https://{resource}.westus.cognitiveservices.azure.com",
    "https://{resource}.westus2.cognitiveservices.azure.com",
];

pub const DEFAULT_AZURE_DEPLOYMENTS: &[&str] = &[
    "o4-mini",
    "o4mini",
    "gpt-4o-mini",
    "gpt4o-mini",
    "gpt-4o-mini-deployment",
    "o1-mini",
    "gpt-35-turbo",
    "gpt-4",
    "gpt-4o",
    "chatgpt",
];

/// Newest first, so the first hit is the most capable version
pub const DEFAULT_AZURE_API_VERSIONS: &[&str] = &[
    "2024-12-01-preview",
    "2024-10-21",
    "2024-08-01-preview",
    "2024-06-01",
    "2024-05-01-preview",
    "2024-04-01-preview",
    "2024-02-15-preview",
    "2023-12-01-preview",
    "2023-10-01-preview",
    "2023-08-01-preview",
    "2023-06-01-preview",
    "2023-05-15",
    "2023-03-15-preview",
];

/// Cheapest / most generous quota first
pub const DEFAULT_GEMINI_MODELS: &[&str] = &[
    "gemini-1.5-flash-latest",
    "gemini-1.5-flash",
    "gemini-2.0-flash",
    "gemini-2.0-flash-exp",
    "gemini-2.5-flash",
    "gemini-1.5-pro",
    "gemini-2.5-pro",
];

/// Which configuration value a discovery run is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Endpoints,
    Deployments,
    ApiVersions,
    Models,
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Endpoints => "endpoints",
            Scenario::Deployments => "deployments",
            Scenario::ApiVersions => "api-versions",
            Scenario::Models => "models",
        }
    }
}

fn or_defaults(overridden: &Option<Vec<String>>, defaults: &[&str]) -> Vec<String> {
    match overridden {
        Some(values) => values.clone(),
        None => defaults.iter().map(|s| s.to_string()).collect(),
    }
}

/// Azure resource name × endpoint template, deployment and version fixed
pub fn endpoint_space(config: &ProbeConfig) -> CandidateSpace {
    let overrides = &config.candidates;
    CandidateSpace::new()
        .with_axis(axis::RESOURCE, or_defaults(&overrides.azure_resources, DEFAULT_AZURE_RESOURCES))
        .with_axis(
            axis::ENDPOINT_TEMPLATE,
            or_defaults(&overrides.azure_endpoint_templates, DEFAULT_AZURE_ENDPOINT_TEMPLATES),
        )
        .with_axis(axis::DEPLOYMENT, [config.azure.deployment.clone()])
        .with_axis(axis::API_VERSION, [config.azure.api_version.clone()])
}

/// Deployment names against a known endpoint
pub fn deployment_space(config: &ProbeConfig) -> DiscoveryResult<CandidateSpace> {
    Ok(CandidateSpace::new()
        .with_axis(axis::ENDPOINT, [config.azure_endpoint()?.to_string()])
        .with_axis(
            axis::DEPLOYMENT,
            or_defaults(&config.candidates.azure_deployments, DEFAULT_AZURE_DEPLOYMENTS),
        )
        .with_axis(axis::API_VERSION, [config.azure.api_version.clone()]))
}

/// API versions against a known endpoint and deployment
pub fn api_version_space(config: &ProbeConfig) -> DiscoveryResult<CandidateSpace> {
    Ok(CandidateSpace::new()
        .with_axis(axis::ENDPOINT, [config.azure_endpoint()?.to_string()])
        .with_axis(axis::DEPLOYMENT, [config.azure.deployment.clone()])
        .with_axis(
            axis::API_VERSION,
            or_defaults(&config.candidates.azure_api_versions, DEFAULT_AZURE_API_VERSIONS),
        ))
}

/// Gemini model names; `listed` replaces the configured list when given
pub fn model_space(config: &ProbeConfig, listed: Option<Vec<String>>) -> CandidateSpace {
    let models = listed.unwrap_or_else(|| or_defaults(&config.candidates.gemini_models, DEFAULT_GEMINI_MODELS));
    CandidateSpace::new()
        .with_axis(axis::API_VERSION, [config.gemini.api_version.clone()])
        .with_axis(axis::MODEL, models)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiscoveryError;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ProbeConfig {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        ProbeConfig::from_lookup(|name| map.get(name).map(|v| v.to_string())).unwrap()
    }

    #[test]
    fn test_endpoint_space_defaults() {
        let space = endpoint_space(&config(&[]));

        assert_eq!(
            space.len(),
            DEFAULT_AZURE_RESOURCES.len() * DEFAULT_AZURE_ENDPOINT_TEMPLATES.len()
        );

        let first = space.iter().next().unwrap();
        assert_eq!(first.get(axis::RESOURCE), Some("steve-openai-resource"));
        assert_eq!(first.get(axis::ENDPOINT_TEMPLATE), Some("https://{resource}.openai.azure.com"));
        assert_eq!(first.get(axis::DEPLOYMENT), Some("o4-mini"));

        // Templates vary fastest
        let second = space.iter().nth(1).unwrap();
        assert_eq!(second.get(axis::RESOURCE), Some("steve-openai-resource"));
        assert_eq!(
            second.get(axis::ENDPOINT_TEMPLATE),
            Some("https://{resource}.cognitiveservices.azure.com")
        );
    }

    #[test]
    fn test_deployment_space_needs_endpoint() {
        assert!(matches!(
            deployment_space(&config(&[])),
            Err(DiscoveryError::MissingSetting(_))
        ));

        let space = deployment_space(&config(&[
            ("AZURE_OPENAI_ENDPOINT", "https://x.cognitiveservices.azure.com/"),
            ("PROBE_AZURE_DEPLOYMENTS", "a,b"),
        ]))
        .unwrap();
        let deployments: Vec<String> = space
            .iter()
            .map(|c| c.get(axis::DEPLOYMENT).unwrap().to_string())
            .collect();
        assert_eq!(deployments, vec!["a", "b"]);
    }

    #[test]
    fn test_api_version_space() {
        let space = api_version_space(&config(&[("AZURE_OPENAI_ENDPOINT", "https://x")])).unwrap();
        assert_eq!(space.len(), DEFAULT_AZURE_API_VERSIONS.len());
        assert_eq!(space.iter().next().unwrap().get(axis::API_VERSION), Some("2024-12-01-preview"));
    }

    #[test]
    fn test_model_space_listing_wins() {
        let cfg = config(&[("PROBE_GEMINI_MODELS", "custom-model")]);

        let configured = model_space(&cfg, None);
        assert_eq!(configured.iter().next().unwrap().get(axis::MODEL), Some("custom-model"));

        let listed = model_space(&cfg, Some(vec!["gemini-x".to_string(), "gemini-y".to_string()]));
        assert_eq!(listed.len(), 2);

        let empty = model_space(&config(&[("PROBE_GEMINI_MODELS", "")]), None);
        assert!(empty.is_empty());
    }
}
