use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;

use steve_probe::cli::{Cli, Command, Console, DiscoveryArgs, HealthMode};
use steve_probe::discovery::{CandidateSpace, ConsoleReporter, DiscoveredConfig, DiscoverySession, HttpProbe, ProbeTarget};
use steve_probe::health::{HealthChecker, Monitor};
use steve_probe::logging::init_logging;
use steve_probe::providers::gemini::generation_models;
use steve_probe::providers::{AzureChatTarget, GeminiTarget};
use steve_probe::scenarios::{self, Scenario};
use steve_probe::ProbeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ProbeConfig::from_env().context("Invalid configuration")?;
    init_logging(&config.log_file)?;

    match cli.command {
        Command::Endpoints(args) => {
            let target = AzureChatTarget::from_config(&config)?;
            discover(Scenario::Endpoints, scenarios::endpoint_space(&config), target, &args, &config).await
        }
        Command::Deployments(args) => {
            let target = AzureChatTarget::from_config(&config)?;
            let space = scenarios::deployment_space(&config)?;
            discover(Scenario::Deployments, space, target, &args, &config).await
        }
        Command::ApiVersions(args) => {
            let target = AzureChatTarget::from_config(&config)?;
            let space = scenarios::api_version_space(&config)?;
            discover(Scenario::ApiVersions, space, target, &args, &config).await
        }
        Command::Models { args, from_listing } => {
            let target = GeminiTarget::from_config(&config)?;
            let listed = if from_listing {
                let listings = target
                    .list_models(&reqwest::Client::new())
                    .await
                    .context("Failed to list Gemini models")?;
                Some(generation_models(&listings))
            } else {
                None
            };
            discover(Scenario::Models, scenarios::model_space(&config, listed), target, &args, &config).await
        }
        Command::Health { mode } => {
            let mut monitor = Monitor::new(HealthChecker::from_config(&config));
            match mode {
                HealthMode::Once => {
                    monitor.run_once().await;
                }
                HealthMode::Continuous => monitor.run_continuous(config.health.interval).await,
            }
            Ok(())
        }
    }
}

async fn discover<T: ProbeTarget>(
    scenario: Scenario,
    space: CandidateSpace,
    target: T,
    args: &DiscoveryArgs,
    config: &ProbeConfig,
) -> Result<()> {
    let delay = if args.no_delay {
        Duration::ZERO
    } else {
        config.inter_candidate_delay
    };

    let probe = HttpProbe::new(target);
    let mut reporter = ConsoleReporter::new();
    let session = DiscoverySession::new(scenario.name())
        .with_delay(delay)
        .run(&space, &probe, &mut reporter)
        .await;

    if let Some(path) = &args.save {
        match DiscoveredConfig::from_session(&session) {
            Some(found) => {
                found
                    .save(path)
                    .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
                Console::new().print_system(&format!("Saved working configuration to {}", path.display()));
            }
            None => Console::new().print_system("Nothing to save: no working configuration found"),
        }
    }

    Ok(())
}
