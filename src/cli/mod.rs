//! Command-line surface

pub mod console;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub use console::Console;

/// Find working LLM provider settings by trying candidates until one answers
#[derive(Debug, Parser)]
#[command(name = "steve-probe", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Try Azure resource names × endpoint templates
    Endpoints(DiscoveryArgs),
    /// Try Azure deployment names against AZURE_OPENAI_ENDPOINT
    Deployments(DiscoveryArgs),
    /// Try Azure API versions against AZURE_OPENAI_ENDPOINT
    ApiVersions(DiscoveryArgs),
    /// Try Gemini model names
    Models {
        #[command(flatten)]
        args: DiscoveryArgs,
        /// Take the candidate models from the API's own model listing
        #[arg(long)]
        from_listing: bool,
    },
    /// Check the local application (and Gemini reachability)
    Health {
        #[arg(value_enum, default_value_t = HealthMode::Once)]
        mode: HealthMode,
    },
}

#[derive(Debug, Clone, Args)]
pub struct DiscoveryArgs {
    /// Write the working configuration to this JSON file
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,
    /// Skip the courtesy pause between candidates
    #[arg(long)]
    pub no_delay: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HealthMode {
    Once,
    Continuous,
}
