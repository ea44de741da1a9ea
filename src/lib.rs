//! Provider configuration discovery for LLM integrations
//!
//! Finds a working combination of endpoint, deployment, API version or
//! model by trying candidates one at a time and classifying each reply,
//! and checks that the locally running application is up.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod health;
pub mod logging;
pub mod providers;
pub mod scenarios;

pub use config::ProbeConfig;
pub use discovery::{
    Candidate, CandidateSpace, ConsoleReporter, DiscoveredConfig, DiscoverySession, FailureDiagnosis,
    HttpProbe, Probe, ProbeOutcome, ProbeTarget, Reporter,
};
pub use error::{DiscoveryError, DiscoveryResult};
pub use scenarios::Scenario;
