//! Configuration discovery
//!
//! This module provides the candidate-enumeration probe used to find a
//! working provider configuration:
//! - [`CandidateSpace`] enumerates combinations of endpoint, deployment,
//!   version and model guesses
//! - [`Probe`] / [`HttpProbe`] test one combination and classify the reply
//! - [`DiscoverySession`] walks the space until something works
//! - [`Reporter`] renders progress and the final verdict

mod candidate;
mod executor;
mod outcome;
mod record;
mod reporter;
mod session;

pub use candidate::{Axis, Candidate, CandidateSpace, Candidates};
pub use executor::{describe_error, redact_url, HttpProbe, Probe, ProbeTarget, RequestPlan};
pub use outcome::{classify, truncate, HttpReply, OutcomeKind, ProbeOutcome, ResponseClassifier};
pub use record::DiscoveredConfig;
pub use reporter::{ConsoleReporter, NullReporter, Reporter};
pub use session::{DiscoverySession, FailureDiagnosis, OutcomeTally, ProbeRecord};
