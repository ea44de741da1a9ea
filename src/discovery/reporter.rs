//! Progress and verdict reporting
//!
//! Reporters only observe a session. Nothing they print is consumed by
//! another component.

use super::candidate::Candidate;
use super::outcome::ProbeOutcome;
use super::session::{DiscoverySession, ProbeRecord};
use crate::cli::console::Console;

/// Hooks invoked by [`DiscoverySession::run`]
pub trait Reporter {
    fn session_started(&mut self, name: &str, total: usize);

    fn candidate_started(&mut self, index: usize, total: usize, candidate: &Candidate);

    fn candidate_finished(&mut self, record: &ProbeRecord);

    fn session_finished(&mut self, session: &DiscoverySession);
}

/// Reporter that only writes to the log
pub struct NullReporter;

impl Reporter for NullReporter {
    fn session_started(&mut self, _name: &str, _total: usize) {}

    fn candidate_started(&mut self, _index: usize, _total: usize, _candidate: &Candidate) {}

    fn candidate_finished(&mut self, record: &ProbeRecord) {
        log_record(record);
    }

    fn session_finished(&mut self, _session: &DiscoverySession) {}
}

/// Human-readable terminal reporter
pub struct ConsoleReporter {
    console: Console,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            console: Console::new(),
        }
    }

    pub fn with_console(console: Console) -> Self {
        Self { console }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn session_started(&mut self, name: &str, total: usize) {
        self.console.print_banner(&format!("Discovery: {}", name));
        self.console.print_field("Candidates", &total.to_string());
        self.console.print_separator();
    }

    fn candidate_started(&mut self, index: usize, total: usize, candidate: &Candidate) {
        self.console
            .print_progress(&format!("[{}/{}] {} ...", index, total, candidate));
    }

    fn candidate_finished(&mut self, record: &ProbeRecord) {
        log_record(record);

        let elapsed = format!("({:.2}s)", record.elapsed.as_secs_f64());
        match &record.outcome {
            ProbeOutcome::Success { .. } => {
                self.console.print_success(&format!("WORKS {}", elapsed));
            }
            ProbeOutcome::Unauthorized => {
                self.console
                    .print_warning(&format!("access denied, endpoint exists but auth is wrong {}", elapsed));
            }
            ProbeOutcome::RateLimited => {
                self.console
                    .print_warning(&format!("rate limited, quota exhausted {}", elapsed));
            }
            other => {
                self.console.print_failure(&format!("{} {}", other, elapsed));
            }
        }
    }

    fn session_finished(&mut self, session: &DiscoverySession) {
        self.console.print_separator();

        if let Some(found) = session.found() {
            self.console.print_success("WORKING CONFIGURATION FOUND");
            for (axis, value) in found.candidate.fields() {
                self.console.print_field(&format!("  {}", axis), value);
            }
            if let Some(payload) = found.outcome.payload() {
                self.console.print_field("  Response", payload);
            }
            tracing::info!(
                session_id = %session.id(),
                "Discovery '{}' confirmed working configuration: {}",
                session.name(),
                found.candidate
            );
            return;
        }

        let tally = session.tally();
        self.console.print_failure(&format!(
            "No working configuration found after {} candidates",
            tally.total()
        ));
        self.console.print_detail(&format!(
            "not found: {}, unauthorized: {}, rate limited: {}, network: {}, other: {}",
            tally.not_found, tally.unauthorized, tally.rate_limited, tally.network, tally.unknown
        ));
        if let Some(diagnosis) = session.diagnosis() {
            self.console.print_system(diagnosis.advice());
            tracing::warn!(
                session_id = %session.id(),
                "Discovery '{}' exhausted: {:?}",
                session.name(),
                diagnosis
            );
        }
    }
}

fn log_record(record: &ProbeRecord) {
    if record.outcome.is_success() {
        tracing::info!("Candidate #{} {} -> {}", record.index, record.candidate, record.outcome);
    } else {
        tracing::warn!("Candidate #{} {} -> {}", record.index, record.candidate, record.outcome);
    }
}
