//! Discovery sessions
//!
//! A session walks a [`CandidateSpace`] one candidate at a time, stopping at
//! the first success. It owns everything it learns; nothing survives the
//! process except what a reporter prints or logs.

use std::time::{Duration, Instant};
use uuid::Uuid;

use super::candidate::{Candidate, CandidateSpace};
use super::executor::Probe;
use super::outcome::{OutcomeKind, ProbeOutcome};
use super::reporter::Reporter;

/// One attempted candidate and what happened to it
#[derive(Debug, Clone)]
pub struct ProbeRecord {
    /// 1-based position in enumeration order
    pub index: usize,
    pub candidate: Candidate,
    pub outcome: ProbeOutcome,
    pub elapsed: Duration,
}

/// Per-kind counts of the outcomes seen in a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    pub success: usize,
    pub not_found: usize,
    pub unauthorized: usize,
    pub rate_limited: usize,
    pub network: usize,
    pub unknown: usize,
}

impl OutcomeTally {
    pub fn record(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Success => self.success += 1,
            OutcomeKind::NotFound => self.not_found += 1,
            OutcomeKind::Unauthorized => self.unauthorized += 1,
            OutcomeKind::RateLimited => self.rate_limited += 1,
            OutcomeKind::TransientNetworkError => self.network += 1,
            OutcomeKind::UnknownError => self.unknown += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.not_found + self.unauthorized + self.rate_limited + self.network + self.unknown
    }
}

/// Advisory explanation for a session that found nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDiagnosis {
    /// The candidate space was empty
    NothingTried,
    /// Every candidate was unknown to the provider
    NotFound,
    /// Every candidate, or a strict majority, hit the provider's quota
    RateLimited,
    /// Every candidate was rejected for credentials
    Unauthorized,
    /// Every candidate failed at the network level
    Unreachable,
    Mixed,
}

impl FailureDiagnosis {
    /// Human-readable hint for the operator
    pub fn advice(&self) -> &'static str {
        match self {
            FailureDiagnosis::NothingTried => {
                "No candidates to try. One of the candidate lists is empty."
            }
            FailureDiagnosis::NotFound => {
                "Every candidate was not found. The names are probably different from the guesses; check the provider portal for the exact values."
            }
            FailureDiagnosis::RateLimited => {
                "The search is quota-bound, not configuration-bound: the provider rate-limited the probes. Wait for the quota window to reset and run again."
            }
            FailureDiagnosis::Unauthorized => {
                "Every candidate rejected the credential. The endpoints may exist but the key does not grant access."
            }
            FailureDiagnosis::Unreachable => {
                "No candidate host could be reached. Check network access and the endpoint spelling."
            }
            FailureDiagnosis::Mixed => {
                "Failures were mixed; see the per-candidate results above."
            }
        }
    }
}

/// One bounded discovery run
#[derive(Debug)]
pub struct DiscoverySession {
    id: Uuid,
    name: String,
    delay: Duration,
    records: Vec<ProbeRecord>,
    found: Option<usize>,
}

impl DiscoverySession {
    /// Create a new session with no inter-candidate delay
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            delay: Duration::ZERO,
            records: Vec::new(),
            found: None,
        }
    }

    /// Pause between consecutive candidates to stay under per-minute limits
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Walk the space until the first success or exhaustion
    pub async fn run<P>(mut self, space: &CandidateSpace, probe: &P, reporter: &mut dyn Reporter) -> Self
    where
        P: Probe + ?Sized,
    {
        let total = space.len();
        tracing::info!(
            session_id = %self.id,
            "Starting discovery '{}' over {} candidates",
            self.name,
            total
        );
        reporter.session_started(&self.name, total);

        for (i, candidate) in space.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let index = i + 1;
            reporter.candidate_started(index, total, &candidate);

            let started = Instant::now();
            let outcome = probe.probe(&candidate).await;
            let record = ProbeRecord {
                index,
                candidate,
                outcome,
                elapsed: started.elapsed(),
            };

            reporter.candidate_finished(&record);
            let success = record.outcome.is_success();
            self.records.push(record);

            if success {
                self.found = Some(self.records.len() - 1);
                break;
            }
        }

        reporter.session_finished(&self);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every attempted candidate, in enumeration order
    pub fn records(&self) -> &[ProbeRecord] {
        &self.records
    }

    /// The working candidate, if one was found
    pub fn found(&self) -> Option<&ProbeRecord> {
        self.found.map(|i| &self.records[i])
    }

    pub fn tally(&self) -> OutcomeTally {
        let mut tally = OutcomeTally::default();
        for record in &self.records {
            tally.record(record.outcome.kind());
        }
        tally
    }

    /// Explain a fruitless session; `None` when a candidate worked
    pub fn diagnosis(&self) -> Option<FailureDiagnosis> {
        if self.found.is_some() {
            return None;
        }

        let tally = self.tally();
        let total = tally.total();
        let diagnosis = if total == 0 {
            FailureDiagnosis::NothingTried
        } else if tally.not_found == total {
            FailureDiagnosis::NotFound
        } else if tally.rate_limited * 2 > total {
            FailureDiagnosis::RateLimited
        } else if tally.unauthorized == total {
            FailureDiagnosis::Unauthorized
        } else if tally.network == total {
            FailureDiagnosis::Unreachable
        } else {
            FailureDiagnosis::Mixed
        };

        Some(diagnosis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::reporter::NullReporter;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns scripted outcomes keyed by the `model` axis
    struct Scripted {
        script: Vec<(&'static str, ProbeOutcome)>,
        calls: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(script: Vec<(&'static str, ProbeOutcome)>) -> Self {
            Self {
                script,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Probe for Scripted {
        async fn probe(&self, candidate: &Candidate) -> ProbeOutcome {
            let model = candidate.get("model").unwrap().to_string();
            self.calls.lock().unwrap().push(model.clone());
            self.script
                .iter()
                .find(|(m, _)| *m == model)
                .map(|(_, o)| o.clone())
                .unwrap_or(ProbeOutcome::NotFound)
        }
    }

    fn success(payload: &str) -> ProbeOutcome {
        ProbeOutcome::Success {
            payload: payload.to_string(),
        }
    }

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let space = CandidateSpace::new().with_axis("model", ["a", "b", "c", "d"]);
        let probe = Scripted::new(vec![("c", success("hi")), ("d", success("later"))]);

        let session = DiscoverySession::new("models")
            .run(&space, &probe, &mut NullReporter)
            .await;

        assert_eq!(*probe.calls.lock().unwrap(), vec!["a", "b", "c"]);
        let found = session.found().unwrap();
        assert_eq!(found.index, 3);
        assert_eq!(found.candidate.get("model"), Some("c"));
        assert_eq!(session.records()[0].outcome, ProbeOutcome::NotFound);
        assert_eq!(session.diagnosis(), None);
    }

    #[tokio::test]
    async fn test_empty_space_is_immediate_exhaustion() {
        let space = CandidateSpace::new().with_axis("model", Vec::<String>::new());
        let probe = Scripted::new(vec![]);

        let session = DiscoverySession::new("models")
            .run(&space, &probe, &mut NullReporter)
            .await;

        assert!(probe.calls.lock().unwrap().is_empty());
        assert!(session.records().is_empty());
        assert_eq!(session.diagnosis(), Some(FailureDiagnosis::NothingTried));
    }

    #[tokio::test]
    async fn test_diagnosis_variants() {
        let space = CandidateSpace::new().with_axis("model", ["a", "b", "c"]);

        let all_limited = Scripted::new(vec![
            ("a", ProbeOutcome::RateLimited),
            ("b", ProbeOutcome::RateLimited),
            ("c", ProbeOutcome::RateLimited),
        ]);
        let session = DiscoverySession::new("t").run(&space, &all_limited, &mut NullReporter).await;
        assert_eq!(session.diagnosis(), Some(FailureDiagnosis::RateLimited));
        assert_eq!(session.tally().rate_limited, 3);

        let mostly_limited = Scripted::new(vec![
            ("a", ProbeOutcome::RateLimited),
            ("b", ProbeOutcome::RateLimited),
        ]);
        let session = DiscoverySession::new("t").run(&space, &mostly_limited, &mut NullReporter).await;
        assert_eq!(session.diagnosis(), Some(FailureDiagnosis::RateLimited));

        let all_missing = Scripted::new(vec![]);
        let session = DiscoverySession::new("t").run(&space, &all_missing, &mut NullReporter).await;
        assert_eq!(session.diagnosis(), Some(FailureDiagnosis::NotFound));

        let mixed = Scripted::new(vec![
            ("a", ProbeOutcome::Unauthorized),
            ("b", ProbeOutcome::RateLimited),
        ]);
        let session = DiscoverySession::new("t").run(&space, &mixed, &mut NullReporter).await;
        assert_eq!(session.diagnosis(), Some(FailureDiagnosis::Mixed));
    }

    #[tokio::test]
    async fn test_network_errors_do_not_abort() {
        let space = CandidateSpace::new().with_axis("model", ["a", "b"]);
        let probe = Scripted::new(vec![
            (
                "a",
                ProbeOutcome::TransientNetworkError {
                    detail: "timed out".to_string(),
                },
            ),
            ("b", success("ok")),
        ]);

        let session = DiscoverySession::new("t").run(&space, &probe, &mut NullReporter).await;

        assert_eq!(session.records().len(), 2);
        assert_eq!(session.records()[0].outcome.kind(), OutcomeKind::TransientNetworkError);
        assert_eq!(session.found().unwrap().candidate.get("model"), Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_only_between_candidates() {
        let space = CandidateSpace::new().with_axis("model", ["a", "b", "c"]);
        let probe = Scripted::new(vec![]);

        let started = tokio::time::Instant::now();
        DiscoverySession::new("t")
            .with_delay(Duration::from_secs(1))
            .run(&space, &probe, &mut NullReporter)
            .await;

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2));
        assert!(elapsed < Duration::from_secs(3));
    }

    #[test]
    fn test_rate_limited_advice_names_quota() {
        let limited = FailureDiagnosis::RateLimited.advice();
        assert_ne!(limited, FailureDiagnosis::NotFound.advice());
        assert_ne!(limited, FailureDiagnosis::Mixed.advice());
        assert!(limited.contains("rate-limited"));
        assert!(limited.contains("quota"));
    }

}
