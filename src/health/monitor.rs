//! Repeated health checks
//!
//! A plain polling loop: one full round of checks, a fixed sleep, repeat.
//! Every result goes to the append-only log through `tracing`.

use std::future::Future;
use std::io;
use std::time::Duration;

use super::checker::{HealthChecker, HealthReport, HealthStatus};
use crate::cli::console::Console;

pub struct Monitor {
    checker: HealthChecker,
    console: Console,
    rounds: u64,
}

impl Monitor {
    pub fn new(checker: HealthChecker) -> Self {
        Self {
            checker,
            console: Console::new(),
            rounds: 0,
        }
    }

    /// Completed rounds so far
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Run one round of checks; true when everything is healthy
    pub async fn run_once(&mut self) -> bool {
        self.rounds += 1;
        self.console
            .print_banner(&format!("Health report #{} - {}", self.rounds, chrono::Local::now().format("%H:%M:%S")));

        let reports = self.checker.check_all().await;
        for report in &reports {
            self.show(report);
        }

        let healthy = reports.iter().all(HealthReport::is_healthy);
        self.console.print_separator();
        if healthy {
            self.console.print_success("Overall status: ALL SYSTEMS GO");
            tracing::info!("Overall status: healthy");
        } else {
            self.console.print_failure("Overall status: ISSUES DETECTED");
            tracing::warn!("Overall status: issues detected");
        }
        healthy
    }

    /// Repeat rounds every `interval` until Ctrl-C
    pub async fn run_continuous(&mut self, interval: Duration) {
        self.run_until(interval, until_signal(tokio::signal::ctrl_c()))
            .await;
        self.console.print_system("Monitoring stopped by user");
    }

    /// Repeat rounds every `interval` until `shutdown` resolves
    ///
    /// Shutdown is only observed between rounds, so a started round always
    /// completes.
    pub async fn run_until<F>(&mut self, interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tracing::info!("Starting continuous monitoring of {} every {:?}", self.checker.url(), interval);
        tokio::pin!(shutdown);

        loop {
            self.run_once().await;
            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        tracing::info!("Monitoring stopped after {} rounds", self.rounds);
    }

    fn show(&self, report: &HealthReport) {
        let line = format!("{}: {} ({:.2}s)", report.service, report.status, report.elapsed.as_secs_f64());
        match &report.status {
            HealthStatus::Healthy => {
                tracing::info!("{}", line);
                self.console.print_success(&line);
            }
            HealthStatus::WrongApplication { .. } | HealthStatus::RateLimited => {
                tracing::warn!("{}", line);
                self.console.print_warning(&line);
            }
            HealthStatus::HttpError(_) | HealthStatus::Unreachable(_) => {
                tracing::error!("{}", line);
                self.console.print_failure(&line);
            }
        }
    }
}

/// Resolve once `signal` fires
///
/// A handler that cannot be installed never resolves, so monitoring keeps
/// going until the process is killed.
async fn until_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::warn!("Cannot listen for Ctrl-C, monitoring until killed: {}", e);
        std::future::pending::<()>().await;
    }
}
