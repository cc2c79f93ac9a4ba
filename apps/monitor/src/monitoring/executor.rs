use anyhow::Result;
use std::sync::Arc;

use super::checker::{Checker, HttpChecker};
use super::types::ProbeOutcome;
use crate::config::{EndpointSpec, MonitorSettings};

/// Classify a completed probe
///
/// Slowness wins over the status code: a 200 that took longer than the
/// threshold is `Slow`, not `Up`.
pub fn classify(latency_ms: f64, status_code: u16, slow_threshold_ms: f64) -> ProbeOutcome {
    if latency_ms > slow_threshold_ms {
        ProbeOutcome::Slow { latency_ms }
    } else if (200..=299).contains(&status_code) {
        ProbeOutcome::Up { status_code }
    } else {
        ProbeOutcome::Down { status_code }
    }
}

/// Monitoring executor - executes individual monitoring checks
pub struct MonitoringExecutor {
    checker: Arc<dyn Checker>,
    slow_threshold_ms: f64,
}

impl MonitoringExecutor {
    /// Create an executor backed by an HTTP checker
    pub fn new(settings: &MonitorSettings) -> Result<Self> {
        Ok(Self::with_checker(
            Arc::new(HttpChecker::new(settings.probe_timeout)?),
            settings.slow_threshold_ms,
        ))
    }

    pub fn with_checker(checker: Arc<dyn Checker>, slow_threshold_ms: f64) -> Self {
        Self { checker, slow_threshold_ms }
    }

    /// Execute one probe; exactly one attempt, no retries
    pub async fn execute_check(&self, endpoint: &EndpointSpec) -> ProbeOutcome {
        match self.checker.check(endpoint).await {
            Ok((latency_ms, status_code)) => {
                classify(latency_ms, status_code, self.slow_threshold_ms)
            }
            Err(e) => ProbeOutcome::Unreachable { error: format!("{e:#}") },
        }
    }
}
