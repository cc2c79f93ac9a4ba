use std::io::Write;
use std::num::NonZeroU32;
use std::time::Duration;

use super::aggregator::{CycleAggregator, DomainReport};
use super::domain::extract_domain;
use super::executor::MonitoringExecutor;
use super::types::CheckResult;
use crate::config::{EndpointSpec, MonitorSettings};
use crate::error::MonitorError;

/// Line printed after every cycle
pub const CYCLE_SEPARATOR: &str = "---";

/// Monitoring scheduler - drives repeated cycles over the endpoint list
///
/// Endpoints are probed one after another; report lines go to `out`.
pub struct MonitoringScheduler<W> {
    executor: MonitoringExecutor,
    cycle_pause: Duration,
    out: W,
}

impl<W: Write> MonitoringScheduler<W> {
    /// Create a scheduler backed by an HTTP executor
    pub fn new(settings: &MonitorSettings, out: W) -> Result<Self, MonitorError> {
        let executor =
            MonitoringExecutor::new(settings).map_err(|e| MonitorError::Client(format!("{e:#}")))?;

        Ok(Self::with_executor(executor, settings.cycle_pause, out))
    }

    pub fn with_executor(executor: MonitoringExecutor, cycle_pause: Duration, out: W) -> Self {
        Self { executor, cycle_pause, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run `cycles` monitoring cycles, pausing between consecutive ones
    pub async fn run(
        &mut self,
        endpoints: &[EndpointSpec],
        cycles: NonZeroU32,
    ) -> Result<(), MonitorError> {
        if endpoints.is_empty() {
            return Err(MonitorError::EmptyConfig);
        }

        tracing::info!(endpoints = endpoints.len(), cycles = cycles.get(), "Starting monitor");

        let mut remaining = cycles.get();
        while remaining > 0 {
            let cycle = cycles.get() - remaining + 1;
            let reports = self.run_cycle(endpoints).await?;

            writeln!(self.out, "{CYCLE_SEPARATOR}")?;
            self.out.flush()?;
            tracing::info!(cycle, domains = reports.len(), "Cycle complete");

            remaining -= 1;
            if remaining > 0 {
                tokio::time::sleep(self.cycle_pause).await;
            }
        }

        tracing::info!(cycles = cycles.get(), "Monitor finished");
        Ok(())
    }

    /// Probe every endpoint once and print the per-domain report
    ///
    /// Each call starts from an empty aggregator. Fails when no endpoint
    /// could be probed at all.
    pub async fn run_cycle(
        &mut self,
        endpoints: &[EndpointSpec],
    ) -> Result<Vec<DomainReport>, MonitorError> {
        let mut aggregator = CycleAggregator::new();

        for (index, endpoint) in endpoints.iter().enumerate() {
            let Some(url) = endpoint.url.as_deref() else {
                let label = endpoint.label(index);
                tracing::warn!(endpoint = %label, "Skipping endpoint without url");
                writeln!(
                    self.out,
                    "Warning: Skipping endpoint {label} because of missing url key in endpoint configuration."
                )?;
                continue;
            };

            let domain = extract_domain(url);
            let outcome = self.executor.execute_check(endpoint).await;

            tracing::debug!(
                url = %url,
                method = %endpoint.method,
                domain = %domain,
                status = %outcome.status(),
                "Probe finished"
            );

            aggregator.record_outcome(&domain, &outcome);

            let result = CheckResult::new(url, endpoint.method.as_str(), outcome);
            if let Some(line) = result.diagnostic() {
                writeln!(self.out, "{line}")?;
            }
        }

        if aggregator.is_empty() {
            return Err(MonitorError::NoEndpointsProcessed);
        }

        let reports = aggregator.report();
        for report in &reports {
            writeln!(self.out, "{report}")?;
        }

        Ok(reports)
    }
}
