use std::collections::HashMap;
use std::fmt;

use super::types::{DomainStats, ProbeOutcome, format_decimal};

/// Per-domain counters for a single cycle
///
/// Domains keep the order in which they were first recorded.
#[derive(Debug, Default)]
pub struct CycleAggregator {
    domains: Vec<(String, DomainStats)>,
    index: HashMap<String, usize>,
}

/// Availability of one domain at the end of a cycle
#[derive(Debug, Clone, PartialEq)]
pub struct DomainReport {
    pub domain: String,
    pub availability: f64,
    pub up: u32,
    pub total: u32,
}

impl fmt::Display for DomainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Domain {} has an availability percentage of {}% ({}/{})",
            self.domain,
            format_decimal(self.availability),
            self.up,
            self.total
        )
    }
}

impl CycleAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one probed endpoint; only `Up` outcomes count as available
    pub fn record_outcome(&mut self, domain: &str, outcome: &ProbeOutcome) {
        let position = match self.index.get(domain) {
            Some(&position) => position,
            None => {
                self.domains.push((domain.to_string(), DomainStats::default()));
                self.index.insert(domain.to_string(), self.domains.len() - 1);
                self.domains.len() - 1
            }
        };

        let stats = &mut self.domains[position].1;
        stats.total += 1;
        if outcome.is_up() {
            stats.up += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn stats(&self, domain: &str) -> Option<DomainStats> {
        self.index.get(domain).map(|&position| self.domains[position].1)
    }

    /// Availability per domain, in first-seen order
    pub fn report(&self) -> Vec<DomainReport> {
        self.domains
            .iter()
            .filter_map(|(domain, stats)| {
                stats.availability().map(|availability| DomainReport {
                    domain: domain.clone(),
                    availability,
                    up: stats.up,
                    total: stats.total,
                })
            })
            .collect()
    }
}
