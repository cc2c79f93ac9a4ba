//! Monitoring engine module - probes endpoints and aggregates availability
//!
//! This module is responsible for:
//! - Reducing endpoint URLs to their registrable domain
//! - Executing and classifying HTTP checks
//! - Aggregating per-domain availability within a cycle
//! - Driving repeated, paced cycles and printing their reports

pub mod aggregator;
pub mod checker;
pub mod domain;
pub mod executor;
pub mod scheduler;
pub mod types;

pub use aggregator::{CycleAggregator, DomainReport};
pub use domain::extract_domain;
pub use executor::MonitoringExecutor;
pub use scheduler::MonitoringScheduler;
pub use types::{CheckResult, DomainStats, MonitorStatus, ProbeOutcome};
