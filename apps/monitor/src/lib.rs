//! Uppe endpoint monitor.
//!
//! Periodically probes configured HTTP endpoints, classifies every probe as
//! up, slow or down and reports per-domain availability for each cycle.

pub mod config;
pub mod error;
pub mod monitoring;

pub use config::{EndpointSpec, MonitorSettings, load_endpoints};
pub use error::MonitorError;
pub use monitoring::{MonitoringScheduler, ProbeOutcome};
