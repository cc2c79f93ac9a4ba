use std::fmt;

/// Status of a monitoring check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStatus {
    Up,
    Slow,
    Down,
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorStatus::Up => write!(f, "up"),
            MonitorStatus::Slow => write!(f, "slow"),
            MonitorStatus::Down => write!(f, "down"),
        }
    }
}

/// Classified result of a single probe
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// 2xx response within the slow threshold
    Up { status_code: u16 },
    /// Response slower than the threshold, whatever its status code
    Slow { latency_ms: f64 },
    /// Non-2xx response within the slow threshold
    Down { status_code: u16 },
    /// No response at all (connection refused, DNS failure, timeout...)
    Unreachable { error: String },
}

impl ProbeOutcome {
    pub fn status(&self) -> MonitorStatus {
        match self {
            ProbeOutcome::Up { .. } => MonitorStatus::Up,
            ProbeOutcome::Slow { .. } => MonitorStatus::Slow,
            ProbeOutcome::Down { .. } | ProbeOutcome::Unreachable { .. } => MonitorStatus::Down,
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, ProbeOutcome::Up { .. })
    }
}

/// Result of probing one endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// URL that was checked
    pub target: String,

    /// HTTP method used for the probe
    pub method: String,

    pub outcome: ProbeOutcome,
}

impl CheckResult {
    pub fn new(
        target: impl Into<String>,
        method: impl Into<String>,
        outcome: ProbeOutcome,
    ) -> Self {
        Self { target: target.into(), method: method.into(), outcome }
    }

    /// Console line describing a non-up result; up results are not reported
    pub fn diagnostic(&self) -> Option<String> {
        let Self { target, method, outcome } = self;
        match outcome {
            ProbeOutcome::Up { .. } => None,
            ProbeOutcome::Slow { latency_ms } => Some(format!(
                "{target} ({method}) is a slow endpoint with a latency of {} ms",
                format_decimal(*latency_ms)
            )),
            ProbeOutcome::Down { status_code } => Some(format!(
                "{target} ({method}) is a down endpoint with a HTTP status code of {status_code}"
            )),
            ProbeOutcome::Unreachable { error } => {
                Some(format!("{target} ({method}) threw an error: {error}"))
            }
        }
    }
}

/// Up/total counters for one registrable domain within a cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainStats {
    pub up: u32,
    pub total: u32,
}

impl DomainStats {
    /// Availability in percent, rounded to two decimals
    ///
    /// Returns `None` before anything was recorded.
    pub fn availability(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(round2(100.0 * f64::from(self.up) / f64::from(self.total)))
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a decimal so whole numbers keep one fractional digit (`100.0`)
pub fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 { format!("{value:.1}") } else { format!("{value}") }
}
