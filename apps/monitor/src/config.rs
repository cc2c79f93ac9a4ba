use std::collections::BTreeMap;
use std::time::Duration;
use std::{env, fmt, fs, path};

use reqwest::Method;
use serde::Deserialize;
use thiserror::Error;

/// Per-request timeout applied to every probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Probes slower than this are reported as slow, whatever their status.
pub const DEFAULT_SLOW_THRESHOLD_MS: f64 = 500.0;

/// Pause between two consecutive cycles.
pub const DEFAULT_CYCLE_PAUSE: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("The configuration file {} is empty.", .path.display())]
    Empty { path: path::PathBuf },

    #[error("endpoint {endpoint} has a body that is not valid JSON: {source}")]
    InvalidBody {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("endpoint {endpoint} has an invalid HTTP method '{method}'")]
    InvalidMethod { endpoint: String, method: String },
}

/// One entry of the endpoint file, as written by the user
#[derive(Debug, Deserialize)]
struct EndpointRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    headers: Option<BTreeMap<String, String>>,
    /// JSON document encoded as a string
    #[serde(default)]
    body: Option<String>,
}

/// A validated endpoint definition
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSpec {
    pub name: Option<String>,
    /// Entries without a url are kept so the monitor can report them as skipped
    pub url: Option<String>,
    /// Upper-cased HTTP method, `GET` unless configured
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
}

impl EndpointSpec {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            name: None,
            url: Some(url.into()),
            method: Method::GET.to_string(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_method(mut self, method: impl AsRef<str>) -> Self {
        self.method = method.as_ref().to_uppercase();
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Label used when the entry has to be reported without a url
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", index + 1),
        }
    }

    fn from_record(record: EndpointRecord, index: usize) -> Result<Self, ConfigError> {
        let label = record
            .name
            .clone()
            .or_else(|| record.url.clone())
            .unwrap_or_else(|| format!("#{}", index + 1));

        let method = record.method.as_deref().unwrap_or("GET").to_uppercase();
        if Method::from_bytes(method.as_bytes()).is_err() {
            return Err(ConfigError::InvalidMethod { endpoint: label, method });
        }

        let body = match record.body.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(
                serde_json::from_str(raw)
                    .map_err(|source| ConfigError::InvalidBody { endpoint: label, source })?,
            ),
            _ => None,
        };

        Ok(Self {
            name: record.name,
            url: record.url,
            method,
            headers: record.headers.unwrap_or_default(),
            body,
        })
    }
}

/// Parse endpoint definitions from YAML text
///
/// `origin` only names the source in error messages.
pub fn parse_endpoints(
    content: &str,
    origin: impl AsRef<path::Path>,
) -> Result<Vec<EndpointSpec>, ConfigError> {
    let empty = || ConfigError::Empty { path: origin.as_ref().to_path_buf() };

    if content.trim().is_empty() {
        return Err(empty());
    }

    let records: Option<Vec<EndpointRecord>> = serde_yaml::from_str(content)?;
    let records = records.filter(|records| !records.is_empty()).ok_or_else(empty)?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| EndpointSpec::from_record(record, index))
        .collect()
}

/// Load endpoint definitions from a YAML file
///
/// ```yaml
/// - name: api health
///   url: https://api.example.com/health
/// - url: https://example.com/login
///   method: POST
///   headers:
///     content-type: application/json
///   body: '{"user": "probe"}'
/// ```
pub fn load_endpoints(path: impl AsRef<path::Path>) -> Result<Vec<EndpointSpec>, ConfigError> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_endpoints(&content, path)
}

/// Tunables of the monitoring loop
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    pub probe_timeout: Duration,
    pub slow_threshold_ms: f64,
    pub cycle_pause: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            slow_threshold_ms: DEFAULT_SLOW_THRESHOLD_MS,
            cycle_pause: DEFAULT_CYCLE_PAUSE,
        }
    }
}

fn get_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> T {
    match lookup(name) {
        Some(val) => val.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(variable = name, value = %val, "Ignoring unparsable setting");
            default
        }),
        None => default,
    }
}

impl MonitorSettings {
    /// Settings overridden by `UPPE_PROBE_TIMEOUT_MS`, `UPPE_SLOW_THRESHOLD_MS`
    /// and `UPPE_CYCLE_PAUSE_SECS`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let timeout_ms =
            get_var(&lookup, "UPPE_PROBE_TIMEOUT_MS", defaults.probe_timeout.as_millis() as u64);
        let slow_threshold_ms =
            get_var(&lookup, "UPPE_SLOW_THRESHOLD_MS", defaults.slow_threshold_ms);
        let pause_secs = get_var(&lookup, "UPPE_CYCLE_PAUSE_SECS", defaults.cycle_pause.as_secs());

        Self {
            probe_timeout: Duration::from_millis(timeout_ms),
            slow_threshold_ms,
            cycle_pause: Duration::from_secs(pause_secs),
        }
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_slow_threshold_ms(mut self, threshold: f64) -> Self {
        self.slow_threshold_ms = threshold;
        self
    }

    pub fn with_cycle_pause(mut self, pause: Duration) -> Self {
        self.cycle_pause = pause;
        self
    }
}

impl fmt::Display for MonitorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
            writeln!(f, "  {}: {}", label, value)
        };

        writeln!(f, "Monitor Settings:")?;
        write_indented(f, "Probe Timeout", &format!("{:?}", self.probe_timeout))?;
        write_indented(f, "Slow Threshold", &format!("{} ms", self.slow_threshold_ms))?;
        write_indented(f, "Cycle Pause", &format!("{:?}", self.cycle_pause))?;

        Ok(())
    }
}
