use anyhow::{Result, anyhow};
use reqwest::Method;
use std::time::{Duration, Instant};

use super::types::round2;
use crate::config::EndpointSpec;

/// Checker trait for probing an endpoint
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    /// Perform the check and return latency in milliseconds and the status code
    ///
    /// Only transport failures are errors; any HTTP status is a valid answer.
    async fn check(&self, endpoint: &EndpointSpec) -> Result<(f64, u16)>;
}

/// HTTP/HTTPS checker
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("uppe-monitor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Checker for HttpChecker {
    async fn check(&self, endpoint: &EndpointSpec) -> Result<(f64, u16)> {
        let url = endpoint.url.as_deref().ok_or_else(|| anyhow!("endpoint has no url"))?;
        let method = Method::from_bytes(endpoint.method.as_bytes())
            .map_err(|_| anyhow!("invalid HTTP method: {}", endpoint.method))?;

        let mut request = self.client.request(method, url);

        for (key, value) in &endpoint.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        if let Some(body) = &endpoint.body {
            request = request.json(body);
        }

        // Latency covers the time until the response headers are received
        let start = Instant::now();
        let response = request.send().await?;
        let latency_ms = round2(start.elapsed().as_secs_f64() * 1000.0);

        Ok((latency_ms, response.status().as_u16()))
    }
}
