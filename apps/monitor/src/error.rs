use std::io::Error as IoError;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no endpoints configured")]
    EmptyConfig,

    #[error(
        "no endpoints were processed. Please ensure the configuration file contains a url key in at least one entry"
    )]
    NoEndpointsProcessed,

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("failed to write report: {0:#}")]
    Output(#[from] IoError),
}
