// Shared transport configuration for building reqwest::Client instances.
//
// The token manager and all family clients share one HTTP client so the
// connection pool is reused. The timeout configured here bounds token
// and list calls; write calls carry their own tighter per-request
// timeout (see `client::WRITE_TIMEOUT`).

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("raptly/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Default timeout applied to token and list requests.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::Transport)
    }
}
