// Hydrometer (Pill) endpoints
//
// Read-only family: the floating hydrometer reports gravity, temperature
// and battery but accepts no control writes.

use serde_json::Value;
use tracing::debug;

use crate::client::RaptHttp;
use crate::endpoints::ApiEndpoints;
use crate::error::Error;

/// Typed client for the hydrometer family.
pub struct HydrometerClient {
    inner: RaptHttp,
}

impl HydrometerClient {
    pub fn new(http: reqwest::Client, endpoints: &ApiEndpoints, token: String) -> Self {
        Self {
            inner: RaptHttp::new(http, endpoints.base().clone(), token),
        }
    }

    /// The bearer token this client was constructed with.
    pub fn token(&self) -> &str {
        self.inner.token()
    }

    /// List all hydrometers on the account.
    ///
    /// `GET /Hydrometers/GetHydrometers`
    pub async fn list_hydrometers(&self) -> Result<Vec<Value>, Error> {
        debug!("listing hydrometers");
        self.inner.get_list("/Hydrometers/GetHydrometers").await
    }
}
