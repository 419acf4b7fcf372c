// BrewZilla (kettle controller) endpoints
//
// The only family with a full control surface: heating and pump toggles,
// utilisation percentages, and a target temperature setpoint. All writes
// take the device id and the new value as query parameters.

use serde_json::Value;
use tracing::debug;

use crate::client::{RaptHttp, bool_str};
use crate::endpoints::ApiEndpoints;
use crate::error::Error;

/// Typed client for the BrewZilla family.
///
/// Immutable per instance: the token and base URL are captured at
/// construction. Rotating the token means constructing a new client.
pub struct BrewZillaClient {
    inner: RaptHttp,
}

impl BrewZillaClient {
    pub fn new(http: reqwest::Client, endpoints: &ApiEndpoints, token: String) -> Self {
        Self {
            inner: RaptHttp::new(http, endpoints.base().clone(), token),
        }
    }

    /// The bearer token this client was constructed with.
    pub fn token(&self) -> &str {
        self.inner.token()
    }

    /// List all BrewZillas on the account.
    ///
    /// `GET /BrewZillas/GetBrewZillas`
    pub async fn list_brewzillas(&self) -> Result<Vec<Value>, Error> {
        debug!("listing brewzillas");
        self.inner.get_list("/BrewZillas/GetBrewZillas").await
    }

    /// `POST /BrewZillas/SetHeatingEnabled?brewZillaId=..&state=..`
    pub async fn set_heating_enabled(&self, device_id: &str, enabled: bool) -> bool {
        self.inner
            .post_flag(
                "/BrewZillas/SetHeatingEnabled",
                &[("brewZillaId", device_id), ("state", bool_str(enabled))],
            )
            .await
    }

    /// `POST /BrewZillas/SetPumpEnabled?brewZillaId=..&state=..`
    pub async fn set_pump_enabled(&self, device_id: &str, enabled: bool) -> bool {
        self.inner
            .post_flag(
                "/BrewZillas/SetPumpEnabled",
                &[("brewZillaId", device_id), ("state", bool_str(enabled))],
            )
            .await
    }

    /// `POST /BrewZillas/SetHeatingUtilisation?brewZillaId=..&utilisation=..`
    ///
    /// `percent` is an integer 0-100.
    pub async fn set_heating_utilisation(&self, device_id: &str, percent: u8) -> bool {
        self.inner
            .post_flag(
                "/BrewZillas/SetHeatingUtilisation",
                &[
                    ("brewZillaId", device_id),
                    ("utilisation", &percent.to_string()),
                ],
            )
            .await
    }

    /// `POST /BrewZillas/SetPumpUtilisation?brewZillaId=..&utilisation=..`
    pub async fn set_pump_utilisation(&self, device_id: &str, percent: u8) -> bool {
        self.inner
            .post_flag(
                "/BrewZillas/SetPumpUtilisation",
                &[
                    ("brewZillaId", device_id),
                    ("utilisation", &percent.to_string()),
                ],
            )
            .await
    }

    /// `POST /BrewZillas/SetTargetTemperature?brewZillaId=..&target=..`
    ///
    /// `celsius` is in the device's native unit.
    pub async fn set_target_temperature(&self, device_id: &str, celsius: f64) -> bool {
        self.inner
            .post_flag(
                "/BrewZillas/SetTargetTemperature",
                &[("brewZillaId", device_id), ("target", &celsius.to_string())],
            )
            .await
    }
}
