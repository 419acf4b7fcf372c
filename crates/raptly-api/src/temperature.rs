// Temperature controller endpoints
//
// Fermentation chamber controllers: readable like the other families,
// writable only for the target temperature setpoint.

use serde_json::Value;
use tracing::debug;

use crate::client::RaptHttp;
use crate::endpoints::ApiEndpoints;
use crate::error::Error;

/// Typed client for the temperature controller family.
pub struct TemperatureControllerClient {
    inner: RaptHttp,
}

impl TemperatureControllerClient {
    pub fn new(http: reqwest::Client, endpoints: &ApiEndpoints, token: String) -> Self {
        Self {
            inner: RaptHttp::new(http, endpoints.base().clone(), token),
        }
    }

    /// The bearer token this client was constructed with.
    pub fn token(&self) -> &str {
        self.inner.token()
    }

    /// List all temperature controllers on the account.
    ///
    /// `GET /TemperatureControllers/GetTemperatureControllers`
    pub async fn list_temperature_controllers(&self) -> Result<Vec<Value>, Error> {
        debug!("listing temperature controllers");
        self.inner
            .get_list("/TemperatureControllers/GetTemperatureControllers")
            .await
    }

    /// `POST /TemperatureControllers/SetTargetTemperature?temperatureControllerId=..&target=..`
    ///
    /// `celsius` is in the device's native unit.
    pub async fn set_target_temperature(&self, device_id: &str, celsius: f64) -> bool {
        self.inner
            .post_flag(
                "/TemperatureControllers/SetTargetTemperature",
                &[
                    ("temperatureControllerId", device_id),
                    ("target", &celsius.to_string()),
                ],
            )
            .await
    }
}
