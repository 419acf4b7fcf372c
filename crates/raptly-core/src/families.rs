// ── Family coordinator specializations ──
//
// The three device families, wired into the generic coordinator. Each
// impl only names the family and routes to the client's list call --
// everything else is the base coordinator's behavior.

use std::future::Future;

use serde_json::Value;

use raptly_api::{
    ApiEndpoints, BrewZillaClient, Error, HydrometerClient, TemperatureControllerClient,
};

use crate::coordinator::{Coordinator, FamilyClient};

pub type BrewZillaCoordinator = Coordinator<BrewZillaClient>;
pub type HydrometerCoordinator = Coordinator<HydrometerClient>;
pub type TemperatureControllerCoordinator = Coordinator<TemperatureControllerClient>;

impl FamilyClient for BrewZillaClient {
    const FAMILY: &'static str = "brewzilla";
    const LABEL: &'static str = "BrewZilla";

    fn build(http: reqwest::Client, endpoints: &ApiEndpoints, token: String) -> Self {
        Self::new(http, endpoints, token)
    }

    fn token(&self) -> &str {
        BrewZillaClient::token(self)
    }

    async fn list_devices(&self) -> Result<Vec<Value>, Error> {
        self.list_brewzillas().await
    }
}

impl FamilyClient for HydrometerClient {
    const FAMILY: &'static str = "hydrometer";
    const LABEL: &'static str = "Pill";

    fn build(http: reqwest::Client, endpoints: &ApiEndpoints, token: String) -> Self {
        Self::new(http, endpoints, token)
    }

    fn token(&self) -> &str {
        HydrometerClient::token(self)
    }

    async fn list_devices(&self) -> Result<Vec<Value>, Error> {
        self.list_hydrometers().await
    }
}

impl FamilyClient for TemperatureControllerClient {
    const FAMILY: &'static str = "temperature-controller";
    const LABEL: &'static str = "Temperature Controller";

    fn build(http: reqwest::Client, endpoints: &ApiEndpoints, token: String) -> Self {
        Self::new(http, endpoints, token)
    }

    fn token(&self) -> &str {
        TemperatureControllerClient::token(self)
    }

    async fn list_devices(&self) -> Result<Vec<Value>, Error> {
        self.list_temperature_controllers().await
    }
}

/// The two families that accept a temperature setpoint.
pub trait TargetTemperatureApi: FamilyClient {
    fn set_target_temperature(
        &self,
        device_id: &str,
        celsius: f64,
    ) -> impl Future<Output = bool> + Send;
}

impl TargetTemperatureApi for BrewZillaClient {
    async fn set_target_temperature(&self, device_id: &str, celsius: f64) -> bool {
        BrewZillaClient::set_target_temperature(self, device_id, celsius).await
    }
}

impl TargetTemperatureApi for TemperatureControllerClient {
    async fn set_target_temperature(&self, device_id: &str, celsius: f64) -> bool {
        TemperatureControllerClient::set_target_temperature(self, device_id, celsius).await
    }
}
