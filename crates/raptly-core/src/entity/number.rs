// Bounded numeric controls.
//
// Utilisation percentages are BrewZilla-only integers; target
// temperatures exist on BrewZillas and temperature controllers with
// different native ranges. Out-of-range values are rejected locally,
// before any API call.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::config::TemperatureUnit;
use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::families::{BrewZillaCoordinator, TargetTemperatureApi, TemperatureControllerCoordinator};

use super::{attribute, round1};

use raptly_api::{BrewZillaClient, TemperatureControllerClient};

/// Which BrewZilla utilisation percentage a number drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilisationKind {
    Heating,
    Pump,
}

impl UtilisationKind {
    fn attribute(self) -> &'static str {
        match self {
            Self::Heating => "heatingUtilisation",
            Self::Pump => "pumpUtilisation",
        }
    }

    fn entity(self) -> &'static str {
        match self {
            Self::Heating => "heating utilisation",
            Self::Pump => "pump utilisation",
        }
    }
}

/// Integer percentage control (0-100, stepped by 5 in UIs).
pub struct UtilisationNumber {
    coordinator: Arc<BrewZillaCoordinator>,
    device_id: String,
    kind: UtilisationKind,
}

impl UtilisationNumber {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 100;
    pub const STEP: u8 = 5;

    pub fn heating(coordinator: Arc<BrewZillaCoordinator>, device_id: impl Into<String>) -> Self {
        Self {
            coordinator,
            device_id: device_id.into(),
            kind: UtilisationKind::Heating,
        }
    }

    pub fn pump(coordinator: Arc<BrewZillaCoordinator>, device_id: impl Into<String>) -> Self {
        Self {
            coordinator,
            device_id: device_id.into(),
            kind: UtilisationKind::Pump,
        }
    }

    pub fn kind(&self) -> UtilisationKind {
        self.kind
    }

    /// Current percentage, `0` when the device or attribute is absent.
    pub fn value(&self) -> u8 {
        let snapshot = self.coordinator.snapshot();
        attribute(&snapshot, &self.device_id, self.kind.attribute())
            .and_then(Value::as_f64)
            .map_or(0, |v| v.clamp(0.0, 100.0).round() as u8)
    }

    /// Apply a new percentage. Values above 100 never reach the API.
    pub async fn set(&self, percent: u8) -> Result<bool, CoreError> {
        if percent > Self::MAX {
            return Err(CoreError::OutOfRange {
                entity: self.kind.entity(),
                value: f64::from(percent),
                min: f64::from(Self::MIN),
                max: f64::from(Self::MAX),
            });
        }

        let api = self.coordinator.api().await?;
        let applied = match self.kind {
            UtilisationKind::Heating => api.set_heating_utilisation(&self.device_id, percent).await,
            UtilisationKind::Pump => api.set_pump_utilisation(&self.device_id, percent).await,
        };

        if applied {
            self.coordinator
                .commit_write(&self.device_id, self.kind.attribute(), json!(percent));
        }
        Ok(applied)
    }
}

/// Float temperature setpoint with per-family native bounds.
///
/// Reads and writes use the configured display unit; the stored and
/// transmitted value is always Celsius, converted exactly once in each
/// direction.
pub struct TargetTemperatureNumber<A: TargetTemperatureApi> {
    coordinator: Arc<Coordinator<A>>,
    device_id: String,
    unit: TemperatureUnit,
    min_celsius: f64,
    max_celsius: f64,
}

impl<A: TargetTemperatureApi> TargetTemperatureNumber<A> {
    pub const STEP: f64 = 0.1;

    /// Native setpoint shown before the device reports one.
    const DEFAULT_CELSIUS: f64 = 20.0;

    fn new(
        coordinator: Arc<Coordinator<A>>,
        device_id: impl Into<String>,
        unit: TemperatureUnit,
        min_celsius: f64,
        max_celsius: f64,
    ) -> Self {
        Self {
            coordinator,
            device_id: device_id.into(),
            unit,
            min_celsius,
            max_celsius,
        }
    }

    /// Current setpoint in the display unit, rounded to 0.1.
    pub fn value(&self) -> f64 {
        let snapshot = self.coordinator.snapshot();
        let celsius = attribute(&snapshot, &self.device_id, "targetTemperature")
            .and_then(Value::as_f64)
            .unwrap_or(Self::DEFAULT_CELSIUS);
        round1(self.unit.display(celsius))
    }

    /// `(min, max)` in the display unit.
    pub fn bounds(&self) -> (f64, f64) {
        (
            self.unit.display(self.min_celsius),
            self.unit.display(self.max_celsius),
        )
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Apply a setpoint given in the display unit. The value is
    /// converted back to Celsius once before transmission; out-of-range
    /// values never reach the API.
    pub async fn set(&self, display_value: f64) -> Result<bool, CoreError> {
        let celsius = self.unit.to_celsius(display_value);
        if celsius < self.min_celsius || celsius > self.max_celsius {
            return Err(CoreError::OutOfRange {
                entity: "target temperature",
                value: display_value,
                min: self.unit.display(self.min_celsius),
                max: self.unit.display(self.max_celsius),
            });
        }

        let api = self.coordinator.api().await?;
        let applied = api.set_target_temperature(&self.device_id, celsius).await;

        if applied {
            self.coordinator
                .commit_write(&self.device_id, "targetTemperature", json!(celsius));
        }
        Ok(applied)
    }
}

impl TargetTemperatureNumber<BrewZillaClient> {
    /// BrewZilla setpoint: 0-110 °C native range.
    pub fn brewzilla(
        coordinator: Arc<BrewZillaCoordinator>,
        device_id: impl Into<String>,
        unit: TemperatureUnit,
    ) -> Self {
        Self::new(coordinator, device_id, unit, 0.0, 110.0)
    }
}

impl TargetTemperatureNumber<TemperatureControllerClient> {
    /// Chamber controller setpoint: -20-120 °C native range.
    pub fn temperature_controller(
        coordinator: Arc<TemperatureControllerCoordinator>,
        device_id: impl Into<String>,
        unit: TemperatureUnit,
    ) -> Self {
        Self::new(coordinator, device_id, unit, -20.0, 120.0)
    }
}
