// Read-only sensors.
//
// Temperature is family-agnostic (every family reports one); gravity and
// battery exist only on hydrometers; connection state is a string enum
// the cloud reports per device.

use std::sync::Arc;

use serde_json::Value;

use crate::config::TemperatureUnit;
use crate::coordinator::{Coordinator, FamilyClient};
use crate::families::HydrometerCoordinator;

use super::{attribute, round1};

/// Current temperature reading for any family.
///
/// Values are stored in Celsius; conversion into the configured display
/// unit happens here, at render time only.
pub struct TemperatureSensor<A: FamilyClient> {
    coordinator: Arc<Coordinator<A>>,
    device_id: String,
    unit: TemperatureUnit,
}

impl<A: FamilyClient> TemperatureSensor<A> {
    pub fn new(
        coordinator: Arc<Coordinator<A>>,
        device_id: impl Into<String>,
        unit: TemperatureUnit,
    ) -> Self {
        Self {
            coordinator,
            device_id: device_id.into(),
            unit,
        }
    }

    /// Reading in the display unit, rounded to 0.1. `0.0` when the
    /// device or attribute is absent.
    pub fn value(&self) -> f64 {
        let snapshot = self.coordinator.snapshot();
        match attribute(&snapshot, &self.device_id, "temperature").and_then(Value::as_f64) {
            Some(celsius) => round1(self.unit.display(celsius)),
            None => 0.0,
        }
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }
}

/// Specific gravity reported by a hydrometer.
pub struct GravitySensor {
    coordinator: Arc<HydrometerCoordinator>,
    device_id: String,
}

impl GravitySensor {
    pub fn new(coordinator: Arc<HydrometerCoordinator>, device_id: impl Into<String>) -> Self {
        Self {
            coordinator,
            device_id: device_id.into(),
        }
    }

    /// Gravity normalized into specific-gravity form and rounded to
    /// three decimals. `0.0` when absent.
    pub fn value(&self) -> f64 {
        let snapshot = self.coordinator.snapshot();
        match attribute(&snapshot, &self.device_id, "gravity").and_then(Value::as_f64) {
            Some(gravity) => normalize_gravity(gravity),
            None => 0.0,
        }
    }
}

/// Some firmware revisions report gravity scaled up (1052 rather than
/// 1.052); divide back down into the specific-gravity band.
fn normalize_gravity(mut gravity: f64) -> f64 {
    while gravity > 10.0 {
        gravity /= 10.0;
    }
    (gravity * 1000.0).round() / 1000.0
}

/// Battery percentage reported by a hydrometer.
pub struct BatterySensor {
    coordinator: Arc<HydrometerCoordinator>,
    device_id: String,
}

impl BatterySensor {
    pub fn new(coordinator: Arc<HydrometerCoordinator>, device_id: impl Into<String>) -> Self {
        Self {
            coordinator,
            device_id: device_id.into(),
        }
    }

    /// Battery percent rounded to 0.1. `0.0` when absent.
    pub fn value(&self) -> f64 {
        let snapshot = self.coordinator.snapshot();
        attribute(&snapshot, &self.device_id, "battery")
            .and_then(Value::as_f64)
            .map_or(0.0, round1)
    }
}

/// Connection state for any family.
pub struct ConnectionSensor<A: FamilyClient> {
    coordinator: Arc<Coordinator<A>>,
    device_id: String,
}

impl<A: FamilyClient> ConnectionSensor<A> {
    pub fn new(coordinator: Arc<Coordinator<A>>, device_id: impl Into<String>) -> Self {
        Self {
            coordinator,
            device_id: device_id.into(),
        }
    }

    /// The cloud's connection state string, `"Disconnected"` when the
    /// device or attribute is absent.
    pub fn state(&self) -> String {
        let snapshot = self.coordinator.snapshot();
        attribute(&snapshot, &self.device_id, "connectionState")
            .and_then(Value::as_str)
            .unwrap_or("Disconnected")
            .to_owned()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == "Connected"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::normalize_gravity;

    #[test]
    fn gravity_already_in_band_is_only_rounded() {
        assert_eq!(normalize_gravity(1.0523), 1.052);
        assert_eq!(normalize_gravity(1.0525), 1.053);
    }

    #[test]
    fn scaled_gravity_is_divided_back_down() {
        assert_eq!(normalize_gravity(1052.0), 1.052);
        assert_eq!(normalize_gravity(10.52), 1.052);
    }

    #[test]
    fn low_gravity_passes_through() {
        assert_eq!(normalize_gravity(0.998), 0.998);
    }
}
