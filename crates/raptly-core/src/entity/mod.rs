// ── Presentation entities ──
//
// The read/write contract consumers bind to. Each entity holds one
// coordinator and one device identifier, reads a single attribute out of
// the snapshot (with a defined default when the device or attribute is
// absent), and -- for writable entities -- pushes control writes through
// the coordinator's live API client. Confirmed writes are applied back
// via `Coordinator::commit_write`; entities never mutate the snapshot.

mod number;
mod sensor;
mod switch;

pub use number::{TargetTemperatureNumber, UtilisationKind, UtilisationNumber};
pub use sensor::{BatterySensor, ConnectionSensor, GravitySensor, TemperatureSensor};
pub use switch::{Switch, SwitchKind};

use serde_json::Value;

use crate::coordinator::Snapshot;

/// Round to one decimal place, the display precision used throughout.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Read one attribute of one device out of a snapshot.
pub(crate) fn attribute<'a>(
    snapshot: &'a Snapshot,
    device_id: &str,
    attribute: &str,
) -> Option<&'a Value> {
    snapshot.get(device_id)?.get(attribute)
}

/// A device's display name: its `name` attribute, or a family-labelled
/// fallback when the record has none.
pub fn device_name(snapshot: &Snapshot, family_label: &str, device_id: &str) -> String {
    attribute(snapshot, device_id, "name")
        .and_then(Value::as_str)
        .map_or_else(|| format!("{family_label} {device_id}"), str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn snapshot_with(id: &str, record: serde_json::Value) -> Snapshot {
        let serde_json::Value::Object(record) = record else {
            panic!("record must be an object")
        };
        let mut snapshot = Snapshot::new();
        snapshot.insert(id.to_owned(), record);
        snapshot
    }

    #[test]
    fn device_name_prefers_the_reported_name() {
        let snapshot = snapshot_with("bz-1", json!({ "name": "Brew Rig" }));
        assert_eq!(device_name(&snapshot, "BrewZilla", "bz-1"), "Brew Rig");
    }

    #[test]
    fn device_name_falls_back_to_label_and_id() {
        let snapshot = snapshot_with("bz-1", json!({}));
        assert_eq!(device_name(&snapshot, "BrewZilla", "bz-1"), "BrewZilla bz-1");
        assert_eq!(device_name(&snapshot, "Pill", "unknown"), "Pill unknown");
    }

    #[test]
    fn round1_half_rounds_away_from_zero() {
        assert_eq!(round1(20.04), 20.0);
        assert_eq!(round1(20.05), 20.1);
        assert_eq!(round1(-20.05), -20.1);
    }
}
