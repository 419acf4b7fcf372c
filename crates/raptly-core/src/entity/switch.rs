// Boolean controls (BrewZilla heating and pump).

use std::sync::Arc;

use serde_json::Value;

use crate::error::CoreError;
use crate::families::BrewZillaCoordinator;

use super::attribute;

/// Which BrewZilla toggle a switch drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchKind {
    Heating,
    Pump,
}

impl SwitchKind {
    fn attribute(self) -> &'static str {
        match self {
            Self::Heating => "heatingEnabled",
            Self::Pump => "pumpEnabled",
        }
    }
}

/// Boolean control bound to one BrewZilla.
pub struct Switch {
    coordinator: Arc<BrewZillaCoordinator>,
    device_id: String,
    kind: SwitchKind,
}

impl Switch {
    pub fn heating(coordinator: Arc<BrewZillaCoordinator>, device_id: impl Into<String>) -> Self {
        Self {
            coordinator,
            device_id: device_id.into(),
            kind: SwitchKind::Heating,
        }
    }

    pub fn pump(coordinator: Arc<BrewZillaCoordinator>, device_id: impl Into<String>) -> Self {
        Self {
            coordinator,
            device_id: device_id.into(),
            kind: SwitchKind::Pump,
        }
    }

    pub fn kind(&self) -> SwitchKind {
        self.kind
    }

    /// Current state, `false` when the device or attribute is absent.
    pub fn is_on(&self) -> bool {
        let snapshot = self.coordinator.snapshot();
        attribute(&snapshot, &self.device_id, self.kind.attribute())
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub async fn turn_on(&self) -> Result<bool, CoreError> {
        self.set(true).await
    }

    pub async fn turn_off(&self) -> Result<bool, CoreError> {
        self.set(false).await
    }

    /// Issue the control write. On an applied write the coordinator
    /// updates the cached state optimistically; an unapplied write
    /// (`Ok(false)`) leaves cached state untouched and is not retried.
    async fn set(&self, on: bool) -> Result<bool, CoreError> {
        let api = self.coordinator.api().await?;
        let applied = match self.kind {
            SwitchKind::Heating => api.set_heating_enabled(&self.device_id, on).await,
            SwitchKind::Pump => api.set_pump_enabled(&self.device_id, on).await,
        };

        if applied {
            self.coordinator
                .commit_write(&self.device_id, self.kind.attribute(), Value::Bool(on));
        }
        Ok(applied)
    }
}
