// raptly-core: coordination layer between raptly-api and consumers.

pub mod bridge;
pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod families;

// ── Primary re-exports ──────────────────────────────────────────────
pub use bridge::Bridge;
pub use config::{BridgeConfig, TemperatureUnit};
pub use coordinator::{Coordinator, DeviceRecord, FamilyClient, RefreshStatus, Snapshot};
pub use error::CoreError;
pub use families::{
    BrewZillaCoordinator, HydrometerCoordinator, TargetTemperatureApi,
    TemperatureControllerCoordinator,
};
