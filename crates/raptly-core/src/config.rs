// ── Runtime bridge configuration ──
//
// These types describe one RAPT account and how to poll it. They carry
// credential data and tuning, but never touch disk -- the CLI (via
// raptly-config) constructs a `BridgeConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Poll interval bounds, in minutes. Enforced by the config layer.
pub const MIN_POLL_MINUTES: u64 = 1;
pub const MAX_POLL_MINUTES: u64 = 60;
pub const DEFAULT_POLL_MINUTES: u64 = 3;

/// Display unit for temperature-valued entities.
///
/// Device-native values are always Celsius; this only affects rendering
/// and the interpretation of user-entered setpoints.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
pub enum TemperatureUnit {
    #[default]
    #[strum(to_string = "C", serialize = "c", serialize = "celsius")]
    Celsius,
    #[strum(to_string = "F", serialize = "f", serialize = "fahrenheit")]
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a native Celsius value into this display unit.
    pub fn display(self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// Convert a value entered in this display unit back to Celsius.
    pub fn to_celsius(self, display: f64) -> f64 {
        match self {
            Self::Celsius => display,
            Self::Fahrenheit => (display - 32.0) * 5.0 / 9.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

/// Configuration for one bridge instance (one RAPT account).
///
/// Built by the CLI / config layer, passed to [`Bridge`](crate::Bridge)
/// -- core never reads config files.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// RAPT account email (the password-grant username).
    pub email: String,
    /// API secret generated in the RAPT portal.
    pub api_secret: SecretString,
    /// Display unit for temperature entities.
    pub temperature_unit: TemperatureUnit,
    /// How often each family is polled.
    pub poll_interval: Duration,
    /// Target the development host instead of production.
    pub use_dev_api: bool,
    /// Timeout for token and list requests. Control writes carry their
    /// own fixed 10-second timeout.
    pub request_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            api_secret: SecretString::from(String::new()),
            temperature_unit: TemperatureUnit::default(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_MINUTES * 60),
            use_dev_api: false,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn celsius_renders_unchanged() {
        assert_eq!(TemperatureUnit::Celsius.display(20.0), 20.0);
        assert_eq!(TemperatureUnit::Celsius.to_celsius(20.0), 20.0);
    }

    #[test]
    fn twenty_celsius_is_exactly_sixty_eight_fahrenheit() {
        assert_eq!(TemperatureUnit::Fahrenheit.display(20.0), 68.0);
    }

    #[test]
    fn fahrenheit_entry_converts_back_exactly_once() {
        let unit = TemperatureUnit::Fahrenheit;
        assert_eq!(unit.to_celsius(68.0), 20.0);
        // display(to_celsius(x)) must be the identity -- a second
        // conversion anywhere would break this.
        assert_eq!(unit.display(unit.to_celsius(212.0)), 212.0);
    }

    #[test]
    fn unit_parses_from_config_strings() {
        assert_eq!("C".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Celsius);
        assert_eq!("F".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Fahrenheit);
        assert_eq!(
            "fahrenheit".parse::<TemperatureUnit>().unwrap(),
            TemperatureUnit::Fahrenheit
        );
        assert!("K".parse::<TemperatureUnit>().is_err());
    }

    #[test]
    fn default_config_polls_every_three_minutes() {
        let config = BridgeConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(180));
        assert_eq!(config.temperature_unit, TemperatureUnit::Celsius);
        assert!(!config.use_dev_api);
    }
}
