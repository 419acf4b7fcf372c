//! Shared configuration for the raptly CLI.
//!
//! TOML profiles, credential resolution (env var + keyring + plaintext),
//! and translation to `raptly_core::BridgeConfig`. Core never reads
//! config files -- everything on disk stops here.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use raptly_core::config::{DEFAULT_POLL_MINUTES, MAX_POLL_MINUTES, MIN_POLL_MINUTES};
use raptly_core::{BridgeConfig, TemperatureUnit};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("no profile named '{name}' in the config file")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named RAPT account profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Account email (the password-grant username).
    pub email: String,

    /// API secret (plaintext -- prefer keyring or env var).
    pub api_secret: Option<String>,

    /// Environment variable name containing the API secret.
    pub api_secret_env: Option<String>,

    /// Temperature display unit: "C" or "F".
    #[serde(default = "default_unit")]
    pub temperature_unit: String,

    /// Poll interval in minutes (1-60).
    #[serde(default = "default_poll_minutes")]
    pub poll_interval_minutes: u64,

    /// Target dev.rapt.io instead of the production cloud.
    #[serde(default)]
    pub use_dev_api: bool,

    /// Override the request timeout (seconds).
    pub timeout: Option<u64>,
}

fn default_unit() -> String {
    "C".into()
}
fn default_poll_minutes() -> u64 {
    DEFAULT_POLL_MINUTES
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "raptly", "raptly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("raptly");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment (`RAPT_`-prefixed vars).
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("RAPT_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the API secret from the credential chain:
/// profile's env var, then system keyring, then plaintext config.
pub fn resolve_api_secret(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.api_secret_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(entry) = keyring::Entry::new("raptly", &format!("{profile_name}/api-secret")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    if let Some(ref secret) = profile.api_secret {
        return Ok(SecretString::from(secret.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── BridgeConfig construction ───────────────────────────────────────

/// Validate a profile and produce a `BridgeConfig` from it.
pub fn profile_to_bridge_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<BridgeConfig, ConfigError> {
    if profile.email.is_empty() {
        return Err(ConfigError::Validation {
            field: "email".into(),
            reason: "must not be empty".into(),
        });
    }

    let minutes = profile.poll_interval_minutes;
    if !(MIN_POLL_MINUTES..=MAX_POLL_MINUTES).contains(&minutes) {
        return Err(ConfigError::Validation {
            field: "poll_interval_minutes".into(),
            reason: format!("{minutes} outside {MIN_POLL_MINUTES}..={MAX_POLL_MINUTES}"),
        });
    }

    let temperature_unit: TemperatureUnit =
        profile
            .temperature_unit
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "temperature_unit".into(),
                reason: format!("expected 'C' or 'F', got '{}'", profile.temperature_unit),
            })?;

    let api_secret = resolve_api_secret(profile, profile_name)?;

    Ok(BridgeConfig {
        email: profile.email.clone(),
        api_secret,
        temperature_unit,
        poll_interval: Duration::from_secs(minutes * 60),
        use_dev_api: profile.use_dev_api,
        request_timeout: Duration::from_secs(profile.timeout.unwrap_or(default_timeout())),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn profile() -> Profile {
        Profile {
            email: "brewer@example.com".into(),
            api_secret: Some("s3cret".into()),
            api_secret_env: None,
            temperature_unit: "C".into(),
            poll_interval_minutes: 3,
            use_dev_api: false,
            timeout: None,
        }
    }

    #[test]
    fn valid_profile_maps_to_bridge_config() {
        let config = profile_to_bridge_config(&profile(), "default").unwrap();
        assert_eq!(config.email, "brewer@example.com");
        assert_eq!(config.poll_interval, Duration::from_secs(180));
        assert_eq!(config.temperature_unit, TemperatureUnit::Celsius);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!config.use_dev_api);
    }

    #[test]
    fn fahrenheit_and_dev_flags_carry_through() {
        let mut p = profile();
        p.temperature_unit = "F".into();
        p.use_dev_api = true;
        p.timeout = Some(10);

        let config = profile_to_bridge_config(&p, "default").unwrap();
        assert_eq!(config.temperature_unit, TemperatureUnit::Fahrenheit);
        assert!(config.use_dev_api);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn poll_interval_outside_bounds_is_rejected() {
        for minutes in [0, 61] {
            let mut p = profile();
            p.poll_interval_minutes = minutes;
            let err = profile_to_bridge_config(&p, "default").unwrap_err();
            assert!(matches!(err, ConfigError::Validation { .. }), "minutes={minutes}: {err:?}");
        }
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let mut p = profile();
        p.temperature_unit = "K".into();
        let err = profile_to_bridge_config(&p, "default").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "temperature_unit"));
    }

    #[test]
    fn missing_credentials_are_reported_per_profile() {
        let mut p = profile();
        p.api_secret = None;
        let err = profile_to_bridge_config(&p, "cellar").unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { ref profile } if profile == "cellar"));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut cfg = Config::default();
        cfg.profiles.insert("default".into(), profile());

        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.default_profile.as_deref(), Some("default"));
        assert_eq!(parsed.profiles["default"].email, "brewer@example.com");
        assert_eq!(parsed.profiles["default"].poll_interval_minutes, 3);
    }
}
