//! Resolution of CLI flags + config file into a `BridgeConfig`.

use std::time::Duration;

use secrecy::SecretString;

use raptly_core::BridgeConfig;
use raptly_core::config::{MAX_POLL_MINUTES, MIN_POLL_MINUTES};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The active profile name: `--profile` flag, then the config file's
/// `default_profile`, then `"default"`.
pub fn active_profile_name(global: &GlobalOpts, cfg: &raptly_config::Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `BridgeConfig` from the config file, profile, and CLI
/// overrides. Flags win over the profile; a missing profile can be
/// compensated with `--email` + `--api-secret-env`.
pub fn build_bridge_config(global: &GlobalOpts) -> Result<BridgeConfig, CliError> {
    let cfg = raptly_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut bridge_config = if let Some(profile) = cfg.profiles.get(&profile_name) {
        raptly_config::profile_to_bridge_config(profile, &profile_name)?
    } else if let Some(ref email) = global.email {
        BridgeConfig {
            email: email.clone(),
            api_secret: flag_secret(global, &profile_name)?,
            ..BridgeConfig::default()
        }
    } else {
        return Err(CliError::NoConfig {
            path: raptly_config::config_path().display().to_string(),
        });
    };

    // CLI flag overrides
    if let Some(ref email) = global.email {
        bridge_config.email = email.clone();
    }
    if global.dev {
        bridge_config.use_dev_api = true;
    }
    if let Some(unit) = global.unit {
        bridge_config.temperature_unit = unit.into();
    }
    if let Some(minutes) = global.interval {
        if !(MIN_POLL_MINUTES..=MAX_POLL_MINUTES).contains(&minutes) {
            return Err(CliError::Validation {
                field: "interval".into(),
                reason: format!("{minutes} outside {MIN_POLL_MINUTES}..={MAX_POLL_MINUTES}"),
            });
        }
        bridge_config.poll_interval = Duration::from_secs(minutes * 60);
    }

    Ok(bridge_config)
}

/// Resolve the API secret from `--api-secret-env` alone (no profile).
fn flag_secret(global: &GlobalOpts, profile_name: &str) -> Result<SecretString, CliError> {
    if let Some(ref var) = global.api_secret_env {
        if let Ok(val) = std::env::var(var) {
            return Ok(SecretString::from(val));
        }
    }
    Err(CliError::NoCredentials {
        profile: profile_name.into(),
    })
}
