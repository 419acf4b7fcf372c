//! `raptly config ...` -- create, inspect, and locate the config file.

use raptly_core::Bridge;

use crate::cli::{ConfigCommand, GlobalOpts, UnitArg};
use crate::error::CliError;

pub async fn handle(cmd: ConfigCommand, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        ConfigCommand::Path => {
            println!("{}", raptly_config::config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = raptly_config::load_config_or_default();
            println!("config file: {}", raptly_config::config_path().display());
            println!(
                "default profile: {}",
                cfg.default_profile.as_deref().unwrap_or("-")
            );

            let mut names: Vec<&String> = cfg.profiles.keys().collect();
            names.sort();
            for name in names {
                let profile = &cfg.profiles[name];
                let secret_source = if profile.api_secret_env.is_some() {
                    "env"
                } else if profile.api_secret.is_some() {
                    "plaintext"
                } else {
                    "keyring/unset"
                };
                println!(
                    "[{name}] email={} unit={} interval={}m dev={} secret={secret_source}",
                    profile.email,
                    profile.temperature_unit,
                    profile.poll_interval_minutes,
                    profile.use_dev_api,
                );
            }
            Ok(())
        }

        ConfigCommand::Init {
            email,
            api_secret,
            api_secret_env,
            unit,
            interval,
            dev,
            no_verify,
        } => {
            let profile_name = global
                .profile
                .clone()
                .unwrap_or_else(|| "default".into());

            let profile = raptly_config::Profile {
                email,
                api_secret,
                api_secret_env,
                temperature_unit: match unit {
                    UnitArg::C => "C".into(),
                    UnitArg::F => "F".into(),
                },
                poll_interval_minutes: interval,
                use_dev_api: dev,
                timeout: None,
            };

            // Validates bounds and resolves the secret before anything
            // is written to disk.
            let bridge_config = raptly_config::profile_to_bridge_config(&profile, &profile_name)?;

            if no_verify {
                tracing::info!("skipping credential check");
            } else {
                let bridge = Bridge::new(bridge_config)?;
                // Deliberately generic: a network failure and a bad
                // secret report the same way at setup time.
                if !bridge.token_manager().validate().await {
                    return Err(CliError::AuthFailed);
                }
                println!("credentials verified");
            }

            let mut cfg = raptly_config::load_config_or_default();
            if cfg.default_profile.is_none() {
                cfg.default_profile = Some(profile_name.clone());
            }
            cfg.profiles.insert(profile_name.clone(), profile);
            raptly_config::save_config(&cfg)?;

            println!(
                "profile '{profile_name}' saved to {}",
                raptly_config::config_path().display()
            );
            Ok(())
        }
    }
}
