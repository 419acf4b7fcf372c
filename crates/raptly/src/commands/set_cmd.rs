//! `raptly set ...` -- issue one control write through the entity layer.
//!
//! Each subcommand refreshes the owning family first (so the target
//! device and the API client exist), performs the write, and exits
//! non-zero when the cloud reports it unapplied.

use std::sync::Arc;

use raptly_core::entity::{Switch, TargetTemperatureNumber, UtilisationNumber};
use raptly_core::{Bridge, Snapshot};

use crate::cli::{SetCommand, TargetFamily};
use crate::error::CliError;

pub async fn handle(cmd: SetCommand, bridge: &Bridge) -> Result<(), CliError> {
    match cmd {
        SetCommand::Heating { device_id, state } => {
            let coordinator = bridge.brewzillas();
            coordinator.refresh().await?;
            ensure_known(&coordinator.snapshot(), &device_id)?;

            let switch = Switch::heating(Arc::clone(coordinator), device_id.clone());
            let applied = if state.as_bool() {
                switch.turn_on().await?
            } else {
                switch.turn_off().await?
            };
            report(applied, &device_id, &format!("heating {}", state.as_str()))
        }

        SetCommand::Pump { device_id, state } => {
            let coordinator = bridge.brewzillas();
            coordinator.refresh().await?;
            ensure_known(&coordinator.snapshot(), &device_id)?;

            let switch = Switch::pump(Arc::clone(coordinator), device_id.clone());
            let applied = if state.as_bool() {
                switch.turn_on().await?
            } else {
                switch.turn_off().await?
            };
            report(applied, &device_id, &format!("pump {}", state.as_str()))
        }

        SetCommand::HeatingUtilisation { device_id, percent } => {
            let coordinator = bridge.brewzillas();
            coordinator.refresh().await?;
            ensure_known(&coordinator.snapshot(), &device_id)?;

            let number = UtilisationNumber::heating(Arc::clone(coordinator), device_id.clone());
            let applied = number.set(percent).await?;
            report(applied, &device_id, &format!("heating utilisation {percent} %"))
        }

        SetCommand::PumpUtilisation { device_id, percent } => {
            let coordinator = bridge.brewzillas();
            coordinator.refresh().await?;
            ensure_known(&coordinator.snapshot(), &device_id)?;

            let number = UtilisationNumber::pump(Arc::clone(coordinator), device_id.clone());
            let applied = number.set(percent).await?;
            report(applied, &device_id, &format!("pump utilisation {percent} %"))
        }

        SetCommand::TargetTemp {
            device_id,
            value,
            family,
        } => {
            let unit = bridge.config().temperature_unit;
            let applied = match family {
                TargetFamily::Brewzilla => {
                    let coordinator = bridge.brewzillas();
                    coordinator.refresh().await?;
                    ensure_known(&coordinator.snapshot(), &device_id)?;

                    TargetTemperatureNumber::brewzilla(
                        Arc::clone(coordinator),
                        device_id.clone(),
                        unit,
                    )
                    .set(value)
                    .await?
                }
                TargetFamily::TemperatureController => {
                    let coordinator = bridge.temperature_controllers();
                    coordinator.refresh().await?;
                    ensure_known(&coordinator.snapshot(), &device_id)?;

                    TargetTemperatureNumber::temperature_controller(
                        Arc::clone(coordinator),
                        device_id.clone(),
                        unit,
                    )
                    .set(value)
                    .await?
                }
            };
            report(
                applied,
                &device_id,
                &format!("target temperature {value:.1} {}", unit.symbol()),
            )
        }
    }
}

fn ensure_known(snapshot: &Snapshot, device_id: &str) -> Result<(), CliError> {
    if snapshot.contains_key(device_id) {
        Ok(())
    } else {
        Err(CliError::DeviceNotFound {
            device_id: device_id.to_owned(),
        })
    }
}

fn report(applied: bool, device_id: &str, what: &str) -> Result<(), CliError> {
    if applied {
        println!("applied: {what} on {device_id}");
        Ok(())
    } else {
        Err(CliError::WriteRejected {
            device_id: device_id.to_owned(),
        })
    }
}
