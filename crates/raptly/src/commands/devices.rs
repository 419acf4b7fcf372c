//! `raptly devices` -- one-shot listing of every family.
//!
//! Readings go through the entity layer (not raw snapshot fields) so the
//! output matches exactly what automation consumers would render,
//! including the display-unit conversion.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tabled::Tabled;

use raptly_core::entity::{
    self, BatterySensor, ConnectionSensor, GravitySensor, Switch, TargetTemperatureNumber,
    TemperatureSensor, UtilisationNumber,
};
use raptly_core::{Bridge, Snapshot, TemperatureUnit};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::render_list;

#[derive(Serialize, Tabled)]
struct BrewZillaRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "TEMP")]
    temperature: String,
    #[tabled(rename = "TARGET")]
    target: String,
    #[tabled(rename = "HEAT")]
    heating: String,
    #[tabled(rename = "HEAT %")]
    heating_utilisation: u8,
    #[tabled(rename = "PUMP")]
    pump: String,
    #[tabled(rename = "PUMP %")]
    pump_utilisation: u8,
    #[tabled(rename = "LINK")]
    connection: String,
}

#[derive(Serialize, Tabled)]
struct HydrometerRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "TEMP")]
    temperature: String,
    #[tabled(rename = "GRAVITY")]
    gravity: String,
    #[tabled(rename = "BATTERY")]
    battery: String,
    #[tabled(rename = "LINK")]
    connection: String,
}

#[derive(Serialize, Tabled)]
struct ControllerRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "TEMP")]
    temperature: String,
    #[tabled(rename = "TARGET")]
    target: String,
}

fn on_off(on: bool) -> String {
    if on { "on".into() } else { "off".into() }
}

fn sorted_ids(snapshot: &Snapshot) -> Vec<String> {
    let mut ids: Vec<String> = snapshot.keys().cloned().collect();
    ids.sort();
    ids
}

pub async fn handle(bridge: &Bridge, global: &GlobalOpts) -> Result<(), CliError> {
    bridge.refresh_all().await?;
    let unit = bridge.config().temperature_unit;

    let brewzilla_rows = brewzilla_rows(bridge, unit);
    let hydrometer_rows = hydrometer_rows(bridge, unit);
    let controller_rows = controller_rows(bridge, unit);

    if global.output == OutputFormat::Json {
        let combined = json!({
            "brewzillas": brewzilla_rows,
            "hydrometers": hydrometer_rows,
            "temperature_controllers": controller_rows,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&combined)
                .unwrap_or_else(|e| format!("serialize error: {e}"))
        );
        return Ok(());
    }

    println!("BrewZillas");
    println!("{}", render_list(global.output, &brewzilla_rows, |r| r.id.clone()));
    println!();
    println!("Hydrometers");
    println!("{}", render_list(global.output, &hydrometer_rows, |r| r.id.clone()));
    println!();
    println!("Temperature controllers");
    println!("{}", render_list(global.output, &controller_rows, |r| r.id.clone()));

    Ok(())
}

fn brewzilla_rows(bridge: &Bridge, unit: TemperatureUnit) -> Vec<BrewZillaRow> {
    let coordinator = bridge.brewzillas();
    let snapshot = coordinator.snapshot();

    sorted_ids(&snapshot)
        .into_iter()
        .map(|id| {
            let temperature = TemperatureSensor::new(Arc::clone(coordinator), id.clone(), unit);
            let target =
                TargetTemperatureNumber::brewzilla(Arc::clone(coordinator), id.clone(), unit);
            let heating = Switch::heating(Arc::clone(coordinator), id.clone());
            let pump = Switch::pump(Arc::clone(coordinator), id.clone());
            let heating_utilisation = UtilisationNumber::heating(Arc::clone(coordinator), id.clone());
            let pump_utilisation = UtilisationNumber::pump(Arc::clone(coordinator), id.clone());
            let connection = ConnectionSensor::new(Arc::clone(coordinator), id.clone());

            BrewZillaRow {
                name: entity::device_name(&snapshot, coordinator.label(), &id),
                temperature: format!("{:.1} {}", temperature.value(), unit.symbol()),
                target: format!("{:.1} {}", target.value(), unit.symbol()),
                heating: on_off(heating.is_on()),
                heating_utilisation: heating_utilisation.value(),
                pump: on_off(pump.is_on()),
                pump_utilisation: pump_utilisation.value(),
                connection: connection.state(),
                id,
            }
        })
        .collect()
}

fn hydrometer_rows(bridge: &Bridge, unit: TemperatureUnit) -> Vec<HydrometerRow> {
    let coordinator = bridge.hydrometers();
    let snapshot = coordinator.snapshot();

    sorted_ids(&snapshot)
        .into_iter()
        .map(|id| {
            let temperature = TemperatureSensor::new(Arc::clone(coordinator), id.clone(), unit);
            let gravity = GravitySensor::new(Arc::clone(coordinator), id.clone());
            let battery = BatterySensor::new(Arc::clone(coordinator), id.clone());
            let connection = ConnectionSensor::new(Arc::clone(coordinator), id.clone());

            HydrometerRow {
                name: entity::device_name(&snapshot, coordinator.label(), &id),
                temperature: format!("{:.1} {}", temperature.value(), unit.symbol()),
                gravity: format!("{:.3} SG", gravity.value()),
                battery: format!("{:.1} %", battery.value()),
                connection: connection.state(),
                id,
            }
        })
        .collect()
}

fn controller_rows(bridge: &Bridge, unit: TemperatureUnit) -> Vec<ControllerRow> {
    let coordinator = bridge.temperature_controllers();
    let snapshot = coordinator.snapshot();

    sorted_ids(&snapshot)
        .into_iter()
        .map(|id| {
            let temperature = TemperatureSensor::new(Arc::clone(coordinator), id.clone(), unit);
            let target = TargetTemperatureNumber::temperature_controller(
                Arc::clone(coordinator),
                id.clone(),
                unit,
            );

            ControllerRow {
                name: entity::device_name(&snapshot, coordinator.label(), &id),
                temperature: format!("{:.1} {}", temperature.value(), unit.symbol()),
                target: format!("{:.1} {}", target.value(), unit.symbol()),
                id,
            }
        })
        .collect()
}
