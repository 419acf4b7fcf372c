//! `raptly watch` -- run the bridge and print updates until Ctrl-C.

use owo_colors::OwoColorize;
use serde_json::Value;

use raptly_core::entity::device_name;
use raptly_core::{Bridge, Snapshot};

use crate::error::CliError;

pub async fn handle(bridge: &Bridge) -> Result<(), CliError> {
    bridge.start().await?;

    let mut brewzillas = bridge.brewzillas().subscribe();
    let mut hydrometers = bridge.hydrometers().subscribe();
    let mut controllers = bridge.temperature_controllers().subscribe();

    let bz_label = bridge.brewzillas().label();
    let hy_label = bridge.hydrometers().label();
    let tc_label = bridge.temperature_controllers().label();

    println!("watching (Ctrl-C to stop)");
    print_summary(bz_label, &bridge.brewzillas().snapshot());
    print_summary(hy_label, &bridge.hydrometers().snapshot());
    print_summary(tc_label, &bridge.temperature_controllers().snapshot());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = brewzillas.changed() => {
                if changed.is_err() { break; }
                let snapshot = brewzillas.borrow_and_update().clone();
                print_summary(bz_label, &snapshot);
            }
            changed = hydrometers.changed() => {
                if changed.is_err() { break; }
                let snapshot = hydrometers.borrow_and_update().clone();
                print_summary(hy_label, &snapshot);
            }
            changed = controllers.changed() => {
                if changed.is_err() { break; }
                let snapshot = controllers.borrow_and_update().clone();
                print_summary(tc_label, &snapshot);
            }
        }
    }

    bridge.shutdown().await;
    Ok(())
}

fn print_summary(label: &str, snapshot: &Snapshot) {
    if snapshot.is_empty() {
        println!("{}: no devices", label.cyan());
        return;
    }

    let mut ids: Vec<&String> = snapshot.keys().collect();
    ids.sort();

    for id in ids {
        let name = device_name(snapshot, label, id);
        let record = &snapshot[id];
        match record.get("temperature").and_then(Value::as_f64) {
            Some(celsius) => println!("{} {name}: {celsius:.1} °C", label.cyan()),
            None => println!("{} {name}", label.cyan()),
        }
    }
}
