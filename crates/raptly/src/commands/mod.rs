pub mod config_cmd;
pub mod devices;
pub mod set_cmd;
pub mod watch;

use raptly_core::Bridge;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch the commands that need a bridge instance.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let bridge_config = crate::config::build_bridge_config(global)?;
    let bridge = Bridge::new(bridge_config)?;

    match cmd {
        Command::Devices => devices::handle(&bridge, global).await,
        Command::Watch => watch::handle(&bridge).await,
        Command::Set(set) => set_cmd::handle(set, &bridge).await,
        Command::Config(_) | Command::Completions { .. } => unreachable!("handled in main"),
    }
}
