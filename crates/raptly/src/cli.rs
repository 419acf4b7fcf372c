//! Command-line surface: argument structs and enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

use raptly_core::TemperatureUnit;

#[derive(Parser)]
#[command(
    name = "raptly",
    version,
    about = "Bridge to the RAPT brewing cloud: poll devices, watch readings, issue control writes"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct GlobalOpts {
    /// Profile name from the config file.
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// RAPT account email (overrides the profile).
    #[arg(long, global = true)]
    pub email: Option<String>,

    /// Environment variable holding the API secret.
    #[arg(long, global = true, value_name = "VAR")]
    pub api_secret_env: Option<String>,

    /// Target the development host instead of production.
    #[arg(long, global = true)]
    pub dev: bool,

    /// Poll interval in minutes (1-60).
    #[arg(long, global = true, value_name = "MINUTES")]
    pub interval: Option<u64>,

    /// Temperature display unit.
    #[arg(long, global = true, value_enum)]
    pub unit: Option<UnitArg>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum UnitArg {
    /// Celsius (device native).
    C,
    /// Fahrenheit (display only).
    F,
}

impl From<UnitArg> for TemperatureUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::C => Self::Celsius,
            UnitArg::F => Self::Fahrenheit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Plain,
}

#[derive(Subcommand)]
pub enum Command {
    /// List all devices with their current readings.
    Devices,

    /// Run the bridge and print updates until interrupted.
    Watch,

    /// Issue a control write to a device.
    #[command(subcommand)]
    Set(SetCommand),

    /// Manage the configuration file.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum SetCommand {
    /// Toggle BrewZilla heating.
    Heating {
        device_id: String,
        #[arg(value_enum)]
        state: OnOff,
    },

    /// Toggle the BrewZilla pump.
    Pump {
        device_id: String,
        #[arg(value_enum)]
        state: OnOff,
    },

    /// Set BrewZilla heating utilisation (0-100 %).
    HeatingUtilisation { device_id: String, percent: u8 },

    /// Set BrewZilla pump utilisation (0-100 %).
    PumpUtilisation { device_id: String, percent: u8 },

    /// Set a target temperature, in the configured display unit.
    TargetTemp {
        device_id: String,
        value: f64,

        /// The device family holding the setpoint.
        #[arg(long, value_enum, default_value = "brewzilla")]
        family: TargetFamily,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OnOff {
    On,
    Off,
}

impl OnOff {
    pub fn as_bool(self) -> bool {
        matches!(self, Self::On)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TargetFamily {
    Brewzilla,
    TemperatureController,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile, validating credentials first.
    Init {
        #[arg(long)]
        email: String,

        /// Plaintext API secret to store in the config file
        /// (prefer --api-secret-env).
        #[arg(long)]
        api_secret: Option<String>,

        /// Environment variable that will hold the API secret at runtime.
        #[arg(long, value_name = "VAR")]
        api_secret_env: Option<String>,

        /// Temperature display unit for this profile.
        #[arg(long, value_enum, default_value = "c")]
        unit: UnitArg,

        /// Poll interval in minutes (1-60).
        #[arg(long, default_value_t = 3)]
        interval: u64,

        /// Use the development host.
        #[arg(long)]
        dev: bool,

        /// Skip the credential check.
        #[arg(long)]
        no_verify: bool,
    },

    /// Print the resolved configuration (secrets redacted).
    Show,

    /// Print the config file path.
    Path,
}
