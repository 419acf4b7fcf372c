//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use raptly_core::CoreError;

/// Exit codes reported to the shell.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Authentication failed")]
    #[diagnostic(
        code(raptly::auth_failed),
        help(
            "Verify your account email and API secret.\n\
             Secrets are generated in the RAPT portal under Account > API Secrets.\n\
             Run: raptly config init --email <email> --api-secret-env RAPT_SECRET"
        )
    )]
    AuthFailed,

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(raptly::no_credentials),
        help("Run: raptly config init, or set the variable named by api_secret_env.")
    )]
    NoCredentials { profile: String },

    #[error("No configuration file found at {path}")]
    #[diagnostic(
        code(raptly::no_config),
        help("Run: raptly config init, or pass --email and --api-secret-env.")
    )]
    NoConfig { path: String },

    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(raptly::validation))]
    Validation { field: String, reason: String },

    #[error("Device '{device_id}' not found")]
    #[diagnostic(
        code(raptly::not_found),
        help("Run: raptly devices to list known device ids.")
    )]
    DeviceNotFound { device_id: String },

    #[error("Write not applied to device '{device_id}'")]
    #[diagnostic(
        code(raptly::write_rejected),
        help(
            "The cloud rejected the control write or the device is offline.\n\
             Check its connection state with: raptly devices"
        )
    )]
    WriteRejected { device_id: String },

    #[error(transparent)]
    #[diagnostic(code(raptly::core))]
    Core(#[from] CoreError),

    #[error(transparent)]
    #[diagnostic(code(raptly::config))]
    Config(#[from] raptly_config::ConfigError),

    #[error("IO error: {0}")]
    #[diagnostic(code(raptly::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Core(CoreError::Auth { .. }) => exit_code::AUTH,
            Self::Core(CoreError::UpdateFailed { source, .. }) if source.is_auth() => {
                exit_code::AUTH
            }
            Self::Core(CoreError::UpdateFailed { .. } | CoreError::Api { .. }) => {
                exit_code::CONNECTION
            }
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}
