// ── Core error types ──
//
// User-facing errors from raptly-core. Consumers never see raw reqwest
// failures: the `From<raptly_api::Error>` impl translates transport-layer
// errors into domain-appropriate variants. Control writes don't surface
// here at all -- they resolve to booleans at the API layer.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Credential exchange was rejected or produced no usable token.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// A list call or transport operation failed outside a refresh cycle.
    #[error("API request failed: {message}")]
    Api { message: String },

    /// A refresh cycle failed; the previous snapshot is still served.
    #[error("{family} refresh failed: {source}")]
    UpdateFailed {
        family: &'static str,
        #[source]
        source: raptly_api::Error,
    },

    /// An entity write was attempted before the coordinator built its
    /// first API client (i.e. before the bridge started).
    #[error("{family} API client not ready -- bridge not started")]
    NotReady { family: &'static str },

    /// A bounded control value fell outside its range; rejected locally
    /// without an API call.
    #[error("{entity}: value {value} outside {min}..={max}")]
    OutOfRange {
        entity: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Invalid runtime configuration.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<raptly_api::Error> for CoreError {
    fn from(err: raptly_api::Error) -> Self {
        match err {
            raptly_api::Error::Authentication { message } => Self::Auth { message },
            other => Self::Api {
                message: other.to_string(),
            },
        }
    }
}
