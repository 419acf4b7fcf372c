use thiserror::Error;

/// Top-level error type for the `raptly-api` crate.
///
/// Covers the credential exchange, transport failures, and list-endpoint
/// responses. Write endpoints never surface here -- they collapse every
/// negative outcome into `false` at the call site. `raptly-core` maps
/// these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// Credential exchange failed (non-200 response or no usable token).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A list endpoint returned a non-2xx status. The body is preserved
    /// (truncated) because it usually names the rejected request.
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON deserialization failed, with a body preview for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates the credentials (or the
    /// token minted from them) were rejected.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::Api { status: 401, .. }
        )
    }
}

/// Clip a response body to a short preview, respecting char boundaries.
pub(crate) fn body_preview(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_owned(),
    }
}
