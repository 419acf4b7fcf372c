// Password-grant token management
//
// The RAPT cloud issues bearer tokens through an OAuth-style password
// grant: the account email plus a generated API secret are exchanged for
// an access token with a server-provided lifetime. The manager caches
// the token and hands out the cached value until a safety margin before
// the server-side expiry.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, body_preview};

/// Fixed OAuth client identifier the RAPT cloud expects.
const CLIENT_ID: &str = "rapt-user";

/// Tokens are considered expired this many seconds before the
/// server-provided lifetime runs out.
const EXPIRY_MARGIN_SECS: i64 = 300;

/// Lifetime assumed when the token response omits `expires_in`.
const DEFAULT_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expiry: DateTime<Utc>,
}

/// When a token issued at `issued` with the given lifetime stops being
/// usable: the margin keeps us from presenting a token that dies mid-flight.
fn expiry_after(issued: DateTime<Utc>, lifetime_secs: i64) -> DateTime<Utc> {
    issued + chrono::Duration::seconds(lifetime_secs - EXPIRY_MARGIN_SECS)
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

/// Owns the credential exchange and the cached bearer token.
///
/// The cache sits behind an async mutex held across the exchange, so
/// concurrent callers during a refresh coalesce into a single credential
/// POST. The raw token value never leaves this module except as the
/// return of [`get_token`](Self::get_token) -- consumers hold API client
/// instances, not credentials.
pub struct TokenManager {
    http: reqwest::Client,
    token_url: Url,
    email: String,
    api_secret: SecretString,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(
        http: reqwest::Client,
        token_url: Url,
        email: String,
        api_secret: SecretString,
    ) -> Self {
        Self {
            http,
            token_url,
            email,
            api_secret,
            cached: Mutex::new(None),
        }
    }

    /// Return a valid access token, exchanging credentials if the cached
    /// one is missing or expired.
    ///
    /// Failures are propagated and nothing partial is cached; the next
    /// caller retries the exchange.
    pub async fn get_token(&self) -> Result<String, Error> {
        let mut guard = self.cached.lock().await;

        if let Some(token) = guard.as_ref() {
            if Utc::now() < token.expiry {
                return Ok(token.value.clone());
            }
            debug!("cached token expired");
        }

        let token = self.fetch_token().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    /// One exchange attempt, reported as a plain pass/fail.
    ///
    /// Setup flows use this to check credentials before anything is
    /// saved; network failures and rejections are deliberately not
    /// distinguished.
    pub async fn validate(&self) -> bool {
        match self.fetch_token().await {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "credential validation failed");
                false
            }
        }
    }

    async fn fetch_token(&self) -> Result<CachedToken, Error> {
        debug!("requesting access token at {}", self.token_url);

        let resp = self
            .http
            .post(self.token_url.clone())
            .form(&[
                ("grant_type", "password"),
                ("client_id", CLIENT_ID),
                ("username", self.email.as_str()),
                ("password", self.api_secret.expose_secret()),
            ])
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("token exchange failed (HTTP {status}): {}", body_preview(&body)),
            });
        }

        let body: TokenResponse = resp.json().await.map_err(Error::Transport)?;

        let value = body
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::Authentication {
                message: "token response carried no access token".into(),
            })?;

        let lifetime = body.expires_in.unwrap_or(DEFAULT_LIFETIME_SECS);
        let token = CachedToken {
            value,
            expiry: expiry_after(Utc::now(), lifetime),
        };

        debug!(lifetime, "access token refreshed");
        Ok(token)
    }
}
