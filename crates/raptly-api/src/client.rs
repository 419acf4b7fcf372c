// Shared HTTP plumbing for the family clients
//
// Wraps `reqwest::Client` with bearer-auth header injection, URL
// construction against the selected endpoint pair, and the two request
// shapes the RAPT cloud uses: JSON-array list reads and query-parameter
// control writes. Family clients (brewzilla, hydrometer, temperature)
// are thin typed wrappers over this.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{Error, body_preview};

/// Every control write is bounded by this timeout; on expiry the write
/// resolves to "not applied" like any other failure.
pub(crate) const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Bearer-authenticated HTTP handle, immutable per instance.
///
/// The token is captured at construction and never swapped in place --
/// when the cached token rotates, the coordinator builds a fresh client
/// instead (see `raptly-core`).
pub(crate) struct RaptHttp {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl RaptHttp {
    pub(crate) fn new(http: reqwest::Client, base: Url, token: String) -> Self {
        Self { http, base, token }
    }

    /// The bearer token this handle was constructed with.
    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    /// Join a family path onto the API base: `{base}{path}`.
    fn url(&self, path: &str) -> Url {
        let base = self.base.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}")).expect("invalid API URL")
    }

    /// Authenticated GET expecting a JSON array of device records.
    ///
    /// Non-2xx responses are errors -- list endpoints are the primary
    /// data source and failures must reach the coordinator.
    pub(crate) async fn get_list(&self, path: &str) -> Result<Vec<Value>, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body: body_preview(&body),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str::<Vec<Value>>(&body).map_err(|err| Error::Deserialization {
            message: err.to_string(),
            body: body_preview(&body),
        })
    }

    /// Authenticated POST of a control write, parameters in the query
    /// string. Resolves to `true` iff the response status is exactly 200;
    /// every other status, timeout, or connection failure is `false`.
    pub(crate) async fn post_flag(&self, path: &str, query: &[(&str, &str)]) -> bool {
        let mut url = self.url(path);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        debug!("POST {url}");

        match self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .timeout(WRITE_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) => {
                let applied = resp.status() == StatusCode::OK;
                if !applied {
                    debug!(status = %resp.status(), "control write not applied");
                }
                applied
            }
            Err(err) => {
                debug!(error = %err, "control write failed");
                false
            }
        }
    }
}
