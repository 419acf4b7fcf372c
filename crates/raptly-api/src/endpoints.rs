// RAPT cloud endpoint selection
//
// The cloud exposes a production host and a development host with the
// same path layout. Which pair is used is a configuration decision made
// once at bridge construction; everything downstream just asks for
// `base()` or `token()`.

use url::Url;

const PRODUCTION_BASE: &str = "https://api.rapt.io/api";
const PRODUCTION_TOKEN: &str = "https://api.rapt.io/api/token";
const DEVELOPMENT_BASE: &str = "https://dev.rapt.io/api";
const DEVELOPMENT_TOKEN: &str = "https://dev.rapt.io/api/token";

/// A matched pair of API base URL and token endpoint.
#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    base: Url,
    token: Url,
}

impl ApiEndpoints {
    /// The production RAPT cloud.
    pub fn production() -> Self {
        Self {
            base: Url::parse(PRODUCTION_BASE).expect("static URL"),
            token: Url::parse(PRODUCTION_TOKEN).expect("static URL"),
        }
    }

    /// The development host (`dev.rapt.io`).
    pub fn development() -> Self {
        Self {
            base: Url::parse(DEVELOPMENT_BASE).expect("static URL"),
            token: Url::parse(DEVELOPMENT_TOKEN).expect("static URL"),
        }
    }

    /// Pick production or development from the configuration flag.
    pub fn select(use_dev: bool) -> Self {
        if use_dev {
            Self::development()
        } else {
            Self::production()
        }
    }

    /// An arbitrary base/token pair. Used by tests against a mock server.
    pub fn custom(base: Url, token: Url) -> Self {
        Self { base, token }
    }

    /// The API base URL family endpoints are joined onto.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// The password-grant token endpoint.
    pub fn token(&self) -> &Url {
        &self.token
    }
}
