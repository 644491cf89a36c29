use std::{fmt, time::Duration};

use crate::{Result, error::Error};

pub const DEFAULT_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Value shipped in sample configs in place of a real key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";

/// Everything the client needs to reach the API. Passed in at construction so
/// tests can point it at a local server.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..self
        }
    }

    pub fn with_timeout(self, timeout: Option<Duration>) -> Self {
        Self { timeout, ..self }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Fails without touching the network when the key is blank or still the
    /// sample placeholder.
    pub fn validate(&self) -> Result<()> {
        let key = self.api_key.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            return Err(Error::MissingApiKey);
        }

        Ok(())
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
