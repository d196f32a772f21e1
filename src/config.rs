use crate::constants::{
    ENV_API_KEY, ENV_BASE_URL, ENV_TIMEOUT_SECS, ENV_VERSION, NOTION_API_BASE_URL,
    NOTION_API_VERSION,
};
use crate::error::{NotionDbError, Result};
use crate::types::{ApiKey, ValidatedUrl};
use std::time::Duration;

/// Resolved connector configuration: credential, endpoint and API version.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub api_key: ApiKey,
    pub base_url: ValidatedUrl,
    pub notion_version: String,
    /// Per-request timeout; `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl ConnectorConfig {
    /// Configuration for the public API with the pinned version.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: default_base_url(),
            notion_version: NOTION_API_VERSION.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: ValidatedUrl) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_notion_version(mut self, version: impl Into<String>) -> Self {
        self.notion_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolves the configuration from the process environment.
    ///
    /// `NOTION_API_KEY` is required; `NOTION_API_BASE_URL`, `NOTION_VERSION`
    /// and `NOTION_TIMEOUT_SECS` override the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(ENV_API_KEY).ok_or_else(|| {
            NotionDbError::MissingConfiguration(format!(
                "{} environment variable not set",
                ENV_API_KEY
            ))
        })?;
        let mut config = Self::new(ApiKey::new(api_key)?);

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = ValidatedUrl::parse(&base_url)?;
        }
        if let Some(version) = lookup(ENV_VERSION) {
            config.notion_version = version;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                NotionDbError::MissingConfiguration(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT_SECS, secs
                ))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

fn default_base_url() -> ValidatedUrl {
    ValidatedUrl::parse(NOTION_API_BASE_URL).expect("Built-in API base URL should be valid")
}
