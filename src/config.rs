//! Provider configuration.
//!
//! The host passes `{ "url": ..., "token": ... }` to `configure`. Missing
//! values fall back to `STORYBLOK_URL` and `STORYBLOK_TOKEN`, and the URL
//! finally to the public management API.

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::error::ProviderError;
use crate::schema::{Attribute, Diagnostic, Schema};

/// Default management API endpoint.
pub const DEFAULT_URL: &str = "https://mapi.storyblok.com";
/// Environment variable consulted when `url` is not configured.
pub const URL_ENV: &str = "STORYBLOK_URL";
/// Environment variable consulted when `token` is not configured.
pub const TOKEN_ENV: &str = "STORYBLOK_TOKEN";

/// Provider configuration as written by the user.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Management API base URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Personal access token.
    #[serde(default)]
    pub token: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ProviderConfig {
    /// Parse the configuration object sent by the host. `null` is an empty config.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ProviderError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
            .map_err(|e| ProviderError::Configuration(format!("invalid provider config: {}", e)))
    }

    /// Schema of the provider configuration block.
    pub fn schema() -> Schema {
        Schema::v0()
            .with_attribute(
                "url",
                Attribute::optional_string().with_description(format!(
                    "Management API base URL. May also be provided via {} environment variable.",
                    URL_ENV
                )),
            )
            .with_attribute(
                "token",
                Attribute::optional_string()
                    .sensitive()
                    .with_description(format!(
                        "Personal access token. May also be provided via {} environment variable.",
                        TOKEN_ENV
                    )),
            )
    }

    /// Resolve against the process environment.
    pub fn resolve(&self) -> ResolvedConfig {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary environment lookup.
    ///
    /// Configured values win over the environment. Empty values count as unset.
    pub fn resolve_with(&self, env: impl Fn(&str) -> Option<String>) -> ResolvedConfig {
        let pick = |configured: &Option<String>, key: &str| {
            configured
                .clone()
                .filter(|v| !v.is_empty())
                .or_else(|| env(key).filter(|v| !v.is_empty()))
        };
        ResolvedConfig {
            url: pick(&self.url, URL_ENV).unwrap_or_else(|| DEFAULT_URL.to_string()),
            token: pick(&self.token, TOKEN_ENV).unwrap_or_default(),
        }
    }
}

/// Configuration after environment fallback and defaults.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Management API base URL.
    pub url: String,
    /// Personal access token, empty when none was found.
    pub token: String,
}

impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ResolvedConfig {
    /// Check the resolved values.
    ///
    /// A malformed URL is an error, a missing token only a warning.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        if let Err(e) = Url::parse(&self.url) {
            diagnostics.push(
                Diagnostic::error("Invalid Storyblok API URL")
                    .with_detail(format!("{:?} is not a valid URL: {}", self.url, e))
                    .with_attribute("url"),
            );
        }
        if self.token.is_empty() {
            diagnostics.push(
                Diagnostic::warning("Missing Storyblok API token")
                    .with_detail(format!(
                        "Set the token attribute or the {} environment variable",
                        TOKEN_ENV
                    ))
                    .with_attribute("token"),
            );
        }
        diagnostics
    }
}

/// Runtime options fixed when the provider is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Retries for throttled or failing requests.
    pub max_retries: u32,
    /// Log every request and response at debug level.
    pub log_traffic: bool,
    /// Timeout of a single HTTP attempt.
    pub timeout: Duration,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            max_retries: 10,
            log_traffic: false,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ProviderOptions {
    /// Set the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Enable or disable traffic logging.
    pub fn with_traffic_logging(mut self, enabled: bool) -> Self {
        self.log_traffic = enabled;
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
