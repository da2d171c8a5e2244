//! Logging and tracing utilities for the provider.
//!
//! All logs are written to **stderr** so stdout stays free for the host.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls log levels (e.g., `info`, `storyblok::http=debug`)
//!
//! # Examples
//!
//! ```bash
//! # Show info logs (default)
//! RUST_LOG=info ./provider
//!
//! # Dump management API traffic (requires traffic logging to be enabled)
//! RUST_LOG=storyblok::http=debug ./provider
//! ```

use std::borrow::Cow;
use std::time::Duration;

use reqwest::Url;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::client::types::Webhook;
use crate::client::{ApiRequest, Entity, RawResponse, TrafficObserver};

/// Log target of the traffic dumps.
pub const TRAFFIC_TARGET: &str = "storyblok::http";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

/// Initialize the default logging subscriber.
///
/// Respects `RUST_LOG` and defaults to `info`.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Initialize logging with a custom default level used when `RUST_LOG` is unset.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging_with_default(default_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(stderr_layer())
        .init();
}

/// Try to initialize logging, returning false if already initialized.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(stderr_layer())
        .try_init()
        .is_ok()
}

/// Dumps management API traffic at debug level under [`TRAFFIC_TARGET`].
///
/// Request and response bodies are logged as text. The token never reaches
/// this observer, and a webhook `secret` in a request body is replaced with
/// [`REDACTED`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TrafficLogger;

/// Placeholder logged instead of a webhook secret.
pub const REDACTED: &str = "<redacted>";

impl TrafficLogger {
    fn body_text(body: &[u8]) -> Cow<'_, str> {
        if body.is_empty() {
            Cow::Borrowed("<empty>")
        } else {
            String::from_utf8_lossy(body)
        }
    }

    /// Request body text with `webhook_endpoint.secret` masked.
    fn request_text(body: &[u8]) -> Cow<'_, str> {
        let Ok(mut value) = serde_json::from_slice::<Value>(body) else {
            return Self::body_text(body);
        };
        match value
            .get_mut(Webhook::ENVELOPE)
            .and_then(|endpoint| endpoint.get_mut("secret"))
        {
            Some(secret) if !secret.is_null() => {
                *secret = Value::String(REDACTED.to_string());
                Cow::Owned(value.to_string())
            }
            _ => Self::body_text(body),
        }
    }
}

impl TrafficObserver for TrafficLogger {
    fn on_request(&self, url: &Url, request: &ApiRequest, attempt: u32) {
        debug!(
            target: TRAFFIC_TARGET,
            method = %request.method,
            url = %url,
            attempt,
            body = %Self::request_text(request.body.as_deref().unwrap_or_default()),
            "request"
        );
    }

    fn on_response(&self, url: &Url, response: &RawResponse, elapsed: Duration) {
        debug!(
            target: TRAFFIC_TARGET,
            url = %url,
            status = response.status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            body = %Self::body_text(&response.body),
            "response"
        );
    }
}
