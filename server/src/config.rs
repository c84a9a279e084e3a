//! Relay Configuration
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default inbound body limit (1 MiB).
const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Default timeout for the outbound Slack call.
const DEFAULT_DELIVERY_TIMEOUT_SECS: u64 = 5;

/// Relay configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// Shared secret used to verify `x-hub-signature-256` (optional).
    ///
    /// When unset, every webhook is rejected as unauthorized.
    pub webhook_secret: Option<String>,

    /// Slack incoming-webhook (or Workflow Builder) URL
    pub slack_webhook_url: String,

    /// Outbound delivery timeout in seconds (default: 5)
    pub delivery_timeout_secs: u64,

    /// Maximum inbound request body in bytes (default: 1MB)
    pub max_body_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let slack_webhook_url =
            env::var("SLACK_WEBHOOK_URL").context("SLACK_WEBHOOK_URL must be set")?;
        reqwest::Url::parse(&slack_webhook_url)
            .context("SLACK_WEBHOOK_URL must be an absolute URL")?;

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            webhook_secret: env::var("GITHUB_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            slack_webhook_url,
            delivery_timeout_secs: env::var("DELIVERY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DELIVERY_TIMEOUT_SECS),
            max_body_size: env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_SIZE),
        })
    }

    /// Check if a webhook secret is configured.
    #[must_use]
    pub const fn has_secret(&self) -> bool {
        self.webhook_secret.is_some()
    }

    /// Outbound delivery timeout as a [`Duration`].
    #[must_use]
    pub const fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_secs)
    }

    /// Create a default configuration for testing.
    ///
    /// The Slack URL points at a closed local port; tests that observe
    /// delivery override it with the address of a capture server.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            webhook_secret: Some("test-secret".into()),
            slack_webhook_url: "http://127.0.0.1:9/hooks/test".into(),
            delivery_timeout_secs: 2,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}
