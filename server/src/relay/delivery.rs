//! Slack Delivery
//!
//! A single POST per notification. No retries: failures are reported to the
//! caller, which logs them and still acknowledges the inbound webhook.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use super::slack::SlackMessage;

/// Maximum number of response body characters kept for logging.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Outbound delivery failures.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Connection, TLS, or timeout failure.
    #[error("Slack request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Slack answered with a non-success status.
    #[error("Slack send failed ({status}): {body}")]
    Status { status: StatusCode, body: String },
}

/// Build the shared HTTP client used for deliveries.
pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("alert-relay/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// POST a message to a Slack webhook URL.
pub async fn send(
    client: &reqwest::Client,
    url: &str,
    message: &SlackMessage,
) -> Result<(), DeliveryError> {
    let response = client.post(url).json(message).send().await?;
    let status = response.status();

    if status.is_success() {
        debug!(%status, "Slack notification delivered");
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    Err(DeliveryError::Status { status, body })
}
