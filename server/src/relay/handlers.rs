//! Webhook Handler
//!
//! Method check, signature verification, payload decoding, and Slack
//! forwarding for a single inbound delivery.

use axum::{
    extract::State,
    http::{HeaderMap, Method},
};
use bytes::Bytes;
use tracing::{debug, error, info, warn};

use super::error::{RelayError, RelayResult};
use super::events::AlertEvent;
use super::{delivery, signing, slack};
use crate::api::AppState;

/// GitHub event name header (e.g. `code_scanning_alert`, `ping`).
const EVENT_HEADER: &str = "x-github-event";

/// GitHub delivery GUID header.
const DELIVERY_HEADER: &str = "x-github-delivery";

/// Receive a GitHub webhook and relay code scanning alerts to Slack.
///
/// Downstream delivery failures are logged and never change the response:
/// the sender only needs to know the event was received.
#[tracing::instrument(
    skip_all,
    fields(
        method = %method,
        github_event = header_str(&headers, EVENT_HEADER),
        github_delivery = header_str(&headers, DELIVERY_HEADER)
    )
)]
pub async fn receive_webhook(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> RelayResult<&'static str> {
    if method != Method::POST {
        return Err(RelayError::MethodNotAllowed);
    }

    authenticate(state.config.webhook_secret.as_deref(), &headers, &body)?;

    let payload: serde_json::Value = serde_json::from_slice(&body)?;
    let Some(alert) = AlertEvent::from_payload(payload).into_actionable()? else {
        debug!("Event has no alert to relay");
        return Ok("OK");
    };

    let message = slack::build_alert_message(&alert);
    info!(
        action = %alert.action,
        repository = %alert.repository.full_name,
        severity = ?alert.alert.severity(),
        "Relaying code scanning alert"
    );

    if let Err(e) = delivery::send(&state.http, &state.config.slack_webhook_url, &message).await {
        error!(error = %e, "Slack send failed");
    }

    Ok("OK")
}

/// Check the request signature against the configured secret.
fn authenticate(secret: Option<&str>, headers: &HeaderMap, body: &[u8]) -> RelayResult<()> {
    let signature = header_str(headers, signing::SIGNATURE_HEADER);
    let (Some(signature), Some(secret)) = (signature, secret) else {
        warn!("Rejecting webhook without signature or configured secret");
        return Err(RelayError::Unauthorized);
    };

    if !signing::verify_signature(secret, body, signature) {
        warn!("Rejecting webhook with invalid signature");
        return Err(RelayError::SignatureMismatch);
    }

    Ok(())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
