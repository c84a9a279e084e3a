//! Slack Notification Messages
//!
//! Incoming-webhook message shape (legacy attachments) built from a code
//! scanning alert.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::events::ActionableAlert;

/// Fixed headline title after the severity emoji.
pub const HEADLINE_TITLE: &str = "*New Code Scanning Alert*";

/// Footer shown under the attachment.
pub const FOOTER: &str = "GitHub Advanced Security";

/// A Slack incoming-webhook message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackMessage {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub color: String,
    pub fields: Vec<Field>,
    pub actions: Vec<Action>,
    pub footer: String,
    /// Seconds since the Unix epoch.
    pub ts: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl Field {
    fn new(title: &str, value: impl Into<String>, short: bool) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            short,
        }
    }
}

/// Attachment action button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub url: String,
    pub style: String,
}

/// Build the notification for an alert, stamped with the current time.
pub fn build_alert_message(event: &ActionableAlert) -> SlackMessage {
    build_alert_message_at(event, Utc::now())
}

/// Build the notification for an alert with an explicit timestamp.
pub fn build_alert_message_at(event: &ActionableAlert, now: DateTime<Utc>) -> SlackMessage {
    let alert = &event.alert;
    let severity = alert.severity();
    let emoji = severity.emoji();
    let severity_label = alert
        .severity
        .as_deref()
        .map_or_else(|| "UNKNOWN".to_string(), str::to_uppercase);
    let location = &alert.most_recent_instance.location;

    SlackMessage {
        text: format!("{emoji} {HEADLINE_TITLE}"),
        attachments: vec![Attachment {
            color: severity.color().to_string(),
            fields: vec![
                Field::new("Repository", event.repository.full_name.as_str(), true),
                Field::new("Severity", format!("{emoji} {severity_label}"), true),
                Field::new("Rule", alert.rule_description(), false),
                Field::new("File", format!("`{}`", location.path), true),
                Field::new("Line", location.start_line.to_string(), true),
            ],
            actions: vec![Action {
                kind: "button".into(),
                text: "View Alert".into(),
                url: alert.html_url.clone(),
                style: "primary".into(),
            }],
            footer: FOOTER.into(),
            ts: now.timestamp_millis() as f64 / 1000.0,
        }],
    }
}
