//! Inbound Code Scanning Events
//!
//! The subset of GitHub's `code_scanning_alert` webhook payload the relay reads.
//! Unknown fields are ignored.

use serde::Deserialize;
use serde_json::Value;

use super::error::RelayError;

/// Top-level webhook payload.
///
/// Fields stay untyped until the event is known to be actionable, so any
/// well-formed JSON without a usable `action` and `alert` is acknowledged.
#[derive(Debug, Clone, Default)]
pub struct AlertEvent {
    pub action: Option<Value>,
    pub alert: Option<Value>,
    pub repository: Option<Value>,
}

/// Repository the alert was raised in.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

/// A code scanning alert.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeScanningAlert {
    #[serde(default)]
    pub severity: Option<String>,
    pub most_recent_instance: AlertInstance,
    pub html_url: String,
}

/// Most recent occurrence of an alert.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertInstance {
    #[serde(default)]
    pub rule: Option<Rule>,
    pub location: Location,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub description: Option<String>,
}

/// Source location of an alert instance.
#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub path: String,
    pub start_line: u64,
}

/// An event that passed the actionability check, with its alert decoded.
#[derive(Debug, Clone)]
pub struct ActionableAlert {
    pub action: String,
    pub alert: CodeScanningAlert,
    pub repository: Repository,
}

impl AlertEvent {
    /// Pick the relevant fields out of a decoded body.
    ///
    /// Non-object bodies yield an empty event.
    pub fn from_payload(mut payload: Value) -> Self {
        let mut take = |key: &str| {
            payload
                .get_mut(key)
                .map(Value::take)
                .filter(|v| !v.is_null())
        };
        Self {
            action: take("action"),
            alert: take("alert"),
            repository: take("repository"),
        }
    }

    /// Whether this event should produce a notification.
    ///
    /// Requires a truthy `action` and a truthy `alert`.
    pub fn is_actionable(&self) -> bool {
        self.action.as_ref().is_some_and(is_truthy) && self.alert.as_ref().is_some_and(is_truthy)
    }

    /// Decode the alert of an actionable event.
    ///
    /// Returns `Ok(None)` for events that should be acknowledged without a
    /// notification.
    pub fn into_actionable(self) -> Result<Option<ActionableAlert>, RelayError> {
        let (Some(action), Some(alert)) = (
            self.action.filter(is_truthy),
            self.alert.filter(is_truthy),
        ) else {
            return Ok(None);
        };

        let alert: CodeScanningAlert = serde_json::from_value(alert)?;
        let repository: Repository = match self.repository {
            Some(repository) => serde_json::from_value(repository)?,
            None => return Err(RelayError::MissingField("repository.full_name")),
        };
        let action = match action {
            Value::String(action) => action,
            other => other.to_string(),
        };

        Ok(Some(ActionableAlert {
            action,
            alert,
            repository,
        }))
    }
}

/// JSON truthiness: `null`, `false`, `0`, and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl CodeScanningAlert {
    /// Parsed severity level.
    pub fn severity(&self) -> Severity {
        self.severity
            .as_deref()
            .map_or(Severity::Other, Severity::from_label)
    }

    /// Rule description, `N/A` when absent or empty.
    pub fn rule_description(&self) -> &str {
        self.most_recent_instance
            .rule
            .as_ref()
            .and_then(|r| r.description.as_deref())
            .filter(|d| !d.is_empty())
            .unwrap_or("N/A")
    }
}

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    /// Anything not in the table above, including a missing severity.
    Other,
}

impl Severity {
    /// Parse a severity label. Matching is exact and case-sensitive.
    pub fn from_label(label: &str) -> Self {
        match label {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Other,
        }
    }

    /// Display emoji for this severity.
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Critical => "🔴",
            Self::High => "🟠",
            Self::Medium => "🟡",
            Self::Low => "🟢",
            Self::Other => "⚪",
        }
    }

    /// Slack attachment color keyword.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Critical => "danger",
            Self::High => "warning",
            Self::Medium | Self::Low | Self::Other => "good",
        }
    }
}
