//! Alert Relay
//!
//! Receives GitHub code scanning webhooks, verifies their HMAC-SHA256
//! signature, and forwards actionable alerts to a Slack incoming webhook.

pub mod api;
pub mod config;
pub mod relay;
