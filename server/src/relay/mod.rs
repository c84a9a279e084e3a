//! Code Scanning Alert Relay
//!
//! Verifies GitHub `code_scanning_alert` webhooks and forwards them to Slack
//! as a single best-effort POST.

pub mod delivery;
pub mod error;
pub mod events;
pub mod handlers;
pub mod signing;
pub mod slack;
