//! Usage telemetry
//!
//! Every completed action and every fatal error produces one tagged event.
//! The default sink writes events to the log file under the `telemetry`
//! target; no event ever carries a token or secret value.

use crate::error::ManagerError;
use serde_json::{json, Value};

pub const SUCCESS_TAGS: [&str; 4] = ["track", "gh-actions-manager", "github-actions", "success"];
pub const ERROR_TAGS: [&str; 4] = ["track", "gh-actions-manager", "github-actions", "error"];

const SUCCESS_EVENT_PREFIX: &str = "GitHub Actions Manager Success - ";
const ERROR_EVENT_PREFIX: &str = "GitHub Actions Manager Error - ";

/// Sink for usage events
pub trait Telemetry {
    fn track(&self, tags: &[&str], event: &str, metadata: &Value);
}

/// Record a completed action
pub fn track_success(telemetry: &dyn Telemetry, message: &str, metadata: Value) {
    let event = format!("{}{}", SUCCESS_EVENT_PREFIX, message);
    telemetry.track(&SUCCESS_TAGS, &event, &metadata);
}

/// Record the error that ends the process
pub fn track_error(telemetry: &dyn Telemetry, err: &ManagerError) {
    let event = format!("{}{}", ERROR_EVENT_PREFIX, err.user_message());
    let metadata = json!({
        "kind": err.kind(),
        "error": err.to_string(),
    });
    telemetry.track(&ERROR_TAGS, &event, &metadata);
}

/// Writes events through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTelemetry;

impl Telemetry for LogTelemetry {
    fn track(&self, tags: &[&str], event: &str, metadata: &Value) {
        let record = json!({
            "tags": tags,
            "event": event,
            "metadata": metadata,
        });
        if tags.contains(&"error") {
            log::error!(target: "telemetry", "{}", record);
        } else {
            log::info!(target: "telemetry", "{}", record);
        }
    }
}
