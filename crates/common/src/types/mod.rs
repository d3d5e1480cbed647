use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Liveness payload served by `/health`.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: String,
    /// RFC 3339, UTC
    pub timestamp: String,
}

impl Health {
    pub fn ok() -> Self {
        Self { status: "ok".to_string(), timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true) }
    }
}
