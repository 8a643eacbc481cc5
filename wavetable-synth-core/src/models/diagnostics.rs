use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Counters for debugging an engine session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionDiagnostics {
    pub session_id: Uuid,
    pub engines_created: u64,
    pub engines_destroyed: u64,
    pub commands_applied: u64,
    pub native_failures: u64,
    pub last_created_at: Option<DateTime<Utc>>,
}

impl SessionDiagnostics {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            engines_created: 0,
            engines_destroyed: 0,
            commands_applied: 0,
            native_failures: 0,
            last_created_at: None,
        }
    }

    /// Number of engine instances currently alive (0 or 1).
    pub fn live_engines(&self) -> u64 {
        self.engines_created - self.engines_destroyed
    }

    pub fn to_json(&self) -> String {
        // Serializing plain counters, a uuid and a timestamp cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl Default for SessionDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}
