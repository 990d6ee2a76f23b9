use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Action;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        }
    }
}

/// A timed work block as persisted by the backend, with its ordered actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipSession {
    pub id: String,
    pub duration_minutes: u32,
    /// When the countdown began; may be later than `started_at`.
    pub timer_started_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_paused_duration_seconds: u64,
    pub status: SessionStatus,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl RelationshipSession {
    pub fn duration_seconds(&self) -> u64 {
        u64::from(self.duration_minutes) * 60
    }
}
