use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One pause window inside a session. Open while `pause_ended_at` is `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pause {
    pub id: String,
    pub session_id: String,
    pub pause_started_at: DateTime<Utc>,
    pub pause_ended_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<u64>,
}

impl Pause {
    pub fn open(session_id: &str, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            pause_started_at: at,
            pause_ended_at: None,
            duration_seconds: None,
        }
    }

    /// Close the window at `at`; a clock that stepped backwards yields zero.
    pub fn close(mut self, at: DateTime<Utc>) -> Self {
        let seconds = (at - self.pause_started_at).num_seconds().max(0) as u64;
        self.pause_ended_at = Some(at);
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn is_open(&self) -> bool {
        self.pause_ended_at.is_none()
    }
}
