use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    #[default]
    Pending,
    Completed,
    Skipped,
}

impl ActionStatus {
    pub fn is_handled(&self) -> bool {
        !matches!(self, ActionStatus::Pending)
    }
}

/// Type-specific payload of an action, selected by the backend's `actionType`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(
    tag = "actionType",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ActionKind {
    AddContactToGoal {
        contact_id: String,
        goal_id: String,
        #[serde(default)]
        contact_name: Option<String>,
        #[serde(default)]
        goal_title: Option<String>,
    },
    AddMeetingNotes {
        contact_id: String,
        meeting_id: String,
        #[serde(default)]
        meeting_title: Option<String>,
        #[serde(default)]
        meeting_at: Option<DateTime<Utc>>,
    },
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::AddContactToGoal { .. } => "add_contact_to_goal",
            ActionKind::AddMeetingNotes { .. } => "add_meeting_notes",
        }
    }

    pub fn contact_id(&self) -> &str {
        match self {
            ActionKind::AddContactToGoal { contact_id, .. }
            | ActionKind::AddMeetingNotes { contact_id, .. } => contact_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    #[serde(default)]
    pub status: ActionStatus,
    #[serde(flatten)]
    pub kind: ActionKind,
}
