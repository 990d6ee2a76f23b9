use serde::Serialize;

use crate::completion::CompletionPhase;
use crate::error::SessionError;
use crate::models::{Action, ActionKind};
use crate::session::SessionSnapshot;
use crate::timer::TimerStatus;

/// Display data for one action, chosen by its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCard {
    pub action_id: String,
    pub kind: &'static str,
    pub title: String,
    pub subtitle: Option<String>,
    pub contact_id: String,
}

impl From<&Action> for ActionCard {
    fn from(action: &Action) -> Self {
        let (title, subtitle) = match &action.kind {
            ActionKind::AddContactToGoal {
                contact_name,
                goal_title,
                ..
            } => (
                format!(
                    "Add {} to a goal",
                    contact_name.as_deref().unwrap_or("this contact")
                ),
                goal_title.clone(),
            ),
            ActionKind::AddMeetingNotes {
                meeting_title,
                meeting_at,
                ..
            } => (
                format!(
                    "Add notes for {}",
                    meeting_title.as_deref().unwrap_or("your meeting")
                ),
                meeting_at.as_ref().map(|at| at.format("%b %-d, %H:%M").to_string()),
            ),
        };

        Self {
            action_id: action.id.clone(),
            kind: action.kind.as_str(),
            title,
            subtitle,
            contact_id: action.kind.contact_id().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EscapeRoute {
    ReturnToDashboard,
}

/// Timer strip shown above every in-session view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerBar {
    pub remaining_seconds: u64,
    pub label: String,
    pub paused: bool,
    pub expired: bool,
}

impl TimerBar {
    fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        Self {
            remaining_seconds: snapshot.remaining_seconds,
            label: format_clock(snapshot.remaining_seconds),
            paused: snapshot.timer_status == TimerStatus::Paused,
            expired: snapshot.timer_status == TimerStatus::Expired,
        }
    }
}

/// What the session screen renders, shared by the desktop and mobile layouts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum SessionView {
    #[serde(rename_all = "camelCase")]
    LoadFailed { message: String, escape: EscapeRoute },
    #[serde(rename_all = "camelCase")]
    Working {
        timer: TimerBar,
        card: ActionCard,
        /// 1-based position of the card among all actions.
        position: usize,
        total: usize,
        progress: f64,
        celebrating: Option<String>,
        alert: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    AllDone {
        timer: TimerBar,
        total: usize,
        celebrating: Option<String>,
        alert: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    CompletionPrompt {
        total: usize,
        alert: Option<String>,
    },
    /// Complete request in flight; the end control is disabled.
    Ending,
    Ended,
}

impl SessionView {
    pub fn load_failed(err: &SessionError) -> Self {
        SessionView::LoadFailed {
            message: err.to_string(),
            escape: EscapeRoute::ReturnToDashboard,
        }
    }

    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        let alert = snapshot.end_error.clone();
        match snapshot.completion {
            CompletionPhase::Terminated => return SessionView::Ended,
            CompletionPhase::Ending => return SessionView::Ending,
            CompletionPhase::PromptPending => {
                return SessionView::CompletionPrompt {
                    total: snapshot.total_actions,
                    alert,
                }
            }
            CompletionPhase::Running
            | CompletionPhase::PromptScheduled
            | CompletionPhase::ContinueWorking => {}
        }

        let timer = TimerBar::from_snapshot(snapshot);
        match &snapshot.current_action {
            Some(action) => SessionView::Working {
                timer,
                card: ActionCard::from(action),
                position: snapshot
                    .current_position
                    .unwrap_or(snapshot.handled_count + 1),
                total: snapshot.total_actions,
                progress: snapshot.progress,
                celebrating: snapshot.celebrating_action_id.clone(),
                alert,
            },
            None => SessionView::AllDone {
                timer,
                total: snapshot.total_actions,
                celebrating: snapshot.celebrating_action_id.clone(),
                alert,
            },
        }
    }

    /// Whether the manual "end session" control accepts input.
    pub fn end_control_enabled(&self) -> bool {
        !matches!(
            self,
            SessionView::LoadFailed { .. } | SessionView::Ending | SessionView::Ended
        )
    }
}

/// `mm:ss`, or `h:mm:ss` past an hour.
pub fn format_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::{format_clock, ActionCard, EscapeRoute, SessionView};
    use crate::completion::CompletionPhase;
    use crate::error::SessionError;
    use crate::models::{Action, ActionKind, ActionStatus, SessionStatus};
    use crate::session::SessionSnapshot;
    use crate::timer::TimerStatus;
    use chrono::{TimeZone, Utc};

    fn goal_action() -> Action {
        Action {
            id: "a1".into(),
            status: ActionStatus::Pending,
            kind: ActionKind::AddContactToGoal {
                contact_id: "c1".into(),
                goal_id: "g1".into(),
                contact_name: Some("Grace".into()),
                goal_title: Some("Raise seed round".into()),
            },
        }
    }

    fn snapshot(current: Option<Action>, completion: CompletionPhase) -> SessionSnapshot {
        SessionSnapshot {
            session_id: "s1".into(),
            status: SessionStatus::Active,
            captured_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
            duration_seconds: 1_800,
            remaining_seconds: 754,
            timer_status: TimerStatus::Running,
            paused_seconds: 0,
            handled_count: if current.is_some() { 1 } else { 2 },
            current_position: current.as_ref().map(|_| 2),
            current_action: current,
            total_actions: 2,
            progress: 0.5,
            completion,
            celebrating_action_id: None,
            end_error: None,
        }
    }

    #[test]
    fn card_text_follows_action_kind() {
        let card = ActionCard::from(&goal_action());
        assert_eq!(card.kind, "add_contact_to_goal");
        assert_eq!(card.title, "Add Grace to a goal");
        assert_eq!(card.subtitle.as_deref(), Some("Raise seed round"));
    }

    #[test]
    fn working_view_shows_position_and_clock() {
        let view = SessionView::from_snapshot(&snapshot(
            Some(goal_action()),
            CompletionPhase::Running,
        ));
        match view {
            SessionView::Working {
                timer,
                position,
                total,
                ..
            } => {
                assert_eq!(timer.label, "12:34");
                assert_eq!(position, 2);
                assert_eq!(total, 2);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn position_comes_from_session_order() {
        let mut frame = snapshot(Some(goal_action()), CompletionPhase::Running);
        frame.current_position = Some(1);
        match SessionView::from_snapshot(&frame) {
            SessionView::Working { position, .. } => assert_eq!(position, 1),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn no_current_action_renders_all_done() {
        let view = SessionView::from_snapshot(&snapshot(None, CompletionPhase::PromptScheduled));
        assert!(matches!(view, SessionView::AllDone { .. }));
        assert!(view.end_control_enabled());
    }

    #[test]
    fn ending_disables_end_control() {
        let view = SessionView::from_snapshot(&snapshot(None, CompletionPhase::Ending));
        assert_eq!(view, SessionView::Ending);
        assert!(!view.end_control_enabled());
    }

    #[test]
    fn load_failure_offers_dashboard_escape() {
        let view = SessionView::load_failed(&SessionError::NotFound("s9".into()));
        match view {
            SessionView::LoadFailed { message, escape } => {
                assert!(message.contains("s9"));
                assert_eq!(escape, EscapeRoute::ReturnToDashboard);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(3_661), "1:01:01");
    }
}
