#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use cultivate_session::{
    models::{Action, ActionKind, ActionStatus, Pause, RelationshipSession, SessionStatus},
    utils::MonotonicClock,
    Result, SessionApi, SessionController, SessionError, SessionSettings,
};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

pub fn goal_action(id: &str) -> Action {
    Action {
        id: id.to_string(),
        status: ActionStatus::Pending,
        kind: ActionKind::AddContactToGoal {
            contact_id: format!("contact-{id}"),
            goal_id: "goal-1".into(),
            contact_name: Some("Ada".into()),
            goal_title: Some("Expand advisory network".into()),
        },
    }
}

pub fn session_with(duration_minutes: u32, ids: &[&str]) -> RelationshipSession {
    RelationshipSession {
        id: "session-1".into(),
        duration_minutes,
        timer_started_at: t0(),
        started_at: Some(t0()),
        total_paused_duration_seconds: 0,
        status: SessionStatus::Active,
        actions: ids.iter().map(|id| goal_action(id)).collect(),
    }
}

/// In-memory backend that records every call.
#[derive(Default)]
pub struct MockApi {
    pub session: Mutex<Option<RelationshipSession>>,
    pub complete_calls: AtomicUsize,
    pub failing_completes: AtomicUsize,
    pub pauses: Mutex<Vec<Pause>>,
    pub resumes: Mutex<Vec<Pause>>,
    pub complete_delay: Mutex<Option<Duration>>,
}

impl MockApi {
    pub fn serving(session: RelationshipSession) -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(Some(session)),
            ..Self::default()
        })
    }

    pub fn fail_next_completes(&self, count: usize) {
        self.failing_completes.store(count, Ordering::SeqCst);
    }

    pub fn delay_completes(&self, delay: Duration) {
        *self.complete_delay.lock().unwrap() = Some(delay);
    }

    pub fn complete_count(&self) -> usize {
        self.complete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionApi for MockApi {
    async fn fetch_session(&self, session_id: &str) -> Result<RelationshipSession> {
        self.session
            .lock()
            .unwrap()
            .clone()
            .filter(|session| session.id == session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    async fn complete_session(&self, _session_id: &str) -> Result<()> {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.complete_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let remaining_failures = self.failing_completes.load(Ordering::SeqCst);
        if remaining_failures > 0 {
            self.failing_completes
                .store(remaining_failures - 1, Ordering::SeqCst);
            return Err(SessionError::CompleteFailed {
                status: 503,
                message: "service unavailable".into(),
            });
        }
        Ok(())
    }

    async fn pause_session(&self, pause: &Pause) -> Result<()> {
        self.pauses.lock().unwrap().push(pause.clone());
        Ok(())
    }

    async fn resume_session(&self, pause: &Pause) -> Result<()> {
        self.resumes.lock().unwrap().push(pause.clone());
        Ok(())
    }
}

/// Load a controller whose clock follows tokio's (paused) time from `t0`.
pub async fn load(api: Arc<MockApi>) -> SessionController {
    SessionController::load(
        api,
        "session-1",
        SessionSettings::default(),
        Arc::new(MonotonicClock::starting_at(t0())),
    )
    .await
    .expect("load session")
}
