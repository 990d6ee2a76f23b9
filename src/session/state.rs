use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::completion::{CompletionOrchestrator, CompletionPhase};
use crate::error::Result;
use crate::models::{Action, Pause, RelationshipSession, SessionStatus};
use crate::queue::{ActionOutcome, ActionQueue};
use crate::timer::{TimerEngine, TimerStatus};

/// What a single mark call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkOutcome {
    pub newly_handled: bool,
    /// Set when this mark finished the queue and the prompt should be scheduled.
    pub prompt_delay: Option<Duration>,
}

/// Everything a view needs to render one frame, derived at `captured_at`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub status: SessionStatus,
    pub captured_at: DateTime<Utc>,
    pub duration_seconds: u64,
    pub remaining_seconds: u64,
    pub timer_status: TimerStatus,
    pub paused_seconds: u64,
    pub current_action: Option<Action>,
    /// 1-based place of `current_action` in session order.
    pub current_position: Option<usize>,
    pub handled_count: usize,
    pub total_actions: usize,
    pub progress: f64,
    pub completion: CompletionPhase,
    pub celebrating_action_id: Option<String>,
    pub end_error: Option<String>,
}

impl SessionSnapshot {
    pub fn is_paused(&self) -> bool {
        self.timer_status == TimerStatus::Paused
    }

    pub fn is_fully_handled(&self) -> bool {
        self.handled_count == self.total_actions
    }
}

/// Session-local state owned by one open view: timer, queue, completion
/// flow and the transient celebration flag. Nothing here is persisted.
#[derive(Debug, Clone)]
pub struct SessionState {
    session_id: String,
    status: SessionStatus,
    timer: TimerEngine,
    queue: ActionQueue,
    completion: CompletionOrchestrator,
    celebrating: Option<String>,
    expiry_reported: bool,
    end_error: Option<String>,
}

impl SessionState {
    pub fn new(session: RelationshipSession, prompt_delay: Duration) -> Self {
        let timer = TimerEngine::for_session(&session);
        let mut completion = CompletionOrchestrator::new(prompt_delay);
        if session.status == SessionStatus::Completed {
            completion.end_succeeded();
        }

        Self {
            session_id: session.id,
            status: session.status,
            timer,
            queue: ActionQueue::new(session.actions),
            completion,
            celebrating: None,
            expiry_reported: false,
            end_error: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    pub fn queue(&self) -> &ActionQueue {
        &self.queue
    }

    pub fn completion(&self) -> &CompletionOrchestrator {
        &self.completion
    }

    pub fn completion_mut(&mut self) -> &mut CompletionOrchestrator {
        &mut self.completion
    }

    pub fn current_action(&self) -> Option<&Action> {
        self.queue.current_action()
    }

    pub fn celebrating(&self) -> Option<&str> {
        self.celebrating.as_deref()
    }

    /// Complete an action and raise its celebration flag, replacing any
    /// celebration still showing.
    pub fn mark_complete(&mut self, action_id: &str) -> Result<MarkOutcome> {
        if self.completion.is_terminated() {
            return Ok(MarkOutcome::default());
        }
        let newly_handled = self.queue.mark_complete(action_id)?;
        if newly_handled {
            self.celebrating = Some(action_id.to_string());
        }
        Ok(self.after_mark(newly_handled))
    }

    pub fn mark_skipped(&mut self, action_id: &str) -> Result<MarkOutcome> {
        if self.completion.is_terminated() {
            return Ok(MarkOutcome::default());
        }
        let newly_handled = self.queue.mark_skipped(action_id)?;
        Ok(self.after_mark(newly_handled))
    }

    fn after_mark(&mut self, newly_handled: bool) -> MarkOutcome {
        let prompt_delay = if newly_handled && self.queue.is_fully_handled() {
            self.completion.on_fully_handled()
        } else {
            None
        };
        MarkOutcome {
            newly_handled,
            prompt_delay,
        }
    }

    /// Clear the celebration only if it still belongs to `action_id`.
    pub fn clear_celebration(&mut self, action_id: &str) -> bool {
        if self.celebrating.as_deref() == Some(action_id) {
            self.celebrating = None;
            true
        } else {
            false
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Pause> {
        self.timer.pause(now)
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<Pause> {
        self.timer.resume(now)
    }

    /// True exactly once: the first time the countdown is seen at zero.
    pub fn take_expiry(&mut self, now: DateTime<Utc>) -> bool {
        if self.expiry_reported || !self.timer.is_expired(now) {
            return false;
        }
        self.expiry_reported = true;
        true
    }

    /// Reopen after a failed complete request. Returns `true` when the
    /// completion prompt became visible as a result.
    pub fn end_failed(&mut self, message: String) -> bool {
        self.end_error = Some(message);
        let fully_handled = self.queue.is_fully_handled();
        self.completion.end_failed(fully_handled)
    }

    pub fn set_end_error(&mut self, message: Option<String>) {
        self.end_error = message;
    }

    pub fn mark_terminated(&mut self) {
        self.completion.end_succeeded();
        self.status = SessionStatus::Completed;
        self.end_error = None;
    }

    pub fn outcome(&self, action_id: &str) -> Option<ActionOutcome> {
        self.queue.outcome(action_id)
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            status: self.status,
            captured_at: now,
            duration_seconds: self.timer.duration_seconds(),
            remaining_seconds: self.timer.remaining_seconds(now),
            timer_status: self.timer.status(now),
            paused_seconds: self.timer.paused_seconds(now),
            current_action: self.queue.current_action().cloned(),
            current_position: self.queue.current_position(),
            handled_count: self.queue.handled_count(),
            total_actions: self.queue.total(),
            progress: self.queue.progress(),
            completion: self.completion.phase(),
            celebrating_action_id: self.celebrating.clone(),
            end_error: self.end_error.clone(),
        }
    }
}
