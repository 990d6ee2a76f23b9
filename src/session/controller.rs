use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{
    sync::{broadcast, Mutex},
    time::{self, MissedTickBehavior},
};

use crate::{
    api::SessionApi,
    completion::EndDecision,
    error::{Result, SessionError},
    models::{Action, Pause},
    queue::ActionOutcome,
    settings::SessionSettings,
    utils::{Clock, ScopedTask},
};

use super::state::{MarkOutcome, SessionSnapshot, SessionState};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SessionEvent {
    StateChanged { snapshot: SessionSnapshot },
    #[serde(rename_all = "camelCase")]
    Tick { remaining_seconds: u64 },
    TimeExpired,
    #[serde(rename_all = "camelCase")]
    CelebrationStarted { action_id: String },
    #[serde(rename_all = "camelCase")]
    CelebrationEnded { action_id: String },
    CompletionPromptShown,
    #[serde(rename_all = "camelCase")]
    SessionEnded { session_id: String },
}

#[derive(Default)]
struct Timers {
    ticker: Option<ScopedTask>,
    celebration: Option<ScopedTask>,
    prompt: Option<ScopedTask>,
}

impl Timers {
    fn cancel_all(&mut self) {
        self.ticker = None;
        self.celebration = None;
        self.prompt = None;
    }
}

/// Drives one open session: owns its state and every timer scheduled for it.
///
/// Dropping the controller cancels the ticker, celebration expiry and
/// completion prompt timers. An in-flight complete-session request runs in a
/// detached task and still reaches the backend.
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    api: Arc<dyn SessionApi>,
    clock: Arc<dyn Clock>,
    settings: SessionSettings,
    events: broadcast::Sender<SessionEvent>,
    timers: Mutex<Timers>,
}

impl SessionController {
    /// Fetch the session and start the countdown. A failed fetch is terminal
    /// for the view.
    pub async fn load(
        api: Arc<dyn SessionApi>,
        session_id: &str,
        settings: SessionSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let session = api.fetch_session(session_id).await.map_err(|err| {
            log_error!("Failed to load session {}: {}", session_id, err);
            err
        })?;

        log_info!(
            "Loaded session {} ({} actions, {} min)",
            session.id,
            session.actions.len(),
            session.duration_minutes
        );

        let state = SessionState::new(session, settings.completion_prompt_delay());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let controller = Self {
            state: Arc::new(Mutex::new(state)),
            api,
            clock,
            settings,
            events,
            timers: Mutex::new(Timers::default()),
        };

        let start_ticker = {
            let mut state = controller.state.lock().await;
            let now = controller.clock.now();
            if state.take_expiry(now) {
                let _ = controller.events.send(SessionEvent::TimeExpired);
            }
            !state.completion().is_terminated() && !state.timer().is_expired(now)
        };
        if start_ticker {
            controller.spawn_ticker().await;
        }
        controller.emit_state_changed().await;

        Ok(controller)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        state.snapshot(self.clock.now())
    }

    pub async fn current_action(&self) -> Option<Action> {
        self.state.lock().await.current_action().cloned()
    }

    pub async fn action(&self, action_id: &str) -> Option<Action> {
        self.state.lock().await.queue().get(action_id).cloned()
    }

    pub async fn outcome(&self, action_id: &str) -> Option<ActionOutcome> {
        self.state.lock().await.outcome(action_id)
    }

    pub async fn mark_complete(&self, action_id: &str) -> Result<MarkOutcome> {
        let outcome = self.state.lock().await.mark_complete(action_id)?;
        if outcome.newly_handled {
            let _ = self.events.send(SessionEvent::CelebrationStarted {
                action_id: action_id.to_string(),
            });
            self.schedule_celebration_expiry(action_id.to_string()).await;
        }
        self.after_mark(outcome).await;
        Ok(outcome)
    }

    pub async fn mark_skipped(&self, action_id: &str) -> Result<MarkOutcome> {
        let outcome = self.state.lock().await.mark_skipped(action_id)?;
        self.after_mark(outcome).await;
        Ok(outcome)
    }

    async fn after_mark(&self, outcome: MarkOutcome) {
        if let Some(delay) = outcome.prompt_delay {
            self.schedule_completion_prompt(delay).await;
        }
        if outcome.newly_handled {
            self.emit_state_changed().await;
        }
    }

    /// Flip between paused and running. Returns whether the timer is now paused.
    /// A terminated session keeps its current state.
    pub async fn toggle_pause(&self) -> bool {
        let (now_paused, pause) = {
            let mut state = self.state.lock().await;
            if state.completion().is_terminated() {
                return state.timer().is_paused();
            }
            let now = self.clock.now();
            let (now_paused, pause) = if state.timer().is_paused() {
                (false, state.resume(now))
            } else {
                (true, state.pause(now))
            };

            // Ticker slot is updated under the state lock.
            if now_paused {
                self.timers.lock().await.ticker = None;
            } else if !state.timer().is_expired(now) {
                self.spawn_ticker().await;
            }
            (now_paused, pause)
        };

        if let Some(pause) = pause {
            self.sync_pause(pause, now_paused);
        }

        self.emit_state_changed().await;
        now_paused
    }

    /// Dismiss the completion prompt and stay in the view.
    pub async fn continue_working(&self) -> bool {
        let changed = self.state.lock().await.completion_mut().continue_working();
        if changed {
            self.emit_state_changed().await;
        }
        changed
    }

    /// Send the complete-session request, then run `on_close`.
    ///
    /// Allowed with actions still unhandled. Only one request may be in flight;
    /// after a success further calls skip the request and just close.
    pub async fn end_session<F>(&self, on_close: F) -> Result<()>
    where
        F: FnOnce(),
    {
        let (decision, session_id) = {
            let mut state = self.state.lock().await;
            let decision = state.completion_mut().begin_end()?;
            state.set_end_error(None);
            (decision, state.session_id().to_string())
        };

        if decision == EndDecision::AlreadyTerminated {
            on_close();
            return Ok(());
        }
        self.emit_state_changed().await;

        let api = self.api.clone();
        let request_id = session_id.clone();
        let request = tokio::spawn(async move { api.complete_session(&request_id).await });
        let result = match request.await {
            Ok(result) => result,
            Err(join_err) => Err(SessionError::Interrupted(join_err.to_string())),
        };

        match result {
            Ok(()) => {
                self.state.lock().await.mark_terminated();
                self.timers.lock().await.cancel_all();
                log_info!("Session {} completed", session_id);

                let _ = self.events.send(SessionEvent::SessionEnded {
                    session_id: session_id.clone(),
                });
                self.emit_state_changed().await;
                on_close();
                Ok(())
            }
            Err(err) => {
                log_warn!("Complete session {} failed: {}", session_id, err);
                let prompt_shown = self.state.lock().await.end_failed(err.to_string());
                if prompt_shown {
                    let _ = self.events.send(SessionEvent::CompletionPromptShown);
                }
                self.emit_state_changed().await;
                Err(err)
            }
        }
    }

    /// Cancel every scheduled timer. Dropping the controller does the same.
    pub async fn shutdown(&self) {
        self.timers.lock().await.cancel_all();
    }

    async fn spawn_ticker(&self) {
        let state = self.state.clone();
        let clock = self.clock.clone();
        let events = self.events.clone();
        let tick_interval = self.settings.tick_interval();

        let task = ScopedTask::spawn(move |cancel_token| async move {
            let mut interval = time::interval(tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    _ = interval.tick() => {
                        let (remaining, expired) = {
                            let mut guard = state.lock().await;
                            if guard.timer().is_paused() || guard.completion().is_terminated() {
                                break;
                            }
                            let now = clock.now();
                            (guard.timer().remaining_seconds(now), guard.take_expiry(now))
                        };

                        let _ = events.send(SessionEvent::Tick { remaining_seconds: remaining });
                        if expired {
                            log_info!("Session timer expired");
                            let _ = events.send(SessionEvent::TimeExpired);
                            break;
                        }
                    }
                }
            }
        });

        // Replacing the slot drops (and aborts) any previous ticker.
        self.timers.lock().await.ticker = Some(task);
    }

    async fn schedule_celebration_expiry(&self, action_id: String) {
        let state = self.state.clone();
        let clock = self.clock.clone();
        let events = self.events.clone();
        let window = self.settings.celebration();

        let task = ScopedTask::spawn(move |cancel_token| async move {
            tokio::select! {
                _ = cancel_token.cancelled() => return,
                _ = time::sleep(window) => {}
            }

            let snapshot = {
                let mut guard = state.lock().await;
                if !guard.clear_celebration(&action_id) {
                    return;
                }
                guard.snapshot(clock.now())
            };
            let _ = events.send(SessionEvent::CelebrationEnded { action_id });
            let _ = events.send(SessionEvent::StateChanged { snapshot });
        });

        self.timers.lock().await.celebration = Some(task);
    }

    async fn schedule_completion_prompt(&self, delay: Duration) {
        let state = self.state.clone();
        let clock = self.clock.clone();
        let events = self.events.clone();

        let task = ScopedTask::spawn(move |cancel_token| async move {
            tokio::select! {
                _ = cancel_token.cancelled() => return,
                _ = time::sleep(delay) => {}
            }

            let snapshot = {
                let mut guard = state.lock().await;
                if !guard.completion_mut().prompt_delay_elapsed() {
                    return;
                }
                guard.snapshot(clock.now())
            };
            let _ = events.send(SessionEvent::CompletionPromptShown);
            let _ = events.send(SessionEvent::StateChanged { snapshot });
        });

        self.timers.lock().await.prompt = Some(task);
    }

    /// Forward a pause transition to the backend without blocking the caller.
    fn sync_pause(&self, pause: Pause, paused: bool) {
        if !self.settings.sync_pauses {
            return;
        }
        let api = self.api.clone();
        tokio::spawn(async move {
            let result = if paused {
                api.pause_session(&pause).await
            } else {
                api.resume_session(&pause).await
            };
            if let Err(err) = result {
                log_warn!(
                    "Failed to sync pause {} for session {}: {}",
                    pause.id,
                    pause.session_id,
                    err
                );
            }
        });
    }

    async fn emit_state_changed(&self) {
        let snapshot = self.snapshot().await;
        let _ = self.events.send(SessionEvent::StateChanged { snapshot });
    }
}
