use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Pause, RelationshipSession};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    Running,
    Paused,
    Expired,
}

/// Countdown derived from absolute timestamps.
///
/// Nothing here is decremented per tick: remaining time is recomputed from
/// `timer_started_at`, the paused baseline and the caller's `now`, so missed or
/// late ticks cannot cause drift.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    session_id: String,
    timer_started_at: DateTime<Utc>,
    duration_ms: u64,
    /// Paused time already folded in: the backend baseline plus every closed local pause.
    paused_ms_baseline: u64,
    open_pause: Option<Pause>,
}

impl TimerEngine {
    pub fn new(
        session_id: impl Into<String>,
        timer_started_at: DateTime<Utc>,
        duration_minutes: u32,
        total_paused_duration_seconds: u64,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            timer_started_at,
            duration_ms: u64::from(duration_minutes) * 60_000,
            paused_ms_baseline: total_paused_duration_seconds.saturating_mul(1_000),
            open_pause: None,
        }
    }

    pub fn for_session(session: &RelationshipSession) -> Self {
        Self::new(
            session.id.clone(),
            session.timer_started_at,
            session.duration_minutes,
            session.total_paused_duration_seconds,
        )
    }

    pub fn is_paused(&self) -> bool {
        self.open_pause.is_some()
    }

    pub fn open_pause(&self) -> Option<&Pause> {
        self.open_pause.as_ref()
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_ms / 1_000
    }

    /// Active (unpaused) time since the countdown began. While paused the
    /// reference point is the pause start, which freezes the value.
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        let reference = self
            .open_pause
            .as_ref()
            .map(|pause| pause.pause_started_at)
            .unwrap_or(now);
        let wall_ms = (reference - self.timer_started_at).num_milliseconds().max(0) as u64;
        wall_ms.saturating_sub(self.paused_ms_baseline)
    }

    pub fn remaining_ms(&self, now: DateTime<Utc>) -> u64 {
        self.duration_ms.saturating_sub(self.elapsed_ms(now))
    }

    /// Whole seconds left, clamped at zero.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u64 {
        let elapsed_secs = self.elapsed_ms(now) / 1_000;
        self.duration_seconds().saturating_sub(elapsed_secs)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining_ms(now) == 0
    }

    pub fn status(&self, now: DateTime<Utc>) -> TimerStatus {
        if self.is_expired(now) {
            TimerStatus::Expired
        } else if self.is_paused() {
            TimerStatus::Paused
        } else {
            TimerStatus::Running
        }
    }

    /// Total paused seconds including a pause that is still open.
    pub fn paused_seconds(&self, now: DateTime<Utc>) -> u64 {
        let open_ms = self
            .open_pause
            .as_ref()
            .map(|pause| (now - pause.pause_started_at).num_milliseconds().max(0) as u64)
            .unwrap_or(0);
        self.paused_ms_baseline.saturating_add(open_ms) / 1_000
    }

    /// Freeze the countdown. Returns the opened pause, or `None` if already paused.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Pause> {
        if self.open_pause.is_some() {
            return None;
        }
        let pause = Pause::open(&self.session_id, now);
        self.open_pause = Some(pause.clone());
        Some(pause)
    }

    /// Fold the open pause into the baseline. Returns the closed pause, or
    /// `None` if the timer was not paused.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<Pause> {
        let pause = self.open_pause.take()?;
        let paused_ms = (now - pause.pause_started_at).num_milliseconds().max(0) as u64;
        self.paused_ms_baseline = self.paused_ms_baseline.saturating_add(paused_ms);
        Some(pause.close(now))
    }
}
