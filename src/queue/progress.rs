use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};
use crate::models::{Action, ActionStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ActionOutcome {
    Completed,
    Skipped,
}

/// Tracks which actions of a session have been handled.
///
/// Completed and skipped both count as progress; the outcome is kept only so
/// callers can tell them apart. Handled actions never return to pending.
#[derive(Debug, Clone)]
pub struct ActionQueue {
    actions: Vec<Action>,
    handled: HashMap<String, ActionOutcome>,
}

impl ActionQueue {
    /// Actions the backend already reports as completed or skipped start out handled.
    pub fn new(actions: Vec<Action>) -> Self {
        let handled = actions
            .iter()
            .filter_map(|action| match action.status {
                ActionStatus::Pending => None,
                ActionStatus::Completed => Some((action.id.clone(), ActionOutcome::Completed)),
                ActionStatus::Skipped => Some((action.id.clone(), ActionOutcome::Skipped)),
            })
            .collect();
        Self { actions, handled }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn get(&self, action_id: &str) -> Option<&Action> {
        self.actions.iter().find(|action| action.id == action_id)
    }

    /// Returns `true` if the action was newly handled.
    pub fn mark_complete(&mut self, action_id: &str) -> Result<bool> {
        self.mark(action_id, ActionOutcome::Completed)
    }

    /// Returns `true` if the action was newly handled.
    pub fn mark_skipped(&mut self, action_id: &str) -> Result<bool> {
        self.mark(action_id, ActionOutcome::Skipped)
    }

    fn mark(&mut self, action_id: &str, outcome: ActionOutcome) -> Result<bool> {
        if self.get(action_id).is_none() {
            return Err(SessionError::UnknownAction(action_id.to_string()));
        }
        if self.handled.contains_key(action_id) {
            return Ok(false);
        }
        self.handled.insert(action_id.to_string(), outcome);
        Ok(true)
    }

    /// First action in session order that has not been handled.
    pub fn current_action(&self) -> Option<&Action> {
        self.actions
            .iter()
            .find(|action| !self.handled.contains_key(&action.id))
    }

    /// 1-based index of the current action in session order.
    pub fn current_position(&self) -> Option<usize> {
        self.actions
            .iter()
            .position(|action| !self.handled.contains_key(&action.id))
            .map(|index| index + 1)
    }

    pub fn outcome(&self, action_id: &str) -> Option<ActionOutcome> {
        self.handled.get(action_id).copied()
    }

    pub fn is_handled(&self, action_id: &str) -> bool {
        self.handled.contains_key(action_id)
    }

    pub fn handled_count(&self) -> usize {
        self.handled.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.actions.len() - self.handled.len()
    }

    pub fn total(&self) -> usize {
        self.actions.len()
    }

    /// Fraction handled in `0.0..=1.0`; an empty session reports 0.
    pub fn progress(&self) -> f64 {
        if self.actions.is_empty() {
            return 0.0;
        }
        self.handled.len() as f64 / self.actions.len() as f64
    }

    pub fn progress_percent(&self) -> u8 {
        (self.progress() * 100.0).round() as u8
    }

    pub fn is_fully_handled(&self) -> bool {
        self.handled.len() == self.actions.len()
    }

    /// Ids handled this session, in session order.
    pub fn handled_ids(&self) -> Vec<String> {
        self.actions
            .iter()
            .filter(|action| self.handled.contains_key(&action.id))
            .map(|action| action.id.clone())
            .collect()
    }
}
