use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Action;
use crate::session::SessionController;

use super::{ActionCard, AdapterOutcome};

const ENABLE_LOGS: bool = false;

use crate::log_debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gesture {
    SwipeRight,
    SwipeLeft,
    SwipeDown,
    LongPress,
    PauseButton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureIntent {
    Complete(String),
    Skip(String),
    OpenContext(String),
    TogglePause,
    /// Action gesture with no current action on screen.
    Ignore,
}

impl Gesture {
    pub fn intent(self, current: Option<&Action>) -> GestureIntent {
        if self == Gesture::PauseButton {
            return GestureIntent::TogglePause;
        }
        let Some(action) = current else {
            return GestureIntent::Ignore;
        };
        let id = action.id.clone();
        match self {
            Gesture::SwipeRight => GestureIntent::Complete(id),
            Gesture::SwipeLeft => GestureIntent::Skip(id),
            Gesture::SwipeDown | Gesture::LongPress => GestureIntent::OpenContext(id),
            Gesture::PauseButton => GestureIntent::TogglePause,
        }
    }
}

/// Touch layout: swipes drive the same primitives as the desktop buttons,
/// with the state change held back until the card's exit animation ends.
pub struct MobileAdapter<'a> {
    controller: &'a SessionController,
}

impl<'a> MobileAdapter<'a> {
    pub fn new(controller: &'a SessionController) -> Self {
        Self { controller }
    }

    pub async fn handle(&self, gesture: Gesture) -> Result<AdapterOutcome> {
        let current = self.controller.current_action().await;
        let intent = gesture.intent(current.as_ref());
        log_debug!("gesture {:?} -> {:?}", gesture, intent);

        match intent {
            GestureIntent::Complete(action_id) => {
                self.animate_out().await;
                let outcome = self.controller.mark_complete(&action_id).await?;
                Ok(AdapterOutcome::Marked(outcome))
            }
            GestureIntent::Skip(action_id) => {
                self.animate_out().await;
                let outcome = self.controller.mark_skipped(&action_id).await?;
                Ok(AdapterOutcome::Marked(outcome))
            }
            GestureIntent::OpenContext(action_id) => {
                match self.controller.action(&action_id).await {
                    Some(action) => Ok(AdapterOutcome::Context(ActionCard::from(&action))),
                    None => Ok(AdapterOutcome::Ignored),
                }
            }
            GestureIntent::TogglePause => {
                Ok(AdapterOutcome::PauseToggled(self.controller.toggle_pause().await))
            }
            GestureIntent::Ignore => Ok(AdapterOutcome::Ignored),
        }
    }

    async fn animate_out(&self) {
        tokio::time::sleep(self.controller.settings().swipe_animation()).await;
    }
}
