use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::SessionController;

use super::AdapterOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DesktopCommand {
    Complete,
    Skip,
    TogglePause,
    ContinueWorking,
    EndSession,
}

/// Button layout. Mutations apply immediately; there is no exit animation.
pub struct DesktopAdapter<'a> {
    controller: &'a SessionController,
}

impl<'a> DesktopAdapter<'a> {
    pub fn new(controller: &'a SessionController) -> Self {
        Self { controller }
    }

    pub async fn handle(&self, command: DesktopCommand) -> Result<AdapterOutcome> {
        match command {
            DesktopCommand::Complete => {
                let Some(action) = self.controller.current_action().await else {
                    return Ok(AdapterOutcome::Ignored);
                };
                let outcome = self.controller.mark_complete(&action.id).await?;
                Ok(AdapterOutcome::Marked(outcome))
            }
            DesktopCommand::Skip => {
                let Some(action) = self.controller.current_action().await else {
                    return Ok(AdapterOutcome::Ignored);
                };
                let outcome = self.controller.mark_skipped(&action.id).await?;
                Ok(AdapterOutcome::Marked(outcome))
            }
            DesktopCommand::TogglePause => Ok(AdapterOutcome::PauseToggled(
                self.controller.toggle_pause().await,
            )),
            DesktopCommand::ContinueWorking => {
                if self.controller.continue_working().await {
                    Ok(AdapterOutcome::PromptDismissed)
                } else {
                    Ok(AdapterOutcome::Ignored)
                }
            }
            // The caller closes the view when it sees `Ended`.
            DesktopCommand::EndSession => {
                self.controller.end_session(|| {}).await?;
                Ok(AdapterOutcome::Ended)
            }
        }
    }
}
