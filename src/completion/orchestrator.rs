use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CompletionPhase {
    Running,
    /// Everything is handled; the prompt waits for the celebration to finish.
    PromptScheduled,
    PromptPending,
    /// Prompt dismissed; the user stays in the view without ending the session.
    ContinueWorking,
    Ending,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndDecision {
    /// Caller must issue the complete-session request.
    Proceed,
    /// A previous request already succeeded; nothing to send.
    AlreadyTerminated,
}

/// Decides when the "session finished" prompt appears and tracks the
/// terminal transition.
#[derive(Debug, Clone)]
pub struct CompletionOrchestrator {
    phase: CompletionPhase,
    prompt_delay: Duration,
    prompted: bool,
    before_end: CompletionPhase,
}

impl CompletionOrchestrator {
    pub fn new(prompt_delay: Duration) -> Self {
        Self {
            phase: CompletionPhase::Running,
            prompt_delay,
            prompted: false,
            before_end: CompletionPhase::Running,
        }
    }

    pub fn phase(&self) -> CompletionPhase {
        self.phase
    }

    pub fn is_prompt_visible(&self) -> bool {
        self.phase == CompletionPhase::PromptPending
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == CompletionPhase::Terminated
    }

    /// Called once the queue reports every action handled. Returns the delay
    /// after which `prompt_delay_elapsed` should run, the first time only.
    pub fn on_fully_handled(&mut self) -> Option<Duration> {
        if self.prompted || self.phase != CompletionPhase::Running {
            return None;
        }
        self.phase = CompletionPhase::PromptScheduled;
        Some(self.prompt_delay)
    }

    pub fn prompt_delay_elapsed(&mut self) -> bool {
        if self.phase != CompletionPhase::PromptScheduled {
            return false;
        }
        self.phase = CompletionPhase::PromptPending;
        self.prompted = true;
        true
    }

    pub fn continue_working(&mut self) -> bool {
        if self.phase != CompletionPhase::PromptPending {
            return false;
        }
        self.phase = CompletionPhase::ContinueWorking;
        true
    }

    /// Enter `Ending`. Legal from any open phase, including with actions still
    /// unhandled.
    pub fn begin_end(&mut self) -> Result<EndDecision> {
        match self.phase {
            CompletionPhase::Terminated => Ok(EndDecision::AlreadyTerminated),
            CompletionPhase::Ending => Err(SessionError::EndInFlight),
            open => {
                self.before_end = open;
                self.phase = CompletionPhase::Ending;
                Ok(EndDecision::Proceed)
            }
        }
    }

    /// Request failed: reopen the control. A prompt that was still waiting on
    /// its delay is shown right away, as is one owed to a queue that became
    /// fully handled while the request was in flight. Returns `true` when the
    /// prompt became visible.
    pub fn end_failed(&mut self, fully_handled: bool) -> bool {
        if self.phase != CompletionPhase::Ending {
            return false;
        }
        self.phase = match self.before_end {
            CompletionPhase::PromptScheduled => CompletionPhase::PromptPending,
            CompletionPhase::Running if fully_handled && !self.prompted => {
                CompletionPhase::PromptPending
            }
            other => other,
        };
        if self.phase == CompletionPhase::PromptPending && !self.prompted {
            self.prompted = true;
            return true;
        }
        false
    }

    pub fn end_succeeded(&mut self) {
        self.phase = CompletionPhase::Terminated;
    }
}
