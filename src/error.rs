//! Error types for the session boundary.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Loading the session failed; the view cannot proceed.
    #[error("failed to load session: {0}")]
    Fetch(String),

    #[error("session {0} not found")]
    NotFound(String),

    #[error("malformed session payload: {0}")]
    Decode(String),

    /// Backend rejected the complete-session call.
    #[error("complete session failed ({status}): {message}")]
    CompleteFailed { status: u16, message: String },

    /// Backend rejected a pause/resume update.
    #[error("pause sync failed ({status}): {message}")]
    SyncFailed { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("action {0} does not belong to this session")]
    UnknownAction(String),

    #[error("an end-session request is already in flight")]
    EndInFlight,

    #[error("invalid settings: {0}")]
    Config(String),

    #[error("background request did not finish: {0}")]
    Interrupted(String),
}

impl SessionError {
    /// Whether the user can retry the same control. Load failures are terminal
    /// for the view; the only recovery is navigating away.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SessionError::CompleteFailed { .. }
                | SessionError::Transport(_)
                | SessionError::EndInFlight
                | SessionError::Interrupted(_)
        )
    }
}
