//! Relationship session engine: a timed, pausable work session over a queue
//! of relationship-building actions, with completion detection and the
//! complete-session handshake against the app backend.

pub mod adapters;
pub mod api;
pub mod completion;
pub mod error;
pub mod models;
pub mod queue;
pub mod session;
pub mod settings;
pub mod timer;
pub mod utils;

use std::sync::Arc;

pub use adapters::{DesktopAdapter, DesktopCommand, Gesture, MobileAdapter, SessionView};
pub use api::{HttpSessionApi, SessionApi};
pub use error::{Result, SessionError};
pub use models::{Action, ActionKind, ActionStatus, RelationshipSession, SessionStatus};
pub use session::{SessionController, SessionEvent, SessionSnapshot};
pub use settings::{SessionSettings, SettingsStore};
pub use utils::{Clock, SystemClock};

/// Open a session against the configured backend with the system clock.
///
/// On failure the caller renders `SessionView::load_failed` and offers the
/// way back to the dashboard.
pub async fn open_session(settings: SessionSettings, session_id: &str) -> Result<SessionController> {
    utils::logging::init(settings.debug);
    settings
        .validate()
        .map_err(|err| SessionError::Config(err.to_string()))?;
    let api: Arc<dyn SessionApi> = Arc::new(HttpSessionApi::new(&settings)?);
    SessionController::load(api, session_id, settings, Arc::new(SystemClock)).await
}
