pub mod action;
pub mod pause;
pub mod session;

pub use action::{Action, ActionKind, ActionStatus};
pub use pause::Pause;
pub use session::{RelationshipSession, SessionStatus};
