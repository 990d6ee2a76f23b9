//! Presentation adapters. Both layouts reduce user input to the same
//! controller primitives and render from the same `SessionView`.

pub mod desktop;
pub mod mobile;
pub mod view;

pub use desktop::{DesktopAdapter, DesktopCommand};
pub use mobile::{Gesture, GestureIntent, MobileAdapter};
pub use view::{format_clock, ActionCard, EscapeRoute, SessionView, TimerBar};

use crate::session::MarkOutcome;

#[derive(Debug, Clone, PartialEq)]
pub enum AdapterOutcome {
    Marked(MarkOutcome),
    /// New paused state.
    PauseToggled(bool),
    PromptDismissed,
    /// Read-only detail for the context drawer.
    Context(ActionCard),
    /// The backend accepted the end; the view should close.
    Ended,
    Ignored,
}
