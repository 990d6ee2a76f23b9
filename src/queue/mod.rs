pub mod progress;

pub use progress::{ActionOutcome, ActionQueue};
