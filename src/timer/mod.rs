pub mod state;

pub use state::{TimerEngine, TimerStatus};
