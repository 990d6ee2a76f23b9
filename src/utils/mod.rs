pub mod clock;
pub mod logging;
pub mod scoped_task;

pub use clock::{Clock, ManualClock, MonotonicClock, SystemClock};
pub use scoped_task::ScopedTask;
