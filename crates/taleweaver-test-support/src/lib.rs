//! Shared test doubles for the Taleweaver progression engine.

mod clock;
mod repository;

pub use clock::{FixedClock, fixed_clock};
pub use repository::{FailingEventRepository, InMemoryEventRepository};
