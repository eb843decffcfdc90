//! Shared test mocks and utilities for the SimpleStorage engine.

mod clock;
mod repository;

pub use clock::FixedClock;
pub use repository::{EmptyEventRepository, FailingEventRepository, RecordingEventRepository};
