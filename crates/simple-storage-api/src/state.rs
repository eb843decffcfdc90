//! Shared application state.

use std::sync::Arc;

use simple_storage_core::clock::Clock;
use simple_storage_core::repository::EventRepository;
use tokio::sync::Mutex;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Timestamp source for new events.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Event store backing every storage engine.
    pub event_repository: Arc<dyn EventRepository>,
    /// Held across load, guard check, mutation and append of every write so
    /// writes are applied one at a time in a single total order.
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        event_repository: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            clock,
            event_repository,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
