//! services/api/src/web/state.rs
//!
//! Defines the application state shared by every request handler.

use schedule_core::ScheduleStore;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ScheduleStore>,
}

impl AppState {
    pub fn new(store: ScheduleStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
