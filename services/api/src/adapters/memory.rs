//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `ScheduleRepository` port. Nothing
//! survives a restart; used by tests and by `SCHEDULE_STORAGE=memory`.

use async_trait::async_trait;
use schedule_core::domain::Day;
use schedule_core::ports::{PortResult, ScheduleRepository};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct InMemoryRepository {
    days: Mutex<Vec<Day>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the repository with an existing document.
    pub fn with_days(days: Vec<Day>) -> Self {
        Self {
            days: Mutex::new(days),
        }
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryRepository {
    async fn load(&self) -> PortResult<Vec<Day>> {
        Ok(self.days.lock().await.clone())
    }

    async fn save(&self, days: &[Day]) -> PortResult<()> {
        *self.days.lock().await = days.to_vec();
        Ok(())
    }
}
