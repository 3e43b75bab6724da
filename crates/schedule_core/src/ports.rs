//! crates/schedule_core/src/ports.rs
//!
//! Defines the storage contract for the schedule document. The store depends
//! only on this trait, so the persisted format and location are supplied by
//! the service that constructs it.

use async_trait::async_trait;
use crate::domain::Day;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all storage port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Storage I/O failed: {0}")]
    Io(String),
    #[error("Stored schedule is malformed: {0}")]
    Malformed(String),
    #[error("Failed to encode schedule: {0}")]
    Encode(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Reads the whole schedule document. A store that has never been written
    /// to yields an empty list.
    async fn load(&self) -> PortResult<Vec<Day>>;

    /// Replaces the whole persisted document with `days`.
    async fn save(&self, days: &[Day]) -> PortResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_failure_is_not_reported_as_malformed_document() {
        let message = PortError::Encode("key must be a string".to_string()).to_string();
        assert_eq!(message, "Failed to encode schedule: key must be a string");
    }
}
