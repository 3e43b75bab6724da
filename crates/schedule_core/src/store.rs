//! crates/schedule_core/src/store.rs
//!
//! The schedule store: the single owner of the in-memory schedule document.
//!
//! Every mutation runs under one lock as "copy, mutate, persist, commit". A
//! failed validation or lookup never reaches storage, and a failed write leaves
//! the in-memory document exactly as it was before the call.

use crate::domain::{self, Day, Event};
use crate::ports::{PortError, ScheduleRepository};
use crate::sample::sample_schedule;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

//=========================================================================================
// Store Error and Result Types
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("Day with ID '{0}' not found")]
    DayNotFound(String),
    #[error("Event with ID '{event_id}' not found in day '{day_id}'")]
    EventNotFound { day_id: String, event_id: String },
    #[error("Failed to persist schedule: {0}")]
    Storage(#[from] PortError),
}

pub type StoreResult<T> = Result<T, StoreError>;

//=========================================================================================
// Operation Inputs
//=========================================================================================

/// The fields of an event being added to a day.
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub time: String,
    pub name: String,
    pub link: Option<String>,
    pub has_outline: Option<bool>,
}

/// A partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub time: Option<String>,
    pub name: Option<String>,
    /// An empty string clears the link.
    pub link: Option<String>,
    /// `Some(false)` clears the flag.
    pub has_outline: Option<bool>,
}

//=========================================================================================
// The Store
//=========================================================================================

pub struct ScheduleStore {
    repository: Arc<dyn ScheduleRepository>,
    days: Mutex<Vec<Day>>,
}

impl ScheduleStore {
    /// Loads the persisted document and builds the store around it.
    ///
    /// Day ids are re-derived from positions and repeated event ids get a
    /// numeric suffix, so a hand-edited document still satisfies the id rules.
    /// A document that needed fixing is written back straight away.
    pub async fn load(repository: Arc<dyn ScheduleRepository>) -> StoreResult<Self> {
        let mut days = repository.load().await?;

        let renumbered = domain::renumber(&mut days);
        if renumbered {
            warn!("Stored schedule had out-of-sequence day ids; renumbered on load");
        }
        let deduped = domain::dedupe_event_ids(&mut days);
        if deduped {
            warn!("Stored schedule had repeated event ids within a day; suffixed on load");
        }
        if renumbered || deduped {
            repository.save(&days).await?;
        }
        info!(days = days.len(), "Schedule loaded");

        Ok(Self {
            repository,
            days: Mutex::new(days),
        })
    }

    pub async fn get_schedule(&self) -> Vec<Day> {
        self.days.lock().await.clone()
    }

    pub async fn add_day(&self, day: &str, date: &str) -> StoreResult<Vec<Day>> {
        require("day", day)?;
        require("date", date)?;

        self.mutate("add_day", |days| {
            let position = days.len() + 1;
            days.push(Day::new(position, day, date));
            Ok(())
        })
        .await
    }

    pub async fn add_event(&self, day_id: &str, new_event: NewEvent) -> StoreResult<Vec<Day>> {
        require("time", &new_event.time)?;
        require_sluggable_name(&new_event.name)?;

        self.mutate("add_event", |days| {
            let day = find_day_mut(days, day_id)?;
            let id = day.next_event_id(&new_event.name, None);
            day.events.push(Event::new(
                id,
                new_event.time,
                new_event.name,
                new_event.link,
                new_event.has_outline,
            ));
            Ok(())
        })
        .await
    }

    pub async fn update_event(
        &self,
        day_id: &str,
        event_id: &str,
        update: EventUpdate,
    ) -> StoreResult<Vec<Day>> {
        if let Some(time) = &update.time {
            require("time", time)?;
        }
        if let Some(name) = &update.name {
            require_sluggable_name(name)?;
        }

        self.mutate("update_event", |days| {
            let day = find_day_mut(days, day_id)?;
            let current = day
                .find_event(event_id)
                .ok_or_else(|| event_not_found(day_id, event_id))?;

            let new_id = match &update.name {
                Some(name) if *name != current.name => day.next_event_id(name, Some(event_id)),
                _ => current.id.clone(),
            };

            let event = day
                .find_event_mut(event_id)
                .ok_or_else(|| event_not_found(day_id, event_id))?;
            event.id = new_id;
            if let Some(time) = update.time {
                event.time = time;
            }
            if let Some(name) = update.name {
                event.name = name;
            }
            if update.link.is_some() {
                event.link = domain::normalize_link(update.link);
            }
            if update.has_outline.is_some() {
                event.has_outline = domain::normalize_outline(update.has_outline);
            }
            Ok(())
        })
        .await
    }

    pub async fn delete_event(&self, day_id: &str, event_id: &str) -> StoreResult<Vec<Day>> {
        self.mutate("delete_event", |days| {
            let day = find_day_mut(days, day_id)?;
            let index = day
                .events
                .iter()
                .position(|e| e.id == event_id)
                .ok_or_else(|| event_not_found(day_id, event_id))?;
            day.events.remove(index);
            Ok(())
        })
        .await
    }

    /// Removes a day and renumbers every day after it.
    pub async fn delete_day(&self, day_id: &str) -> StoreResult<Vec<Day>> {
        self.mutate("delete_day", |days| {
            let index = days
                .iter()
                .position(|d| d.id == day_id)
                .ok_or_else(|| StoreError::DayNotFound(day_id.to_string()))?;
            days.remove(index);
            domain::renumber(days);
            domain::dedupe_event_ids(days);
            Ok(())
        })
        .await
    }

    /// Replaces the whole document with the built-in sample schedule.
    pub async fn initialize_sample_data(&self) -> StoreResult<Vec<Day>> {
        self.mutate("initialize_sample_data", |days| {
            *days = sample_schedule();
            Ok(())
        })
        .await
    }

    async fn mutate<F>(&self, operation: &str, apply: F) -> StoreResult<Vec<Day>>
    where
        F: FnOnce(&mut Vec<Day>) -> StoreResult<()>,
    {
        let mut days = self.days.lock().await;
        let mut draft = days.clone();
        apply(&mut draft)?;

        if let Err(e) = self.repository.save(&draft).await {
            error!(operation, "Failed to persist schedule: {}", e);
            return Err(e.into());
        }

        *days = draft;
        info!(operation, days = days.len(), "Schedule updated");
        Ok(days.clone())
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

fn find_day_mut<'a>(days: &'a mut [Day], day_id: &str) -> StoreResult<&'a mut Day> {
    days.iter_mut()
        .find(|d| d.id == day_id)
        .ok_or_else(|| StoreError::DayNotFound(day_id.to_string()))
}

fn event_not_found(day_id: &str, event_id: &str) -> StoreError {
    StoreError::EventNotFound {
        day_id: day_id.to_string(),
        event_id: event_id.to_string(),
    }
}

fn require(field: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!("'{}' must not be empty", field)));
    }
    Ok(())
}

fn require_sluggable_name(name: &str) -> StoreResult<()> {
    require("name", name)?;
    if domain::slug(name).is_empty() {
        return Err(StoreError::Validation(
            "'name' must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(())
}
