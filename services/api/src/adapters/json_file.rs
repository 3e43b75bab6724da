//! services/api/src/adapters/json_file.rs
//!
//! This module contains the JSON file adapter, the concrete implementation of the
//! `ScheduleRepository` port used in production. The whole schedule lives in one
//! pretty-printed JSON document that is replaced wholesale on every save.

use async_trait::async_trait;
use schedule_core::domain::{Day, Event};
use schedule_core::ports::{PortError, PortResult, ScheduleRepository};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A storage adapter that keeps the schedule in a single JSON file.
#[derive(Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Creates a new `JsonFileRepository` for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "schedule.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn ensure_parent_dir(&self) -> PortResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        Ok(())
    }
}

//=========================================================================================
// Persisted Record Structs
//=========================================================================================

#[derive(Serialize, Deserialize)]
struct DayRecord {
    id: String,
    day: String,
    date: String,
    #[serde(default)]
    events: Vec<EventRecord>,
}

impl DayRecord {
    fn to_domain(self) -> Day {
        Day {
            id: self.id,
            day: self.day,
            date: self.date,
            events: self.events.into_iter().map(EventRecord::to_domain).collect(),
        }
    }

    fn from_domain(day: &Day) -> Self {
        Self {
            id: day.id.clone(),
            day: day.day.clone(),
            date: day.date.clone(),
            events: day.events.iter().map(EventRecord::from_domain).collect(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct EventRecord {
    id: String,
    time: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link: Option<String>,
    #[serde(rename = "hasOutline", default, skip_serializing_if = "Option::is_none")]
    has_outline: Option<bool>,
}

impl EventRecord {
    fn to_domain(self) -> Event {
        Event::new(self.id, self.time, self.name, self.link, self.has_outline)
    }

    fn from_domain(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            time: event.time.clone(),
            name: event.name.clone(),
            link: event.link.clone(),
            has_outline: event.has_outline,
        }
    }
}

fn io_error(e: std::io::Error) -> PortError {
    PortError::Io(e.to_string())
}

//=========================================================================================
// `ScheduleRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl ScheduleRepository for JsonFileRepository {
    /// Reads the document, creating an empty one if the file does not exist yet.
    async fn load(&self) -> PortResult<Vec<Day>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No schedule file at {}; creating an empty one", self.path.display());
                self.save(&[]).await?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(io_error(e)),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<DayRecord> = serde_json::from_str(&contents).map_err(|e| {
            PortError::Malformed(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(records.into_iter().map(DayRecord::to_domain).collect())
    }

    /// Writes the document to a sibling temp file, then renames it into place so
    /// a crash mid-write never leaves a truncated schedule behind.
    async fn save(&self, days: &[Day]) -> PortResult<()> {
        self.ensure_parent_dir().await?;

        let records: Vec<DayRecord> = days.iter().map(DayRecord::from_domain).collect();
        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| PortError::Encode(e.to_string()))?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, json).await.map_err(io_error)?;
        fs::rename(&temp_path, &self.path).await.map_err(io_error)?;
        Ok(())
    }
}
