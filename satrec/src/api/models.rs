//! API request/response models.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::registry::RecordingRecord;
use crate::scheduler::ScheduleDefinition;

/// Request to start a recording.
#[derive(Debug, Deserialize)]
pub struct StartRecordingRequest {
    pub name: String,
    pub source_url: String,
    pub duration_minutes: Option<u32>,
}

/// An active recording, as reported by a status query.
#[derive(Debug, Serialize)]
pub struct RecordingResponse {
    pub name: String,
    pub output_path: PathBuf,
    pub start_time: DateTime<Utc>,
    pub source_url: String,
    pub pid: u32,
    pub duration_minutes: Option<u32>,
}

impl From<RecordingRecord> for RecordingResponse {
    fn from(record: RecordingRecord) -> Self {
        Self {
            name: record.name,
            output_path: record.output_path,
            start_time: record.start_time,
            source_url: record.source_url,
            pid: record.pid,
            duration_minutes: record.duration_limit,
        }
    }
}

/// Response for a successful start.
#[derive(Debug, Serialize)]
pub struct StartRecordingResponse {
    pub name: String,
    pub output_path: PathBuf,
}

/// Response for a successful stop.
#[derive(Debug, Serialize)]
pub struct StopRecordingResponse {
    pub output_path: PathBuf,
}

/// Response for stop-all.
#[derive(Debug, Serialize)]
pub struct StopAllResponse {
    pub stopped: Vec<PathBuf>,
}

/// Request to create or update a schedule.
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub cron: String,
    pub source_url: String,
    pub name: String,
    pub duration_minutes: Option<u32>,
}

impl ScheduleRequest {
    pub fn into_definition(self, id: Uuid) -> ScheduleDefinition {
        ScheduleDefinition {
            id,
            cron: self.cron,
            source_url: self.source_url,
            name: self.name,
            duration_limit: self.duration_minutes,
        }
    }
}

/// A schedule definition, as returned by the API.
#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub cron: String,
    pub source_url: String,
    pub name: String,
    pub duration_minutes: Option<u32>,
}

impl From<ScheduleDefinition> for ScheduleResponse {
    fn from(definition: ScheduleDefinition) -> Self {
        Self {
            id: definition.id,
            cron: definition.cron,
            source_url: definition.source_url,
            name: definition.name,
            duration_minutes: definition.duration_limit,
        }
    }
}

/// Response for a manual schedule trigger.
#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    /// `false` when the firing was skipped because the name is still
    /// recording.
    pub started: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}
