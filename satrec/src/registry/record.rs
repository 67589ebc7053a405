//! Recording record model.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One in-flight capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingRecord {
    /// Unique alphanumeric identifier; the natural key.
    pub name: String,
    /// Absolute destination file path, immutable once assigned.
    pub output_path: PathBuf,
    /// Capture start instant (UTC).
    pub start_time: DateTime<Utc>,
    /// Capture source, opaque after acceptance.
    pub source_url: String,
    /// OS pid of the transcoder; the join key against the live
    /// process table. Meaningful only while that process exists.
    pub pid: u32,
    /// Planned stop time in minutes from start; `None` means
    /// unbounded until an explicit stop.
    pub duration_limit: Option<u32>,
}
