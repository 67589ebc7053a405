//! Schedule definition model.

use std::str::FromStr;

use cron::Schedule;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::recorder::validate_name;
use crate::{Error, Result};

/// A durable, time-triggered recording definition.
///
/// Independent of recording records: a definition describes *when* to
/// fire a start request, never the state of a running capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDefinition {
    pub id: Uuid,
    /// Trigger expression (cron syntax with a seconds field).
    pub cron: String,
    /// Capture source passed through to the start operation.
    pub source_url: String,
    /// Recording name to start.
    pub name: String,
    /// Optional duration limit in minutes.
    pub duration_limit: Option<u32>,
}

impl ScheduleDefinition {
    /// Validate the trigger expression and the name format.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        self.schedule()?;
        Ok(())
    }

    /// Parse the trigger expression.
    pub fn schedule(&self) -> Result<Schedule> {
        Schedule::from_str(&self.cron)
            .map_err(|e| Error::invalid_schedule(format!("'{}': {}", self.cron, e)))
    }
}
