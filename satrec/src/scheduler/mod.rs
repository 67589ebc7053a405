//! Time-triggered recording schedules.
//!
//! The schedule manager is a pure producer of start requests into the
//! recorder: it holds no recording state of its own. Definitions are
//! persisted on every mutation and re-armed in full at startup, so
//! scheduled behavior survives a controller restart.

mod definition;
mod store;

pub use definition::ScheduleDefinition;
pub use store::ScheduleStore;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::recorder::RecorderService;
use crate::{Error, Result};

/// Manages durable schedule definitions and their armed trigger
/// tasks.
pub struct ScheduleService {
    store: ScheduleStore,
    recorder: Arc<RecorderService>,
    timezone: Tz,
    armed: Mutex<HashMap<uuid::Uuid, CancellationToken>>,
    shutdown: CancellationToken,
}

impl ScheduleService {
    pub fn new(
        store: ScheduleStore,
        recorder: Arc<RecorderService>,
        timezone: Tz,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            recorder,
            timezone,
            armed: Mutex::new(HashMap::new()),
            shutdown,
        }
    }

    /// Reload all persisted definitions and re-arm their triggers.
    /// Called once at startup, before external requests are accepted.
    pub async fn load_and_arm(&self) -> Result<()> {
        let definitions = self.store.load().await;
        for definition in &definitions {
            if let Err(e) = definition.validate() {
                warn!(id = %definition.id, error = %e, "Skipping invalid persisted schedule");
                continue;
            }
            self.arm(definition.clone());
        }
        info!(count = definitions.len(), "Schedules re-armed");
        Ok(())
    }

    /// All persisted definitions.
    pub async fn list(&self) -> Vec<ScheduleDefinition> {
        self.store.load().await
    }

    /// Persist a new definition and arm its trigger.
    pub async fn add(&self, definition: ScheduleDefinition) -> Result<()> {
        definition.validate()?;
        let mut definitions = self.store.load().await;
        definitions.retain(|existing| existing.id != definition.id);
        definitions.push(definition.clone());
        self.store.save(&definitions).await?;
        self.arm(definition);
        Ok(())
    }

    /// Replace an existing definition, re-arming its trigger.
    pub async fn update(&self, definition: ScheduleDefinition) -> Result<()> {
        definition.validate()?;
        let mut definitions = self.store.load().await;
        let slot = definitions
            .iter_mut()
            .find(|existing| existing.id == definition.id)
            .ok_or_else(|| Error::schedule_not_found(definition.id))?;
        *slot = definition.clone();
        self.store.save(&definitions).await?;
        self.arm(definition);
        Ok(())
    }

    /// Disarm and remove a definition.
    pub async fn remove(&self, id: uuid::Uuid) -> Result<()> {
        let mut definitions = self.store.load().await;
        let before = definitions.len();
        definitions.retain(|existing| existing.id != id);
        if definitions.len() == before {
            return Err(Error::schedule_not_found(id));
        }
        self.store.save(&definitions).await?;
        self.disarm(id);
        Ok(())
    }

    /// Fire a schedule now, exactly as its trigger would. Returns the
    /// output path, or `None` if the firing was skipped because the
    /// name is still recording.
    pub async fn trigger(&self, id: uuid::Uuid) -> Result<Option<PathBuf>> {
        let definition = self
            .store
            .load()
            .await
            .into_iter()
            .find(|existing| existing.id == id)
            .ok_or_else(|| Error::schedule_not_found(id))?;
        fire(&self.recorder, &definition).await
    }

    fn arm(&self, definition: ScheduleDefinition) {
        let token = self.shutdown.child_token();
        if let Some(previous) = self.armed.lock().insert(definition.id, token.clone()) {
            previous.cancel();
        }
        debug!(id = %definition.id, name = %definition.name, cron = %definition.cron, "Schedule armed");
        let recorder = self.recorder.clone();
        let timezone = self.timezone;
        tokio::spawn(run_schedule(definition, recorder, timezone, token));
    }

    fn disarm(&self, id: uuid::Uuid) {
        if let Some(token) = self.armed.lock().remove(&id) {
            token.cancel();
            debug!(id = %id, "Schedule disarmed");
        }
    }
}

/// Armed trigger loop: sleep until the next cron occurrence in the
/// configured timezone, fire, repeat until cancelled.
async fn run_schedule(
    definition: ScheduleDefinition,
    recorder: Arc<RecorderService>,
    timezone: Tz,
    token: CancellationToken,
) {
    let Ok(schedule) = definition.schedule() else {
        // Validated before arming; an unparsable expression here
        // means the definition was mutated behind our back.
        warn!(id = %definition.id, "Armed schedule has invalid cron expression");
        return;
    };

    loop {
        let Some(next) = schedule.upcoming(timezone).next() else {
            info!(id = %definition.id, "Schedule has no upcoming occurrence; disarming");
            return;
        };
        let wait = (next.with_timezone(&Utc) - Utc::now())
            .to_std()
            .unwrap_or_default();

        tokio::select! {
            _ = token.cancelled() => {
                debug!(id = %definition.id, "Schedule task cancelled");
                return;
            }
            _ = tokio::time::sleep(wait) => {
                if let Err(e) = fire(&recorder, &definition).await {
                    warn!(id = %definition.id, name = %definition.name, error = %e, "Scheduled start failed");
                }
            }
        }
    }
}

/// Invoke the recorder for a definition. A `DuplicateActive` means a
/// prior firing (or a manual start) is still running: the firing is
/// skipped and logged, never queued.
async fn fire(
    recorder: &RecorderService,
    definition: &ScheduleDefinition,
) -> Result<Option<PathBuf>> {
    match recorder
        .start(
            &definition.name,
            &definition.source_url,
            definition.duration_limit,
        )
        .await
    {
        Ok(path) => {
            info!(id = %definition.id, name = %definition.name, path = %path.display(), "Scheduled recording started");
            Ok(Some(path))
        }
        Err(Error::DuplicateActive(name)) => {
            info!(id = %definition.id, name = %name, "Skipping firing; recording still active");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
