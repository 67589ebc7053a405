use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use satrec::api::server::{self, AppState};
use satrec::config::Settings;
use satrec::logging;
use satrec::reconciler::{OutputSignature, ProcessTable, SysinfoProcessTable};
use satrec::recorder::{FfmpegSpawner, RecorderService, Spawner};
use satrec::registry::RegistryStore;
use satrec::scheduler::{ScheduleService, ScheduleStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before anything reads them.
    dotenvy::dotenv().ok();

    let settings = Arc::new(Settings::from_env_or_default());
    let _guard = logging::init_logging(&settings.log_dir)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        recordings_dir = %settings.recordings_dir.display(),
        timezone = settings.timezone.name(),
        "satrec starting"
    );

    let store = Arc::new(RegistryStore::new(&settings.state_dir));
    let signature = OutputSignature::new(&settings.file_prefix, &settings.media_extension);
    let table: Arc<dyn ProcessTable> = Arc::new(SysinfoProcessTable::new(signature));
    let spawner: Arc<dyn Spawner> = Arc::new(FfmpegSpawner::new(&settings.ffmpeg_bin));

    let recorder = Arc::new(RecorderService::new(
        settings.clone(),
        store,
        table,
        spawner,
    ));

    // First reconcile pass: after a crash or restart this repairs the
    // registry against the live process table before anything is
    // served.
    let active = recorder.status().await?;
    info!(active = active.len(), "Initial reconciliation complete");

    let shutdown = CancellationToken::new();

    let scheduler = Arc::new(ScheduleService::new(
        ScheduleStore::new(&settings.state_dir),
        recorder.clone(),
        settings.timezone,
        shutdown.child_token(),
    ));
    scheduler.load_and_arm().await?;

    let ctrl_c_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            ctrl_c_shutdown.cancel();
        }
    });

    let addr: SocketAddr = format!("{}:{}", settings.bind_address, settings.port).parse()?;
    server::run(AppState::new(recorder, scheduler), addr, shutdown).await?;

    info!("satrec stopped");
    Ok(())
}
