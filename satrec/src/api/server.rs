//! API server setup.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::routes;
use crate::recorder::RecorderService;
use crate::scheduler::ScheduleService;
use crate::{Error, Result};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server start time for uptime calculation
    pub start_time: Instant,
    /// Recording lifecycle manager
    pub recorder: Arc<RecorderService>,
    /// Schedule manager
    pub scheduler: Arc<ScheduleService>,
}

impl AppState {
    pub fn new(recorder: Arc<RecorderService>, scheduler: Arc<ScheduleService>) -> Self {
        Self {
            start_time: Instant::now(),
            recorder,
            scheduler,
        }
    }
}

/// Bind and serve the API until `shutdown` is cancelled.
pub async fn run(state: AppState, addr: SocketAddr, shutdown: CancellationToken) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Other(format!("Failed to bind {}: {}", addr, e)))?;
    info!(%addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| Error::Other(format!("API server error: {}", e)))
}
