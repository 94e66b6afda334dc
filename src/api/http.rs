use axum::{
    body::Bytes,
    extract::Extension,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast::Sender as BroadcastSender;
use tracing::{debug, info, warn};

use crate::codec::parse_report;
use crate::error::IngestError;
use crate::storage::TeamReading;

pub const ACK: &str = "Data Received";

pub fn router(state: Arc<crate::AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/post-data", post(ingest_handler))
        .route("/api/teams", get(teams_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(Extension(state))
}

pub async fn run(
    state: Arc<crate::AppState>,
    addr: String,
    shutdown: BroadcastSender<()>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    let mut shutdown_sub = shutdown.subscribe();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown_sub.recv().await;
        })
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

/// Decrypt, decode and store one device report. Nothing is stored unless
/// every step succeeds.
async fn ingest(state: &crate::AppState, body: &[u8]) -> Result<TeamReading, IngestError> {
    let plaintext = state.codec.decrypt(body)?;
    debug!(%plaintext, "decrypted report");
    let report = parse_report(&plaintext)?;
    Ok(state.store.upsert(report).await)
}

async fn ingest_handler(
    Extension(state): Extension<Arc<crate::AppState>>,
    body: Bytes,
) -> Result<&'static str, IngestError> {
    match ingest(&state, &body).await {
        Ok(reading) => {
            info!(
                team = %reading.team_id,
                count = reading.report_count,
                "report accepted"
            );
            Ok(ACK)
        }
        Err(e) => {
            warn!(error = %e, bytes = body.len(), "report rejected");
            Err(e)
        }
    }
}

async fn dashboard_handler(Extension(state): Extension<Arc<crate::AppState>>) -> Html<String> {
    let snapshot = state.store.snapshot().await;
    Html(crate::api::view::render_dashboard(&state.view, &snapshot))
}

async fn teams_handler(
    Extension(state): Extension<Arc<crate::AppState>>,
) -> Json<Vec<TeamReading>> {
    Json(state.store.snapshot().await)
}
