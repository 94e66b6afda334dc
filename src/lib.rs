use std::sync::Arc;

use tracing::info;

pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod storage;

use codec::CipherCodec;
use config::{HubConfig, ViewConfig};
use storage::TeamStore;

/// Everything the HTTP handlers share. Built once at startup.
pub struct AppState {
    pub store: TeamStore,
    pub codec: CipherCodec,
    pub view: ViewConfig,
}

impl AppState {
    pub fn new(store: TeamStore, codec: CipherCodec, view: ViewConfig) -> Self {
        Self { store, codec, view }
    }
}

pub async fn run_server(config: HubConfig) -> anyhow::Result<()> {
    let codec = CipherCodec::from_config(&config.cipher)?;
    let state = Arc::new(AppState::new(TeamStore::new(), codec, config.view.clone()));

    // broadcast channel for shutdown signaling
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    let http_state = state.clone();
    let http_shutdown = shutdown_tx.clone();
    let addr = config.server.bind_address();
    let mut http =
        tokio::spawn(async move { api::http::run(http_state, addr, http_shutdown).await });

    tokio::select! {
        res = &mut http => return res?,
        _ = shutdown_signal() => {}
    }

    let _ = shutdown_tx.send(());
    http.await??;
    info!("Shut down with {} teams in memory", state.store.len().await);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
