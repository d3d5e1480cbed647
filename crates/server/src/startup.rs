use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use service::resources::JsonResourceStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the store behind `data_file` and load it eagerly so a corrupt file
/// stops startup instead of failing the first request.
pub async fn build_state(data_file: &str) -> Result<AppState, StartupError> {
    let store = Arc::new(JsonResourceStore::new(data_file));
    store.init().await?;
    info!(path = %store.path().display(), "resource store ready");
    Ok(AppState::new(store))
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = cfg
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address {}: {e}", cfg.bind_addr())))?;

    let state = build_state(&cfg.storage.data_file).await?;
    let app = build_app(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "resource registry listening");
    serve(listener, app, ctrl_c()).await
}
