//! Router assembly and the listener loop.

use axum::Router;
use folio_core::{Error, Result};

use crate::routes::{content_routes, health_routes, meta_routes};
use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(content_routes())
        .merge(meta_routes())
        .with_state(state)
        .merge(health_routes())
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn start_server(host: &str, port: u16, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|e| Error::config(format!("cannot listen on {host}:{port}: {e}")))?;
    let addr = listener.local_addr()?;
    tracing::info!("Starting Folio server on http://{}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
