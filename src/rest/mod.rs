use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::repository::Database;
use crate::storage::DocumentStore;

mod handlers;
mod identity;
mod models;

use handlers::{create_profile, delete_profile, get_profile, health, not_found, update_profile};

#[derive(Clone)]
pub struct AppState<S> {
    pub db: Arc<Database<S>>,
    pub started_at: std::time::SystemTime,
}

pub fn router<S: DocumentStore + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health::<S>))
        .route("/profile", get(get_profile::<S>))
        .route("/profile/create", post(create_profile::<S>))
        .route("/profile/update", put(update_profile::<S>))
        .route("/profile/delete", delete(delete_profile::<S>))
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve<S: DocumentStore + Clone + Send + Sync + 'static>(
    addr: SocketAddr,
    db: Arc<Database<S>>,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    log::info!("🌐 REST service on http://{}", addr);

    let app = router(AppState {
        db,
        started_at: std::time::SystemTime::now(),
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
