pub mod handlers;
mod relay;
pub mod types;

pub use relay::BackendRelay;

use crate::{Result, config::Config, protocol::Operation};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Builds the relay router around an already constructed [`BackendRelay`].
pub fn router(relay: Arc<BackendRelay>, max_body_bytes: usize) -> Router {
    let app_state = handlers::AppState { relay };

    Router::new()
        .route(
            &Operation::GenerateFromText.path(),
            post(handlers::generate_from_text),
        )
        .route(
            &Operation::GenerateFromFile.path(),
            post(handlers::generate_from_file),
        )
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run(config: Config) -> Result<()> {
    let base_url = config.backend.base_url.clone();
    if base_url.is_empty() {
        warn!("No backend base URL configured; requests will target relative paths and fail");
    } else {
        info!("Relaying generation requests to {}", base_url);
    }

    let relay = Arc::new(BackendRelay::new(base_url));
    let app = router(relay, config.server.max_body_bytes);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
