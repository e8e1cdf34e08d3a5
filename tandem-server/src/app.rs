use crate::config::ServerConfig;
use crate::room::{RoomRegistry, RoomSummary};
use crate::signaling::{SignalingRouter, SignalingService, ws_handler};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub struct AppState {
    pub signaling: SignalingService,
    pub router: SignalingRouter,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let signaling = SignalingService::new(config.ice_servers.clone());
        let registry = RoomRegistry::new(Arc::new(signaling.clone()));

        Self {
            signaling,
            router: SignalingRouter::new(registry),
        }
    }
}

async fn health() -> &'static str {
    "tandem signaling server running"
}

async fn rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummary>> {
    Json(state.router.registry().summaries().await)
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/rooms", get(rooms))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn serve<F>(config: ServerConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = Arc::new(AppState::new(&config));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Signaling server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Signaling server stopped");
    Ok(())
}
