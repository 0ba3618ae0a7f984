//! HTTP API server
//!
//! Exposes the evaluation and scenario use cases as JSON endpoints.

mod auth;
mod routes;

pub use auth::BasicAuth;

use axum::{Router, middleware};
use dilemma_application::{EvaluateUseCase, GenerateScenarioUseCase};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub evaluate: EvaluateUseCase,
    pub generate: GenerateScenarioUseCase,
    pub basic_auth: Option<BasicAuth>,
}

impl AppState {
    pub fn new(evaluate: EvaluateUseCase, generate: GenerateScenarioUseCase) -> Self {
        Self {
            evaluate,
            generate,
            basic_auth: None,
        }
    }

    pub fn with_basic_auth(mut self, basic_auth: BasicAuth) -> Self {
        self.basic_auth = Some(basic_auth);
        self
    }
}

/// Build the router with every route, the auth gate and the trace layer
pub fn router(state: AppState) -> Router {
    let state = Arc::new(state);
    Router::new()
        .merge(routes::api_routes())
        .merge(routes::health_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_basic_auth,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until the process is stopped
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
