//! Application builder: wires router, middleware, and state into an Axum app.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use agora_core::config::AppConfig;
use agora_core::traits::Collaborators;
use agora_realtime::RealtimeEngine;

use crate::auth::JwtIdentityResolver;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Creates the engine and state for a configuration and collaborator set.
///
/// Must be called from within a tokio runtime.
pub fn build_state(config: AppConfig, collaborators: Collaborators) -> AppState {
    let identity = Arc::new(JwtIdentityResolver::new(&config.auth));
    let realtime = RealtimeEngine::new(config.realtime.clone(), collaborators.clone());
    AppState::new(Arc::new(config), collaborators, identity, realtime)
}
