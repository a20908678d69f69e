//! HTTP API module
//!
//! Stands in for the clock screens: every user action is an endpoint, and
//! every response carries the clock snapshot after the action.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/presets", get(presets_handler))
        .route("/custom/defaults", get(custom_defaults_handler))
        .route("/game", post(new_game_handler))
        .route("/game/preset/:label", post(preset_game_handler))
        .route("/game/custom", post(custom_game_handler))
        .route("/press/:side", post(press_handler))
        .route("/pause", post(pause_handler))
        .route("/restart", post(restart_handler))
        .route("/clock", get(clock_handler))
        .route("/clock/stream", get(clock_stream_handler))
        .route("/settings", get(get_settings_handler).put(update_settings_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
