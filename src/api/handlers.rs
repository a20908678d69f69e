//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, Query, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{debug, error, info};

use crate::{
    clock::{Side, DEFAULT_BASE_SECONDS, DEFAULT_INCREMENT_SECONDS},
    settings::{presets, AppSettings, CustomTime, SettingsUpdate, PRESETS},
    state::{AppError, AppState},
};
use super::responses::{
    ApiResponse, CustomDefaultsResponse, GameParams, HealthResponse, PresetsResponse,
    StatusResponse,
};

/// Handle GET /presets - List built-in time controls and custom picker steps
pub async fn presets_handler() -> Json<PresetsResponse> {
    Json(PresetsResponse {
        presets: PRESETS.to_vec(),
        time_steps: presets::time_steps(),
        max_increment: presets::MAX_CUSTOM_INCREMENT,
    })
}

/// Handle GET /custom/defaults - Time control the custom picker opens with
pub async fn custom_defaults_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CustomDefaultsResponse>, AppError> {
    let custom = state.custom_defaults()?;
    Ok(Json(CustomDefaultsResponse { custom }))
}

/// Handle POST /game?time=&inc= - Start a game with an explicit time control
pub async fn new_game_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GameParams>,
) -> Result<Json<ApiResponse>, AppError> {
    let base = params.time.unwrap_or(DEFAULT_BASE_SECONDS);
    let inc = params.inc.unwrap_or(DEFAULT_INCREMENT_SECONDS);

    let clock = state.new_game(base, inc).map_err(|e| {
        error!("Failed to start game: {}", e);
        e
    })?;
    Ok(Json(ApiResponse::new(
        format!("Game started: {}s + {}s", base, inc),
        clock,
    )))
}

/// Handle POST /game/preset/:label - Start a game from a preset
pub async fn preset_game_handler(
    State(state): State<Arc<AppState>>,
    Path(label): Path<String>,
) -> Result<Json<ApiResponse>, AppError> {
    let clock = state.start_preset(&label)?;
    info!("Preset game {} started", label);
    Ok(Json(ApiResponse::new(format!("Preset {} started", label), clock)))
}

/// Handle POST /game/custom - Start a game from the custom picker
pub async fn custom_game_handler(
    State(state): State<Arc<AppState>>,
    Json(custom): Json<CustomTime>,
) -> Result<Json<ApiResponse>, AppError> {
    let clock = state.start_custom(custom).await?;
    info!("Custom game {}s + {}s started", custom.time, custom.inc);
    Ok(Json(ApiResponse::new("Custom game started", clock)))
}

/// Handle POST /press/:side - A player taps their side of the clock
pub async fn press_handler(
    State(state): State<Arc<AppState>>,
    Path(side): Path<String>,
) -> Result<Json<ApiResponse>, AppError> {
    let side = Side::from_name(&side)
        .ok_or_else(|| AppError::NotFound(format!("side {}", side)))?;
    let clock = state.press(side)?;
    Ok(Json(ApiResponse::new(format!("{} pressed", side.as_str()), clock)))
}

/// Handle POST /pause - Toggle pause
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, AppError> {
    let clock = state.toggle_pause()?;
    let message = if clock.paused { "Clock paused" } else { "Clock resumed" };
    Ok(Json(ApiResponse::new(message, clock)))
}

/// Handle POST /restart - Reset the current game to its start values
pub async fn restart_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, AppError> {
    let clock = state.restart()?;
    Ok(Json(ApiResponse::new("Clock restarted", clock)))
}

/// Handle GET /clock - Current clock snapshot and server status
pub async fn clock_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, AppError> {
    let clock = state.snapshot()?;
    let settings = state.current_settings()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        clock,
        driver_running: state.driver_running(),
        settings,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /clock/stream - Server-sent events, one per published snapshot
pub async fn clock_stream_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let snapshots = state.subscribe_snapshots();
    drop(state);

    // The current snapshot goes out first, then every change after it.
    let events = stream::unfold((snapshots, true), |(mut snapshots, first)| async move {
        if !first {
            snapshots.changed().await.ok()?;
        }
        let snapshot = snapshots.borrow_and_update().clone();
        let event = Event::default()
            .event("clock")
            .json_data(&snapshot)
            .unwrap_or_else(|e| {
                debug!("Dropping unserializable snapshot: {}", e);
                Event::default().comment("snapshot unavailable")
            });
        Some((Ok(event), (snapshots, false)))
    });

    info!("Clock stream subscriber connected");
    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /settings
pub async fn get_settings_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AppSettings>, AppError> {
    Ok(Json(state.current_settings()?))
}

/// Handle PUT /settings - Merge and persist a partial settings update
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<AppSettings>, AppError> {
    let settings = state.update_settings(update).await.map_err(|e| {
        error!("Failed to update settings: {}", e);
        e
    })?;
    Ok(Json(settings))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
