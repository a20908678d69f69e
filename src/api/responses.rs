//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    settings::{AppSettings, CustomTime, Preset},
    state::{AppError, ClockSnapshot},
};

/// API response structure for clock transition endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub clock: ClockSnapshot,
}

impl ApiResponse {
    pub fn new(message: impl Into<String>, clock: ClockSnapshot) -> Self {
        let status = if clock.expired.white || clock.expired.black {
            "expired"
        } else if clock.paused {
            "paused"
        } else if clock.running {
            "running"
        } else {
            "idle"
        };

        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            clock,
        }
    }
}

/// Clock status with server metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub clock: ClockSnapshot,
    pub driver_running: bool,
    pub settings: AppSettings,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Everything the preset picker needs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetsResponse {
    pub presets: Vec<Preset>,
    pub time_steps: Vec<u32>,
    pub max_increment: u32,
}

/// Defaults for the custom picker
#[derive(Debug, Clone, Serialize)]
pub struct CustomDefaultsResponse {
    pub custom: CustomTime,
}

/// Query parameters for starting a game; absent values use the defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameParams {
    pub time: Option<f64>,
    pub inc: Option<f64>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error body returned for failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = match &self {
            AppError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.to_string(),
            timestamp: Utc::now(),
        };
        (code, Json(body)).into_response()
    }
}
