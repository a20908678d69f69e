//! Integration tests for the HTTP surface.

use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chess_clock::{
    api::create_router,
    clock::MockClock,
    settings::{AppSettings, SettingsStore},
    state::AppState,
};
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::time::timeout;
use tower::ServiceExt;

struct Harness {
    state: Arc<AppState>,
    clock: MockClock,
    settings_path: std::path::PathBuf,
}

impl Harness {
    fn new(name: &str) -> Self {
        let clock = MockClock::default();
        let settings_path = std::env::temp_dir().join(format!(
            "chess-clock-api-{}-{}-{}.json",
            name,
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let state = Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            Duration::from_millis(16),
            SettingsStore::new(&settings_path),
            AppSettings::default(),
            Arc::new(clock.clone()),
        ));
        Self {
            state,
            clock,
            settings_path,
        }
    }

    fn router(&self) -> Router {
        create_router(Arc::clone(&self.state))
    }

    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn post(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::POST, uri, None).await
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.state.shutdown();
        let _ = std::fs::remove_file(&self.settings_path);
    }
}

#[tokio::test]
async fn test_health() {
    let harness = Harness::new("health");
    let (status, body) = harness.call(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_game_defaults_when_params_missing() {
    let harness = Harness::new("defaults");
    let (status, body) = harness.post("/game").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clock"]["baseSeconds"], 300.0);
    assert_eq!(body["clock"]["incrementSeconds"], 0.0);
    assert_eq!(body["status"], "idle");
}

#[tokio::test]
async fn test_invalid_game_rejected() {
    let harness = Harness::new("invalid");
    let (status, body) = harness.post("/game?time=0&inc=2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, _) = harness.post("/game?time=60&inc=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_full_game_flow() {
    let harness = Harness::new("flow");
    let (status, _) = harness.post("/game?time=180&inc=2").await;
    assert_eq!(status, StatusCode::OK);

    // Opening press on Black starts White's clock.
    let (_, body) = harness.post("/press/black").await;
    assert_eq!(body["clock"]["turn"], "white");
    assert_eq!(body["status"], "running");

    // Tapping the idle side does nothing.
    let (_, body) = harness.post("/press/black").await;
    assert_eq!(body["clock"]["turn"], "white");
    assert_eq!(body["clock"]["remaining"]["black"], 180.0);

    harness.clock.advance_secs(10.0);
    let (_, body) = harness.post("/press/white").await;
    assert_eq!(body["clock"]["turn"], "black");
    assert_eq!(body["clock"]["remaining"]["white"], 172.0);
    assert_eq!(body["clock"]["display"]["white"], "2:52");

    let (_, body) = harness.post("/pause").await;
    assert_eq!(body["status"], "paused");
    assert_eq!(body["clock"]["running"], false);

    harness.clock.advance_secs(60.0);
    let (_, body) = harness.post("/pause").await;
    assert_eq!(body["clock"]["remaining"]["black"], 180.0);

    harness.clock.advance_secs(181.0);
    let (_, body) = harness.post("/press/black").await;
    assert_eq!(body["status"], "expired");
    assert_eq!(body["clock"]["expired"]["black"], true);
    assert_eq!(body["clock"]["remaining"]["black"], 0.0);
    assert_eq!(body["clock"]["turn"], Value::Null);

    let (_, body) = harness.post("/press/white").await;
    assert_eq!(body["clock"]["turn"], Value::Null);

    let (_, body) = harness.post("/restart").await;
    assert_eq!(body["status"], "idle");
    assert_eq!(body["clock"]["remaining"]["white"], 180.0);
    assert_eq!(body["clock"]["remaining"]["black"], 180.0);
    assert_eq!(body["clock"]["expired"]["black"], false);
}

#[tokio::test]
async fn test_unknown_side_and_preset() {
    let harness = Harness::new("unknown");
    let (status, _) = harness.post("/press/red").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = harness.post("/game/preset/4+4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_preset_game() {
    let harness = Harness::new("preset");
    let (_, body) = harness.call(Method::GET, "/presets", None).await;
    assert_eq!(body["presets"].as_array().unwrap().len(), 11);
    assert_eq!(body["maxIncrement"], 30);

    let (status, body) = harness.post("/game/preset/15+10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clock"]["baseSeconds"], 900.0);
    assert_eq!(body["clock"]["incrementSeconds"], 10.0);
}

#[tokio::test]
async fn test_custom_game_remembered() {
    let harness = Harness::new("custom");
    let (_, body) = harness.call(Method::GET, "/custom/defaults", None).await;
    assert_eq!(body["custom"], json!({ "time": 360, "inc": 0 }));

    let (status, _) = harness
        .call(Method::POST, "/game/custom", Some(json!({ "time": 365, "inc": 0 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = harness
        .call(Method::PUT, "/settings", Some(json!({ "rememberCustom": true })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rememberCustom"], true);

    let (status, body) = harness
        .call(Method::POST, "/game/custom", Some(json!({ "time": 90, "inc": 5 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clock"]["baseSeconds"], 90.0);

    let (_, body) = harness.call(Method::GET, "/custom/defaults", None).await;
    assert_eq!(body["custom"], json!({ "time": 90, "inc": 5 }));

    let saved = SettingsStore::new(&harness.settings_path).load().await;
    assert!(saved.remember_custom);
    assert_eq!(saved.last_custom.map(|c| c.time), Some(90));
}

#[tokio::test]
async fn test_settings_change_display() {
    let harness = Harness::new("display");
    harness.post("/game?time=9.5").await;

    let (_, body) = harness.call(Method::GET, "/clock", None).await;
    assert_eq!(body["clock"]["display"]["white"], "0:09.5");

    harness
        .call(
            Method::PUT,
            "/settings",
            Some(json!({ "timeFormat": "hundredths", "subSecondThreshold": "never" })),
        )
        .await;

    let (_, body) = harness.call(Method::GET, "/clock", None).await;
    assert_eq!(body["clock"]["display"]["white"], "0:09");
    assert_eq!(body["settings"]["timeFormat"], "hundredths");
    assert_eq!(body["driverRunning"], false);
}

#[tokio::test]
async fn test_failed_settings_save_reports_error() {
    let harness = Harness::new("blocked");
    let blocker = harness.settings_path.with_extension("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let state = Arc::new(AppState::new(
        0,
        "127.0.0.1".to_string(),
        Duration::from_millis(16),
        SettingsStore::new(blocker.join("settings.json")),
        AppSettings::default(),
        Arc::new(harness.clock.clone()),
    ));

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/settings")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "timeFormat": "all" }).to_string()))
        .unwrap();
    let response = create_router(Arc::clone(&state)).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let request = Request::builder().uri("/settings").body(Body::empty()).unwrap();
    let response = create_router(Arc::clone(&state)).oneshot(request).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let settings: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(settings["timeFormat"], "tenths");

    let _ = std::fs::remove_file(&blocker);
}

#[tokio::test]
async fn test_clock_stream_follows_presses() {
    let harness = Harness::new("stream");
    harness.post("/game?time=60").await;

    let request = Request::builder().uri("/clock/stream").body(Body::empty()).unwrap();
    let response = harness.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/event-stream"
    );

    let mut frames = response.into_body().into_data_stream();
    let first = timeout(Duration::from_secs(1), frames.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let first = String::from_utf8_lossy(&first).to_string();
    assert!(first.starts_with("event: clock"), "{}", first);
    assert!(first.contains("\"baseSeconds\":60.0"), "{}", first);
    assert!(first.contains("\"turn\":null"), "{}", first);

    harness.post("/press/black").await;
    let next = timeout(Duration::from_secs(1), frames.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let next = String::from_utf8_lossy(&next).to_string();
    assert!(next.contains("\"turn\":\"white\""), "{}", next);
}
