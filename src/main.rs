//! Chess Clock - A headless two-sided chess clock served over HTTP
//!
//! This is the main entry point for the chess-clock server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use chess_clock::{
    api::create_router,
    clock::SystemClock,
    config::Config,
    settings::SettingsStore,
    state::AppState,
    tasks::{feedback_task, LogFeedback},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("chess_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting chess-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick={}ms, settings={}",
        config.host,
        config.port,
        config.tick_interval().as_millis(),
        config.settings.display()
    );

    let settings_store = SettingsStore::new(&config.settings);
    let settings = settings_store.load().await;

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.tick_interval(),
        settings_store,
        settings,
        Arc::new(SystemClock::new()),
    ));

    // Forward clock events to the feedback sink
    let feedback = tokio::spawn(feedback_task(Arc::clone(&state), LogFeedback));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /presets            - Built-in time controls");
    info!("  GET  /custom/defaults    - Custom picker defaults");
    info!("  POST /game?time=&inc=    - Start a game");
    info!("  POST /game/preset/:label - Start a preset game");
    info!("  POST /game/custom        - Start a custom game");
    info!("  POST /press/:side        - Tap white or black");
    info!("  POST /pause              - Toggle pause");
    info!("  POST /restart            - Restart the game");
    info!("  GET  /clock              - Current clock status");
    info!("  GET  /settings, PUT /settings");
    info!("  GET  /health             - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    feedback.abort();

    info!("Server shutdown complete");
    Ok(())
}
