//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{AppError, ClockSnapshot};
use crate::{
    clock::{ClockEvent, ClockState, MonotonicClock, Side},
    settings::{
        find_preset, presets, AppSettings, CustomTime, SettingsStore, SettingsUpdate,
    },
    tasks::TickDriver,
};

/// The game in progress, plus the generation that authorises tick tasks.
#[derive(Debug, Default)]
pub struct Session {
    pub clock: ClockState,
    /// Bumped on every transition; a tick task bound to an older value is stale.
    pub generation: u64,
}

/// What a driver tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time was accounted and the clock is still running.
    Continue,
    /// The session moved on since this task was spawned; nothing was applied.
    Stale,
    /// The clock stopped running, e.g. a side expired.
    Finished,
}

/// Main application state: the single clock session and everything around it
#[derive(Debug)]
pub struct AppState {
    /// Current game; every mutation goes through this lock
    pub session: Mutex<Session>,
    /// Display settings and their store
    pub settings: Mutex<AppSettings>,
    pub settings_store: SettingsStore,
    /// Held across read, merge and save so writes land on disk in order
    settings_write: tokio::sync::Mutex<()>,
    /// Time source for every transition and tick
    pub clock_source: Arc<dyn MonotonicClock>,
    pub tick_interval: Duration,
    driver: Mutex<TickDriver>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Clock events for the feedback sink
    pub event_tx: broadcast::Sender<ClockEvent>,
    /// Latest display snapshot
    pub snapshot_tx: watch::Sender<ClockSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<ClockSnapshot>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        tick_interval: Duration,
        settings_store: SettingsStore,
        settings: AppSettings,
        clock_source: Arc<dyn MonotonicClock>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let session = Session::default();
        let (snapshot_tx, snapshot_rx) =
            watch::channel(ClockSnapshot::capture(&session.clock, &settings));

        Self {
            session: Mutex::new(session),
            settings: Mutex::new(settings),
            settings_store,
            settings_write: tokio::sync::Mutex::new(()),
            clock_source,
            tick_interval,
            driver: Mutex::new(TickDriver::new()),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            event_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Session>, AppError> {
        self.session
            .lock()
            .map_err(|e| AppError::Internal(format!("Failed to lock clock session: {}", e)))
    }

    fn lock_settings(&self) -> Result<MutexGuard<'_, AppSettings>, AppError> {
        self.settings
            .lock()
            .map_err(|e| AppError::Internal(format!("Failed to lock settings: {}", e)))
    }

    fn lock_driver(&self) -> Result<MutexGuard<'_, TickDriver>, AppError> {
        self.driver
            .lock()
            .map_err(|e| AppError::Internal(format!("Failed to lock tick driver: {}", e)))
    }

    /// Start a new game with an explicit time control, replacing the current one
    pub fn new_game(
        self: &Arc<Self>,
        base_seconds: f64,
        increment_seconds: f64,
    ) -> Result<ClockSnapshot, AppError> {
        let fresh = ClockState::start(base_seconds, increment_seconds)?;
        let settings = self.current_settings()?;

        let mut session = self.lock_session()?;
        session.clock = fresh;
        session.generation += 1;
        info!(
            "New game: base={}s increment={}s",
            base_seconds, increment_seconds
        );
        self.commit(session, &settings, "new-game", Vec::new())
    }

    /// Start a game from a built-in preset such as `"3+2"`
    pub fn start_preset(self: &Arc<Self>, label: &str) -> Result<ClockSnapshot, AppError> {
        let preset = find_preset(label)
            .ok_or_else(|| AppError::NotFound(format!("preset {}", label)))?;
        self.new_game(f64::from(preset.time), f64::from(preset.inc))
    }

    /// Start a game from the custom picker, remembering it if enabled
    pub async fn start_custom(
        self: &Arc<Self>,
        custom: CustomTime,
    ) -> Result<ClockSnapshot, AppError> {
        presets::validate_custom(custom).map_err(AppError::InvalidConfig)?;

        if self.current_settings()?.remember_custom {
            self.update_settings(SettingsUpdate {
                last_custom: Some(custom),
                ..Default::default()
            })
            .await?;
        }

        self.new_game(f64::from(custom.time), f64::from(custom.inc))
    }

    /// The time control the custom picker should open with
    pub fn custom_defaults(&self) -> Result<CustomTime, AppError> {
        let settings = self.current_settings()?;
        Ok(presets::default_custom(
            settings.remember_custom,
            settings.last_custom,
        ))
    }

    /// A tap on one side of the clock
    pub fn press(self: &Arc<Self>, side: Side) -> Result<ClockSnapshot, AppError> {
        debug!("Press on {}", side.as_str());
        self.transition(&format!("press-{}", side.as_str()), |clock, now| {
            clock.press_side(side, now)
        })
    }

    pub fn toggle_pause(self: &Arc<Self>) -> Result<ClockSnapshot, AppError> {
        self.transition("pause", |clock, now| clock.toggle_pause(now))
    }

    pub fn restart(self: &Arc<Self>) -> Result<ClockSnapshot, AppError> {
        self.transition("restart", |clock, _| clock.restart())
    }

    /// Run one user transition under the session lock.
    fn transition<F>(self: &Arc<Self>, action: &str, apply: F) -> Result<ClockSnapshot, AppError>
    where
        F: FnOnce(&mut ClockState, Instant) -> Option<ClockEvent>,
    {
        let settings = self.current_settings()?;
        let mut session = self.lock_session()?;
        let now = self.clock_source.now();

        let mut events = Vec::new();
        // Bill the running side up to this instant before the transition resets the baseline.
        if session.clock.should_tick() {
            events.extend(session.clock.tick(now));
        }
        events.extend(apply(&mut session.clock, now));

        if events.is_empty() {
            debug!("Ignored {}: no transition from the current state", action);
        } else {
            session.generation += 1;
        }

        self.commit(session, &settings, action, events)
    }

    /// Resync the driver, then publish the new snapshot and events.
    fn commit(
        self: &Arc<Self>,
        session: MutexGuard<'_, Session>,
        settings: &AppSettings,
        action: &str,
        events: Vec<ClockEvent>,
    ) -> Result<ClockSnapshot, AppError> {
        self.lock_driver()?.sync(self, &session);
        let snapshot = ClockSnapshot::capture(&session.clock, settings);
        drop(session); // Release the lock before notifying anyone

        if !events.is_empty() {
            self.record_action(action);
        }
        for event in events {
            self.emit(event);
        }
        self.publish(snapshot.clone());

        Ok(snapshot)
    }

    /// One tick from the driver task bound to `generation`.
    pub fn apply_tick(&self, generation: u64) -> Result<TickOutcome, AppError> {
        let settings = self.current_settings()?;
        let mut session = self.lock_session()?;
        if session.generation != generation {
            return Ok(TickOutcome::Stale);
        }

        let event = session.clock.tick(self.clock_source.now());
        if event.is_some() {
            session.generation += 1;
        }
        let running = session.clock.should_tick();
        let snapshot = ClockSnapshot::capture(&session.clock, &settings);
        drop(session);

        self.publish(snapshot);
        if let Some(event) = event {
            self.record_action("expired");
            self.emit(event);
        }

        Ok(if running {
            TickOutcome::Continue
        } else {
            TickOutcome::Finished
        })
    }

    /// Merge and persist a settings update, then redraw the display.
    ///
    /// The in-memory settings only change once the file write succeeded.
    pub async fn update_settings(&self, update: SettingsUpdate) -> Result<AppSettings, AppError> {
        let _write = self.settings_write.lock().await;

        let mut candidate = self.current_settings()?;
        candidate.apply(update);
        self.settings_store
            .save(&candidate)
            .await
            .map_err(AppError::Internal)?;

        *self.lock_settings()? = candidate.clone();
        info!(
            "Settings updated: format={:?} threshold={:?} remember_custom={}",
            candidate.time_format, candidate.sub_second_threshold, candidate.remember_custom
        );

        let snapshot = self.snapshot()?;
        self.publish(snapshot);
        Ok(candidate)
    }

    pub fn current_settings(&self) -> Result<AppSettings, AppError> {
        self.lock_settings().map(|settings| settings.clone())
    }

    /// Current display snapshot; reading never advances the clock
    pub fn snapshot(&self) -> Result<ClockSnapshot, AppError> {
        let settings = self.current_settings()?;
        let session = self.lock_session()?;
        Ok(ClockSnapshot::capture(&session.clock, &settings))
    }

    /// Follow the display snapshot as transitions and ticks publish it
    pub fn subscribe_snapshots(&self) -> watch::Receiver<ClockSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Whether a tick task is currently alive
    pub fn driver_running(&self) -> bool {
        self.lock_driver()
            .map(|driver| driver.is_running())
            .unwrap_or(false)
    }

    /// Tear down: stop ticking for good
    pub fn shutdown(&self) {
        match self.lock_driver() {
            Ok(mut driver) => driver.stop(),
            Err(e) => warn!("Failed to stop tick driver: {}", e),
        }
        info!("Clock torn down");
    }

    fn emit(&self, event: ClockEvent) {
        info!("Clock event: {:?}", event);
        if let Err(e) = self.event_tx.send(event) {
            debug!("No feedback listener for clock event: {}", e);
        }
    }

    fn publish(&self, snapshot: ClockSnapshot) {
        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to publish clock snapshot: {}", e);
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
