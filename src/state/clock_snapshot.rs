//! Read-only display copy of the clock

use serde::Serialize;

use crate::{
    clock::{ClockState, PerSide, Side},
    settings::AppSettings,
    utils::format_time,
};

/// Display snapshot handed to observers after every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockSnapshot {
    pub remaining: PerSide<f64>,
    /// Remaining time formatted with the current display settings.
    pub display: PerSide<String>,
    pub turn: Option<Side>,
    pub paused: bool,
    pub expired: PerSide<bool>,
    pub base_seconds: f64,
    pub increment_seconds: f64,
    /// Whether the tick driver should be running for this state.
    pub running: bool,
}

impl ClockSnapshot {
    pub fn capture(clock: &ClockState, settings: &AppSettings) -> Self {
        let remaining = clock.remaining_both();
        Self {
            display: remaining.map(|_, seconds| {
                format_time(*seconds, settings.time_format, settings.sub_second_threshold)
            }),
            remaining,
            turn: clock.turn(),
            paused: clock.is_paused(),
            expired: clock.expired_both(),
            base_seconds: clock.base_seconds(),
            increment_seconds: clock.increment_seconds(),
            running: clock.should_tick(),
        }
    }
}

impl Default for ClockSnapshot {
    fn default() -> Self {
        Self::capture(&ClockState::default(), &AppSettings::default())
    }
}
