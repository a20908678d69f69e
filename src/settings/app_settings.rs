//! Persisted user settings

use serde::{Deserialize, Serialize};

/// How many sub-second digits the display shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    #[default]
    Tenths,
    Hundredths,
    All,
}

impl TimeFormat {
    /// Number of fractional digits rendered.
    pub fn digits(self) -> u32 {
        match self {
            TimeFormat::Tenths => 1,
            TimeFormat::Hundredths => 2,
            TimeFormat::All => 3,
        }
    }
}

/// When the sub-second part of the display is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubSecondThreshold {
    #[serde(rename = "always")]
    Always,
    #[serde(rename = "never")]
    Never,
    #[serde(rename = "below-1min")]
    Below1Min,
    #[serde(rename = "below-30sec")]
    Below30Sec,
    #[default]
    #[serde(rename = "below-10sec")]
    Below10Sec,
}

impl SubSecondThreshold {
    /// Whether `seconds` is displayed with its fractional part.
    pub fn shows_fraction(self, seconds: f64) -> bool {
        match self {
            SubSecondThreshold::Always => true,
            SubSecondThreshold::Never => false,
            SubSecondThreshold::Below1Min => seconds < 60.0,
            SubSecondThreshold::Below30Sec => seconds < 30.0,
            SubSecondThreshold::Below10Sec => seconds < 10.0,
        }
    }
}

/// A custom time control picked on the custom screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTime {
    /// Base time in seconds.
    pub time: u32,
    /// Increment in seconds.
    pub inc: u32,
}

/// All user-configurable settings, stored as one JSON record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub time_format: TimeFormat,
    #[serde(default)]
    pub sub_second_threshold: SubSecondThreshold,
    /// Keep the last custom time control for the next custom game.
    #[serde(default)]
    pub remember_custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_custom: Option<CustomTime>,
}

/// Partial settings update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub time_format: Option<TimeFormat>,
    pub sub_second_threshold: Option<SubSecondThreshold>,
    pub remember_custom: Option<bool>,
    pub last_custom: Option<CustomTime>,
}

impl AppSettings {
    /// Merge `update` over the current values.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(time_format) = update.time_format {
            self.time_format = time_format;
        }
        if let Some(threshold) = update.sub_second_threshold {
            self.sub_second_threshold = threshold;
        }
        if let Some(remember) = update.remember_custom {
            self.remember_custom = remember;
        }
        if let Some(custom) = update.last_custom {
            self.last_custom = Some(custom);
        }
    }
}
