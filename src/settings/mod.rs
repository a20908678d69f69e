//! Settings module
//!
//! User display preferences, their JSON store, and the preset and custom
//! time controls a game can be started from.

pub mod app_settings;
pub mod presets;
pub mod store;

pub use app_settings::{AppSettings, CustomTime, SettingsUpdate, SubSecondThreshold, TimeFormat};
pub use presets::{find_preset, Preset, PresetCategory, PRESETS};
pub use store::SettingsStore;
