//! Built-in time controls and the custom time picker steps

use serde::Serialize;

use super::CustomTime;

/// Largest increment the custom picker offers, in seconds.
pub const MAX_CUSTOM_INCREMENT: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PresetCategory {
    Bullet,
    Blitz,
    Rapid,
    Classic,
}

/// A named time control, e.g. `"3+2"`: three minutes plus two seconds per move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub label: &'static str,
    pub category: PresetCategory,
    /// Base time in seconds.
    pub time: u32,
    /// Increment in seconds.
    pub inc: u32,
}

impl Preset {
    const fn new(label: &'static str, category: PresetCategory, time: u32, inc: u32) -> Self {
        Self {
            label,
            category,
            time,
            inc,
        }
    }
}

pub const PRESETS: &[Preset] = &[
    Preset::new("1+0", PresetCategory::Bullet, 60, 0),
    Preset::new("2+1", PresetCategory::Bullet, 120, 1),
    Preset::new("3+0", PresetCategory::Blitz, 180, 0),
    Preset::new("3+2", PresetCategory::Blitz, 180, 2),
    Preset::new("5+0", PresetCategory::Blitz, 300, 0),
    Preset::new("5+3", PresetCategory::Blitz, 300, 3),
    Preset::new("10+0", PresetCategory::Rapid, 600, 0),
    Preset::new("10+5", PresetCategory::Rapid, 600, 5),
    Preset::new("15+10", PresetCategory::Rapid, 900, 10),
    Preset::new("30+0", PresetCategory::Classic, 1800, 0),
    Preset::new("30+20", PresetCategory::Classic, 1800, 20),
];

/// Look up a preset by its label.
pub fn find_preset(label: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.label == label)
}

/// Base-time steps for the custom picker, coarser as time grows.
pub fn time_steps() -> Vec<u32> {
    let mut steps: Vec<u32> = (15..=120).step_by(15).collect();
    steps.extend((150..=240).step_by(30));
    steps.extend((300..=900).step_by(60));
    steps.extend((1200..=1800).step_by(300));
    steps
}

/// The time control the custom picker opens with.
pub fn default_custom(remember: bool, last: Option<CustomTime>) -> CustomTime {
    match last {
        Some(custom) if remember => custom,
        _ => {
            let steps = time_steps();
            CustomTime {
                time: steps[steps.len() / 2],
                inc: 0,
            }
        }
    }
}

/// Check a custom pick against the picker's allowed values.
pub fn validate_custom(custom: CustomTime) -> Result<(), String> {
    if !time_steps().contains(&custom.time) {
        return Err(format!("{} seconds is not an available base time", custom.time));
    }
    if custom.inc > MAX_CUSTOM_INCREMENT {
        return Err(format!(
            "increment of {} seconds exceeds the {} second maximum",
            custom.inc, MAX_CUSTOM_INCREMENT
        ));
    }
    Ok(())
}
