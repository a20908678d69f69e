//! Clock display formatting

use crate::settings::{SubSecondThreshold, TimeFormat};

/// Render `seconds` as `M:SS`, or `M:SS.F`/`M:SS.FF`/`M:SS.FFF` when the
/// threshold allows a fraction. The fraction is truncated, never rounded.
pub fn format_time(seconds: f64, format: TimeFormat, threshold: SubSecondThreshold) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let whole = seconds.floor();
    let total = whole as u64;
    let minutes = total / 60;
    let secs = total % 60;

    if !threshold.shows_fraction(seconds) {
        return format!("{}:{:02}", minutes, secs);
    }

    let digits = format.digits();
    let scale = 10u64.pow(digits);
    let fraction = ((seconds - whole) * scale as f64).floor() as u64;
    let fraction = fraction.min(scale - 1);

    format!(
        "{}:{:02}.{:0width$}",
        minutes,
        secs,
        fraction,
        width = digits as usize
    )
}
