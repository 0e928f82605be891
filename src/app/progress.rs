//! Progress and elapsed/total text shown while a track plays.

use crate::audio::Position;
use crate::library::format_hms;

/// Shown in place of the time when the transport has no position.
pub const NO_POSITION: &str = "--/--";

/// Progress percentage and time text for an optional position.
pub fn describe(position: Option<Position>) -> (f64, String) {
    match position {
        Some(p) => (
            p.percent(),
            format!("{} / {}", format_hms(p.elapsed), format_hms(p.total)),
        ),
        None => (0.0, NO_POSITION.to_string()),
    }
}

/// Round a volume to two decimals so repeated steps do not drift.
pub fn round_volume(v: f32) -> f32 {
    ((v * 100.0).round() / 100.0).clamp(0.0, 1.0)
}
