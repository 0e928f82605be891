//! Transport state, events and position values.

use std::fmt;
use std::time::Duration;

/// State of the single playing stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TransportState {
    /// Nothing loaded yet, or the last operation failed.
    #[default]
    Unknown,
    Playing,
    Paused,
    Stopped,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "Idle",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Stopped => "Stopped",
        };
        f.write_str(s)
    }
}

/// Notifications the transport sends to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    StateChanged(TransportState),
    /// The stream reached its natural end. Never sent for an explicit stop.
    TrackFinished,
    /// A backend operation failed; the state is now `Unknown`.
    Error(String),
}

/// Elapsed and total time of the loaded stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Position {
    pub elapsed: Duration,
    pub total: Duration,
}

impl Position {
    /// Elapsed time as a percentage of the total, in `[0, 100]`.
    pub fn percent(&self) -> f64 {
        if self.total.is_zero() {
            return 0.0;
        }
        (100.0 * self.elapsed.as_secs_f64() / self.total.as_secs_f64()).min(100.0)
    }
}
