use std::fmt;

use crate::config::RepeatModeSetting;

/// How the sequencer picks the following track.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Play through the list once.
    #[default]
    Normal,
    /// Restart the current track.
    RepeatTrack,
    /// Wrap around at both ends of the list.
    RepeatList,
    /// Random order without repeats until every track has played.
    Shuffle,
}

impl RepeatMode {
    pub const ALL: [RepeatMode; 4] = [
        RepeatMode::Normal,
        RepeatMode::RepeatTrack,
        RepeatMode::RepeatList,
        RepeatMode::Shuffle,
    ];

    /// The mode after `self` in `ALL`, wrapping.
    pub fn cycle(self) -> Self {
        let i = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Normal => "Normal",
            Self::RepeatTrack => "Repeat track",
            Self::RepeatList => "Repeat list",
            Self::Shuffle => "Shuffle",
        };
        f.write_str(s)
    }
}

impl From<RepeatModeSetting> for RepeatMode {
    fn from(value: RepeatModeSetting) -> Self {
        match value {
            RepeatModeSetting::Normal => Self::Normal,
            RepeatModeSetting::RepeatTrack => Self::RepeatTrack,
            RepeatModeSetting::RepeatList => Self::RepeatList,
            RepeatModeSetting::Shuffle => Self::Shuffle,
        }
    }
}

/// What asked for a new track.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    Next,
    Previous,
    /// The transport reached the natural end of the current track.
    Finished,
}
