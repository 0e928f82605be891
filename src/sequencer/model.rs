use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::library::Track;

use super::mode::{Advance, RepeatMode};

/// Picks the track to play for a given trigger and repeat mode.
///
/// The current track is located by path; with duplicate paths the first
/// occurrence wins.
pub struct Sequencer<R: Rng = StdRng> {
    mode: RepeatMode,
    pool: Vec<Track>,
    rng: R,
}

impl Sequencer<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl Default for Sequencer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Sequencer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            mode: RepeatMode::Normal,
            pool: Vec::new(),
            rng,
        }
    }

    pub fn mode(&self) -> RepeatMode {
        self.mode
    }

    /// Switch modes without touching playback. Entering `Shuffle` always
    /// rebuilds the pool.
    pub fn set_mode(&mut self, mode: RepeatMode, tracks: &[Track], current: Option<&Track>, active: bool) {
        log::debug!("repeat mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        if mode == RepeatMode::Shuffle {
            self.reset_pool(tracks, current, active);
        } else {
            self.pool.clear();
        }
    }

    /// Refill the pool with `tracks`, leaving out `current` while it is
    /// playing or paused.
    pub fn reset_pool(&mut self, tracks: &[Track], current: Option<&Track>, active: bool) {
        self.pool = tracks.to_vec();
        if active {
            if let Some(cur) = current {
                if let Some(i) = self.pool.iter().position(|t| t.same_file(cur)) {
                    self.pool.remove(i);
                }
            }
        }
    }

    /// Drop `track` from the shuffle pool after it was started directly.
    pub fn mark_played(&mut self, track: &Track) {
        if self.mode != RepeatMode::Shuffle {
            return;
        }
        if let Some(i) = self.pool.iter().position(|t| t.same_file(track)) {
            self.pool.remove(i);
        }
    }

    #[cfg(test)]
    pub fn pool(&self) -> &[Track] {
        &self.pool
    }

    pub fn can_go_next(&self, tracks: &[Track], current: Option<&Track>) -> bool {
        let Some(cur) = current else {
            return false;
        };
        match self.mode {
            RepeatMode::RepeatTrack => true,
            RepeatMode::RepeatList | RepeatMode::Shuffle => !tracks.is_empty(),
            RepeatMode::Normal => match index_of(tracks, cur) {
                Some(i) => i + 1 < tracks.len(),
                None => !tracks.is_empty(),
            },
        }
    }

    pub fn can_go_previous(&self, tracks: &[Track], current: Option<&Track>) -> bool {
        let Some(cur) = current else {
            return false;
        };
        match self.mode {
            RepeatMode::RepeatTrack => true,
            RepeatMode::RepeatList | RepeatMode::Shuffle => !tracks.is_empty(),
            RepeatMode::Normal => index_of(tracks, cur).is_some_and(|i| i > 0),
        }
    }

    /// The track to play for `advance`, or `None` when nothing should change.
    pub fn next_track(&mut self, tracks: &[Track], current: Option<&Track>, advance: Advance) -> Option<Track> {
        match self.mode {
            RepeatMode::RepeatTrack => current.cloned(),
            RepeatMode::Shuffle => self.pick_random(tracks),
            RepeatMode::Normal => {
                let idx = current.and_then(|c| index_of(tracks, c));
                let target = match (advance, idx) {
                    (Advance::Previous, Some(i)) => i.checked_sub(1),
                    (Advance::Previous, None) => None,
                    (_, Some(i)) => Some(i + 1),
                    (_, None) => Some(0),
                };
                target.and_then(|i| tracks.get(i)).cloned()
            }
            RepeatMode::RepeatList => {
                if tracks.is_empty() {
                    return None;
                }
                let last = tracks.len() - 1;
                let idx = current.and_then(|c| index_of(tracks, c));
                let target = match (advance, idx) {
                    (Advance::Previous, Some(0) | None) => last,
                    (Advance::Previous, Some(i)) => i - 1,
                    (_, Some(i)) if i < last => i + 1,
                    (_, _) => 0,
                };
                tracks.get(target).cloned()
            }
        }
    }

    fn pick_random(&mut self, tracks: &[Track]) -> Option<Track> {
        if tracks.is_empty() {
            return None;
        }
        if self.pool.is_empty() {
            log::debug!("shuffle pool exhausted, refilling with {} tracks", tracks.len());
            self.pool = tracks.to_vec();
        }
        let i = self.rng.random_range(0..self.pool.len());
        Some(self.pool.remove(i))
    }
}

fn index_of(tracks: &[Track], track: &Track) -> Option<usize> {
    tracks.iter().position(|t| t.same_file(track))
}
