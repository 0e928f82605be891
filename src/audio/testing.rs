//! In-memory `MediaBackend` for tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use super::backend::MediaBackend;
use super::error::TransportError;

#[derive(Debug, Default)]
pub struct FakeState {
    pub opened: Vec<PathBuf>,
    pub loaded: Option<PathBuf>,
    pub playing: bool,
    pub plays: usize,
    pub stops: usize,
    pub volume: f32,
    pub muted: bool,
    pub position: Option<Duration>,
    pub duration: Option<Duration>,
    pub finished: bool,
    pub fail_open: HashSet<PathBuf>,
}

/// Cloning shares the state, so a test keeps a handle after moving the
/// backend into a `Transport`.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    pub state: Rc<RefCell<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, path: impl Into<PathBuf>) {
        self.state.borrow_mut().fail_open.insert(path.into());
    }

    pub fn finish(&self) {
        self.state.borrow_mut().finished = true;
    }

    pub fn set_times(&self, position: Duration, duration: Option<Duration>) {
        let mut s = self.state.borrow_mut();
        s.position = Some(position);
        s.duration = duration;
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.state.borrow().opened.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }
}

impl MediaBackend for FakeBackend {
    fn open(&mut self, path: &Path) -> Result<(), TransportError> {
        let mut s = self.state.borrow_mut();
        s.opened.push(path.to_path_buf());
        if s.fail_open.contains(path) {
            s.loaded = None;
            return Err(TransportError::Decode {
                path: path.to_path_buf(),
                message: "unsupported format".into(),
            });
        }
        s.loaded = Some(path.to_path_buf());
        s.playing = false;
        s.finished = false;
        s.position = Some(Duration::ZERO);
        Ok(())
    }

    fn play(&mut self) -> Result<(), TransportError> {
        let mut s = self.state.borrow_mut();
        if s.loaded.is_none() {
            return Err(TransportError::NothingLoaded);
        }
        s.playing = true;
        s.plays += 1;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), TransportError> {
        self.state.borrow_mut().playing = false;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), TransportError> {
        let mut s = self.state.borrow_mut();
        s.playing = false;
        s.finished = false;
        s.position = Some(Duration::ZERO);
        s.stops += 1;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.state.borrow_mut().muted = muted;
    }

    fn position(&self) -> Option<Duration> {
        let s = self.state.borrow();
        s.loaded.as_ref().and(s.position)
    }

    fn duration(&self) -> Option<Duration> {
        self.state.borrow().duration
    }

    fn is_finished(&self) -> bool {
        let s = self.state.borrow();
        s.playing && s.finished
    }
}
