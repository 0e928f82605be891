//! The `App` controller.
//!
//! Runs entirely on the event-loop thread. Directory scans are handed to a
//! `ScanWorker` and their results are collected in `tick`, so the track list
//! is only ever replaced here.

use std::path::Path;
use std::sync::mpsc::{self, Receiver};

use crate::audio::{MediaBackend, Transport, TransportEvent, TransportState};
use crate::config::{DefaultsStore, Settings};
use crate::library::{
    Library, LibraryError, PlaylistEntry, ScanReport, ScanWorker, Track, is_valid_playlist_name,
};
use crate::sequencer::{Advance, RepeatMode, Sequencer};

use super::command::{AppEvent, Command, ErrorSource};
use super::progress::{NO_POSITION, describe, round_volume};

pub struct App<B: MediaBackend, S: DefaultsStore> {
    transport: Transport<B>,
    transport_rx: Receiver<TransportEvent>,
    sequencer: Sequencer,
    library: Library<S>,
    scans: ScanWorker,

    tracks: Vec<Track>,
    playlists: Vec<PlaylistEntry>,
    selected: Option<usize>,
    current: Option<Track>,

    progress: f64,
    time_info: String,
    volume_step: f32,

    events: Vec<AppEvent>,
}

impl<B: MediaBackend, S: DefaultsStore> App<B, S> {
    pub fn new(backend: B, library: Library<S>, mut sequencer: Sequencer, settings: &Settings) -> Self {
        let (tx, transport_rx) = mpsc::channel();
        let mut transport = Transport::new(backend, tx);
        transport.set_volume(round_volume(settings.audio.initial_volume));
        sequencer.set_mode(settings.playback.repeat_mode.into(), &[], None, false);
        let scans = ScanWorker::new(library.scanner());

        Self {
            transport,
            transport_rx,
            sequencer,
            library,
            scans,
            tracks: Vec::new(),
            playlists: Vec::new(),
            selected: None,
            current: None,
            progress: 0.0,
            time_info: NO_POSITION.to_string(),
            volume_step: settings.audio.volume_step,
            events: Vec::new(),
        }
    }

    /// Restore the last session: the last playlist, else the last directory,
    /// else `fallback_dir` (which becomes the new default directory).
    pub fn initialize(&mut self, fallback_dir: Option<&Path>) {
        self.refresh_playlists();

        if let Some(path) = self.library.default_playlist() {
            if self.load_playlist_file(&path) {
                return;
            }
        }

        if let Some(dir) = self.library.default_directory() {
            self.open_directory(&dir);
        } else if let Some(dir) = fallback_dir {
            if let Err(e) = self.library.set_default_directory(dir) {
                self.push_error(ErrorSource::Library, e.to_string());
            }
            self.open_directory(dir);
        } else {
            log::warn!("no directory to restore and no music directory found");
        }
    }

    /// Poll the transport, apply finished scans and refresh progress.
    pub fn tick(&mut self) {
        self.transport.poll();
        self.drain_transport();

        while let Some(report) = self.scans.try_recv() {
            self.apply_scan(report);
        }

        let (progress, time_info) = describe(self.transport.query_position());
        self.progress = progress;
        self.time_info = time_info;
    }

    /// Stop any scan in flight. Called before the event loop exits.
    pub fn shutdown(&mut self) {
        self.scans.cancel();
        if self.transport.can_stop() {
            self.transport.stop();
        }
        self.drain_transport();
    }

    pub fn can_execute(&self, cmd: &Command) -> bool {
        match cmd {
            Command::Play => self.selected_track().is_some(),
            Command::Pause => self.transport.can_pause(),
            Command::Stop => self.transport.can_stop(),
            Command::Next => self.can_go_next(),
            Command::Previous => self.can_go_previous(),
            Command::VolumeUp => self.transport.volume() < 1.0,
            Command::VolumeDown => self.transport.volume() > 0.0,
            Command::Mute => true,
            Command::SetRepeatMode(mode) => *mode != self.sequencer.mode(),
            Command::OpenDirectory(dir) => !dir.as_os_str().is_empty(),
            Command::SavePlaylist(name) => is_valid_playlist_name(name),
            Command::OpenPlaylist(index) => *index < self.playlists.len(),
        }
    }

    /// Run `cmd` if it is currently enabled. Returns whether it ran.
    pub fn execute(&mut self, cmd: Command) -> bool {
        if !self.can_execute(&cmd) {
            log::debug!("command {cmd:?} is disabled");
            return false;
        }

        match cmd {
            Command::Play => {
                if let Some(track) = self.selected_track().cloned() {
                    self.play(&track);
                }
            }
            Command::Pause => self.transport.pause(),
            Command::Stop => self.transport.stop(),
            Command::Next => self.advance(Advance::Next),
            Command::Previous => self.advance(Advance::Previous),
            Command::VolumeUp => self.step_volume(self.volume_step),
            Command::VolumeDown => self.step_volume(-self.volume_step),
            Command::Mute => {
                self.transport.toggle_mute();
            }
            Command::SetRepeatMode(mode) => self.set_repeat_mode(mode),
            Command::OpenDirectory(dir) => self.open_directory(&dir),
            Command::SavePlaylist(name) => self.save_playlist(&name),
            Command::OpenPlaylist(index) => self.open_playlist(index),
        }

        self.drain_transport();
        true
    }

    /// Play `track` and take it out of the shuffle pool.
    pub fn play(&mut self, track: &Track) {
        self.start(track);
        self.sequencer.mark_played(track);
    }

    /// Move to the track the sequencer picks for `advance`. A `None` pick
    /// leaves playback untouched.
    pub fn advance(&mut self, advance: Advance) {
        let Some(track) = self
            .sequencer
            .next_track(&self.tracks, self.current.as_ref(), advance)
        else {
            log::debug!("{advance:?}: nothing to play in {:?}", self.sequencer.mode());
            return;
        };

        if self.transport.can_stop() {
            self.transport.stop();
        }
        self.start(&track);
        if let Some(i) = self.tracks.iter().position(|t| t.same_file(&track)) {
            self.selected = Some(i);
        }
    }

    fn start(&mut self, track: &Track) {
        log::info!("playing {}", track.path.display());
        self.transport.play(&track.path);
        self.current = Some(track.clone());
        if self.transport.state() == TransportState::Playing {
            self.events.push(AppEvent::TrackStarted(track.path.clone()));
        }
    }

    fn step_volume(&mut self, delta: f32) {
        let v = round_volume(self.transport.volume() + delta);
        self.transport.set_volume(v);
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        let active = matches!(
            self.transport.state(),
            TransportState::Playing | TransportState::Paused
        );
        self.sequencer
            .set_mode(mode, &self.tracks, self.current.as_ref(), active);
    }

    /// Start a background scan of `dir`. The list is replaced in `tick` when
    /// it completes; a newer scan supersedes this one.
    pub fn open_directory(&mut self, dir: &Path) {
        log::info!("scanning {}", dir.display());
        self.scans.start(dir);
    }

    fn apply_scan(&mut self, report: ScanReport) {
        match report.result {
            Ok(tracks) => {
                if let Err(e) = self.library.set_default_directory(&report.dir) {
                    self.push_error(ErrorSource::Library, e.to_string());
                }
                self.replace_tracks(tracks);
            }
            Err(LibraryError::Cancelled(dir)) => {
                log::debug!("scan of {} was cancelled", dir.display());
            }
            Err(e @ LibraryError::NoTracks(_)) => {
                self.replace_tracks(Vec::new());
                self.push_error(ErrorSource::Library, e.to_string());
            }
            Err(e) => self.push_error(ErrorSource::Library, e.to_string()),
        }
    }

    fn open_playlist(&mut self, index: usize) {
        if let Some(entry) = self.playlists.get(index).cloned() {
            self.load_playlist_file(&entry.path);
        }
    }

    /// Replace the list with the playlist at `path`. Returns false when it
    /// could not be read; the current list is kept in that case.
    fn load_playlist_file(&mut self, path: &Path) -> bool {
        self.scans.cancel();
        match self.library.load_playlist(path) {
            Ok(tracks) => {
                if let Err(e) = self.library.set_default_playlist(path) {
                    self.push_error(ErrorSource::Library, e.to_string());
                }
                self.replace_tracks(tracks);
                true
            }
            Err(e) => {
                self.push_error(ErrorSource::Library, e.to_string());
                false
            }
        }
    }

    fn save_playlist(&mut self, name: &str) {
        match self.library.save_playlist(name, &self.tracks) {
            Ok(path) => {
                if let Err(e) = self.library.set_default_playlist(&path) {
                    self.push_error(ErrorSource::Library, e.to_string());
                }
                self.refresh_playlists();
                self.events.push(AppEvent::PlaylistSaved(path));
            }
            Err(e) => self.push_error(ErrorSource::Library, e.to_string()),
        }
    }

    fn refresh_playlists(&mut self) {
        match self.library.list_playlists() {
            Ok(entries) => self.playlists = entries,
            Err(e) => self.push_error(ErrorSource::Library, e.to_string()),
        }
    }

    fn replace_tracks(&mut self, tracks: Vec<Track>) {
        log::info!("track list replaced: {} tracks", tracks.len());
        self.tracks = tracks;
        self.selected = if self.tracks.is_empty() { None } else { Some(0) };

        if self.sequencer.mode() == RepeatMode::Shuffle {
            let active = matches!(
                self.transport.state(),
                TransportState::Playing | TransportState::Paused
            );
            self.sequencer
                .reset_pool(&self.tracks, self.current.as_ref(), active);
        }

        self.events.push(AppEvent::TracksReplaced {
            count: self.tracks.len(),
        });
    }

    fn drain_transport(&mut self) {
        while let Ok(event) = self.transport_rx.try_recv() {
            match event {
                TransportEvent::StateChanged(state) => log::debug!("transport is {state}"),
                TransportEvent::TrackFinished => self.advance(Advance::Finished),
                TransportEvent::Error(message) => self.push_error(ErrorSource::Transport, message),
            }
        }
    }

    fn push_error(&mut self, source: ErrorSource, message: String) {
        log::warn!("{source:?} error: {message}");
        self.events.push(AppEvent::Error { source, message });
    }

    /// Drain the notifications produced since the last call.
    pub fn take_events(&mut self) -> Vec<AppEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.tracks.len() {
            self.selected = Some(index);
        }
    }

    pub fn select_next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        let last = self.tracks.len() - 1;
        self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(last)));
    }

    pub fn select_previous(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn playlists(&self) -> &[PlaylistEntry] {
        &self.playlists
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.selected.and_then(|i| self.tracks.get(i))
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Index of the current track in the list, if it is in it.
    pub fn current_index(&self) -> Option<usize> {
        let cur = self.current.as_ref()?;
        self.tracks.iter().position(|t| t.same_file(cur))
    }

    pub fn state(&self) -> TransportState {
        self.transport.state()
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.sequencer.mode()
    }

    #[cfg(test)]
    pub fn shuffle_pool(&self) -> &[Track] {
        self.sequencer.pool()
    }

    pub fn can_go_next(&self) -> bool {
        self.sequencer.can_go_next(&self.tracks, self.current.as_ref())
    }

    pub fn can_go_previous(&self) -> bool {
        self.sequencer
            .can_go_previous(&self.tracks, self.current.as_ref())
    }

    pub fn volume(&self) -> f32 {
        self.transport.volume()
    }

    pub fn is_muted(&self) -> bool {
        self.transport.is_muted()
    }

    /// Label of the mute control: the action it will perform.
    pub fn mute_label(&self) -> &'static str {
        if self.transport.is_muted() { "Unmute" } else { "Mute" }
    }

    /// Elapsed share of the current track, `0.0..=100.0`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn time_info(&self) -> &str {
        &self.time_info
    }

    pub fn is_scanning(&self) -> bool {
        self.scans.is_scanning()
    }

    #[cfg(test)]
    pub fn library(&self) -> &Library<S> {
        &self.library
    }
}
