//! `rodio` implementation of `MediaBackend`.
//!
//! A file is decoded into a paused `Sink`; stopping drops the sink, so a
//! later `play` of the same file reopens it from the start.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::library::probe_duration;

use super::backend::MediaBackend;
use super::error::TransportError;

pub struct RodioBackend {
    stream: OutputStream,
    sink: Option<Sink>,
    loaded: Option<PathBuf>,
    duration: Option<Duration>,
    volume: f32,
    muted: bool,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn open_default() -> Result<Self, TransportError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| TransportError::Device(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            loaded: None,
            duration: None,
            volume: 1.0,
            muted: false,
        })
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    fn load(&mut self, path: &Path) -> Result<(), TransportError> {
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let (sink, duration) = create_sink(&self.stream, path)?;
        sink.set_volume(self.effective_volume());
        self.sink = Some(sink);
        self.duration = duration.or_else(|| probe_duration(path));
        self.loaded = Some(path.to_path_buf());
        Ok(())
    }
}

/// Create a paused `Sink` for `path`, returning the decoder's duration if known.
fn create_sink(stream: &OutputStream, path: &Path) -> Result<(Sink, Option<Duration>), TransportError> {
    let file = File::open(path).map_err(|source| TransportError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| TransportError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let duration = source.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, duration))
}

impl MediaBackend for RodioBackend {
    fn open(&mut self, path: &Path) -> Result<(), TransportError> {
        self.loaded = None;
        self.load(path)
    }

    fn play(&mut self) -> Result<(), TransportError> {
        if self.sink.is_none() {
            let path = self.loaded.clone().ok_or(TransportError::NothingLoaded)?;
            self.load(&path)?;
        }
        match self.sink.as_ref() {
            Some(sink) => {
                sink.play();
                Ok(())
            }
            None => Err(TransportError::NothingLoaded),
        }
    }

    fn pause(&mut self) -> Result<(), TransportError> {
        let sink = self.sink.as_ref().ok_or(TransportError::NothingLoaded)?;
        sink.pause();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), TransportError> {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(self.effective_volume());
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(self.effective_volume());
        }
    }

    fn position(&self) -> Option<Duration> {
        self.sink.as_ref().map(Sink::get_pos)
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|s| !s.is_paused() && s.empty())
    }
}
