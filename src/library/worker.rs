//! Background directory scans.
//!
//! Each scan runs on its own thread and reports back over a channel. Starting
//! a new scan cancels the one in flight; a report that arrives for an older
//! generation is dropped, so only the latest request can replace the list.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use super::error::LibraryError;
use super::model::Track;
use super::provider::Scanner;

/// Shared cancellation flag for one scan.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outcome of one finished scan.
#[derive(Debug)]
pub struct ScanReport {
    pub generation: u64,
    pub dir: PathBuf,
    pub result: Result<Vec<Track>, LibraryError>,
}

pub struct ScanWorker {
    scanner: Scanner,
    tx: Sender<ScanReport>,
    rx: Receiver<ScanReport>,
    generation: u64,
    in_flight: Option<CancelToken>,
}

impl ScanWorker {
    pub fn new(scanner: Scanner) -> Self {
        let (tx, rx) = mpsc::channel::<ScanReport>();
        Self {
            scanner,
            tx,
            rx,
            generation: 0,
            in_flight: None,
        }
    }

    /// Start scanning `dir`, superseding any scan still running.
    ///
    /// Returns the generation number the report will carry.
    pub fn start(&mut self, dir: &Path) -> u64 {
        if let Some(prev) = self.in_flight.take() {
            log::info!("superseding scan generation {}", self.generation);
            prev.cancel();
        }

        self.generation += 1;
        let generation = self.generation;
        let cancel = CancelToken::new();
        self.in_flight = Some(cancel.clone());

        let tx = self.tx.clone();
        let scanner = self.scanner.clone();
        let dir = dir.to_path_buf();
        thread::spawn(move || {
            let result = scanner.scan_directory(&dir, &cancel);
            let _ = tx.send(ScanReport {
                generation,
                dir,
                result,
            });
        });

        generation
    }

    /// Return the report of the latest scan if it has finished.
    ///
    /// Reports from superseded scans are discarded here.
    pub fn try_recv(&mut self) -> Option<ScanReport> {
        while let Ok(report) = self.rx.try_recv() {
            if report.generation != self.generation {
                log::debug!(
                    "dropping stale scan report {} for {}",
                    report.generation,
                    report.dir.display()
                );
                continue;
            }
            self.in_flight = None;
            return Some(report);
        }
        None
    }

    /// Cancel the scan in flight, if any. Its report will be discarded.
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
            // Bump the generation so a late report is treated as stale.
            self.generation += 1;
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.in_flight.is_some()
    }

    #[cfg(test)]
    pub(crate) fn wait(&mut self, timeout: std::time::Duration) -> Option<ScanReport> {
        let deadline = std::time::Instant::now() + timeout;
        while std::time::Instant::now() < deadline {
            if let Some(r) = self.try_recv() {
                return Some(r);
            }
            thread::sleep(std::time::Duration::from_millis(5));
        }
        None
    }
}
