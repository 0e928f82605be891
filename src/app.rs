//! Player controller: owns the transport, sequencer, library and track list
//! and turns `Command`s and ticks into playback.
//!
//! The TUI and the MPRIS bridge only talk to `App`; nothing else touches the
//! transport directly.

mod command;
mod model;
mod progress;

pub use command::{AppEvent, Command, ErrorSource};
pub use model::App;
pub use progress::NO_POSITION;
