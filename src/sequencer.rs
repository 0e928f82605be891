//! Track sequencing: which track plays after next/previous/end of track.
//!
//! Pure decision logic over the current list. The controller owns the list
//! and the transport; the sequencer only owns the repeat mode and the
//! shuffle pool.

mod mode;
mod model;

pub use mode::{Advance, RepeatMode};
pub use model::Sequencer;

#[cfg(test)]
mod tests;
