//! Block-level playback: windowed tracks on a shared timeline, the metronome,
//! and the mixer that averages them into output blocks.
//!
//! Everything here runs on the audio thread. Sources are asked for exactly
//! one block at a time through [`BlockSource`]; the mixer only decides which
//! of them are queried.

/// Drift-free click track.
pub mod metronome;
/// Mean of active block sources, scaled to `i16`.
pub mod mixer;
/// Shared playback cursor.
pub mod timeline;
/// Windowed, loopable playback of one generator.
pub mod track;

use crate::graph::node::Sample;

/// A source the mixer pulls one whole block at a time.
pub trait BlockSource: Send {
    /// Fill `out` with the next block.
    fn render_block(&mut self, out: &mut [Sample]);

    /// Inactive sources are skipped by the mixer and do not count towards the
    /// mean.
    fn is_active(&self) -> bool {
        true
    }

    /// Return to the start of playback.
    fn reset(&mut self) {}
}

impl BlockSource for Box<dyn BlockSource> {
    fn render_block(&mut self, out: &mut [Sample]) {
        (**self).render_block(out)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

pub use metronome::Metronome;
pub use mixer::Mixer;
pub use timeline::TimeLine;
pub use track::{Track, TrackWindow};
