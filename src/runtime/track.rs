//! Track - one generator played through a window of the timeline
//!
//! A window describes where inside a `length`-frame loop the generator is
//! audible:
//!
//! ```text
//!   cursor:  0 ......... start ============ stop ......... length
//!            silence     generator pulled      silence      wrap / end
//! ```
//!
//! The generator is only pulled while the cursor is inside the window, so its
//! own state does not move during the silent parts. A `stop` of 0 means the
//! window runs to the end of the loop.

use crate::{
    error::{EngineError, Result},
    graph::node::{Sample, SignalSource},
    runtime::BlockSource,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Placement of a track inside its loop, in frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackWindow {
    pub start: u64,
    pub stop: u64,
    pub length: u64,
    pub looping: bool,
}

impl TrackWindow {
    pub fn new(start: u64, stop: u64, length: u64, looping: bool) -> Result<Self> {
        let window = Self {
            start,
            stop,
            length,
            looping,
        };
        window.validate()?;
        Ok(window)
    }

    /// Whole loop audible, wrapping forever.
    pub fn looping(length: u64) -> Result<Self> {
        Self::new(0, 0, length, true)
    }

    pub fn validate(&self) -> Result<()> {
        if self.length == 0 {
            return Err(EngineError::InvalidTrackWindow(
                "length must be greater than zero".into(),
            ));
        }
        if self.start > self.length {
            return Err(EngineError::InvalidTrackWindow(format!(
                "start {} is past length {}",
                self.start, self.length
            )));
        }
        if self.stop != 0 && (self.stop <= self.start || self.stop > self.length) {
            return Err(EngineError::InvalidTrackWindow(format!(
                "stop {} must be 0 or in ({}, {}]",
                self.stop, self.start, self.length
            )));
        }
        Ok(())
    }

    #[inline]
    fn is_audible(&self, cursor: u64) -> bool {
        cursor >= self.start && (self.stop == 0 || cursor < self.stop)
    }
}

pub struct Track {
    generator: Box<dyn SignalSource>,
    window: Option<TrackWindow>,
    cursor: u64,
    active: bool,
}

impl Track {
    /// Play `generator` with no window: always audible, never ends.
    pub fn new<S: SignalSource + 'static>(generator: S) -> Self {
        Self {
            generator: Box::new(generator),
            window: None,
            cursor: 0,
            active: true,
        }
    }

    pub fn windowed<S: SignalSource + 'static>(generator: S, window: TrackWindow) -> Result<Self> {
        window.validate()?;
        Ok(Self {
            generator: Box::new(generator),
            window: Some(window),
            cursor: 0,
            active: true,
        })
    }

    /// Park the track until the next `reset()`.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn window(&self) -> Option<&TrackWindow> {
        self.window.as_ref()
    }
}

impl BlockSource for Track {
    fn render_block(&mut self, out: &mut [Sample]) {
        if !self.active {
            out.fill(Sample::SILENCE);
            return;
        }

        let Some(window) = self.window else {
            self.generator.render_block(out);
            self.cursor = self.cursor.saturating_add(out.len() as u64);
            return;
        };

        for i in 0..out.len() {
            if self.cursor >= window.length {
                if window.looping {
                    self.cursor = 0;
                } else {
                    self.active = false;
                    out[i..].fill(Sample::SILENCE);
                    return;
                }
            }

            out[i] = if window.is_audible(self.cursor) {
                self.generator.next_sample()
            } else {
                Sample::SILENCE
            };
            self.cursor += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn reset(&mut self) {
        self.cursor = 0;
        self.active = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Emits 0, 1, 2, ... so gaps and repeats are visible.
    struct Counter(f32);

    impl SignalSource for Counter {
        fn next_sample(&mut self) -> Sample {
            let value = self.0;
            self.0 += 1.0;
            Sample::Mono(value)
        }
    }

    #[test]
    fn window_validation() {
        assert!(TrackWindow::new(0, 0, 0, true).is_err());
        assert!(TrackWindow::new(11, 0, 10, false).is_err());
        assert!(TrackWindow::new(5, 5, 10, false).is_err());
        assert!(TrackWindow::new(5, 11, 10, false).is_err());
        assert!(TrackWindow::new(10, 0, 10, false).is_ok());
        assert!(TrackWindow::new(5, 10, 10, true).is_ok());
    }

    #[test]
    fn looping_track_wraps_without_gap_or_repeat() {
        let mut track = Track::windowed(Counter(0.0), TrackWindow::looping(192_000).unwrap()).unwrap();
        let mut block = vec![Sample::SILENCE; 960];
        let mut expected = 0.0;

        for _ in 0..200 {
            track.render_block(&mut block);
            for sample in &block {
                assert_eq!(*sample, Sample::Mono(expected));
                expected += 1.0;
            }
        }
        assert_eq!(track.cursor(), 192_000);

        track.render_block(&mut block);
        assert_eq!(block[0], Sample::Mono(192_000.0));
        assert_eq!(block[959], Sample::Mono(192_959.0));
        assert_eq!(track.cursor(), 960);
        assert!(track.is_active());
    }

    #[test]
    fn window_gates_generator_and_ends() {
        let window = TrackWindow::new(100, 200, 300, false).unwrap();
        let mut track = Track::windowed(Counter(0.0), window).unwrap();
        let mut block = vec![Sample::Mono(9.0); 400];
        track.render_block(&mut block);

        assert!(block[..100].iter().all(|s| *s == Sample::SILENCE));
        assert_eq!(block[100], Sample::Mono(0.0));
        assert_eq!(block[199], Sample::Mono(99.0));
        assert!(block[200..].iter().all(|s| *s == Sample::SILENCE));
        assert!(!track.is_active());
        assert_eq!(track.cursor(), 300);

        // stays silent until reset
        track.render_block(&mut block);
        assert!(block.iter().all(|s| *s == Sample::SILENCE));

        track.reset();
        assert!(track.is_active());
        track.render_block(&mut block[..101]);
        assert_eq!(block[100], Sample::Mono(100.0));
    }

    #[test]
    fn unbounded_track_always_plays() {
        let mut track = Track::new(Counter(0.0));
        let mut block = vec![Sample::SILENCE; 16];
        track.render_block(&mut block);
        assert_eq!(block[15], Sample::Mono(15.0));
        assert!(track.window().is_none());
        assert!(track.is_active());
    }

    #[test]
    fn parked_track_waits_for_reset() {
        let mut track = Track::new(Counter(0.0)).inactive();
        assert!(!track.is_active());
        track.reset();
        assert!(track.is_active());
    }
}
