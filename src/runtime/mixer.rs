use crate::{
    graph::node::Sample,
    runtime::{timeline::TimeLine, track::Track, BlockSource},
    MAX_BLOCK_SIZE,
};

/*
Mixer
=====

Produces one interleaved i16 block per call:

  1. if the timeline has reached its length, reset every source and the
     timeline (checked once, before rendering)
  2. advance the timeline by one block
  3. render every ACTIVE source into scratch space
  4. output = element-wise mean over the active sources, clamped to [-1, 1]
     and scaled by 32767

No active source → a silent block.

The mixer owns the tracks. Sources owned elsewhere (the metronome and the
voice scheduler live on the engine so commands can reach them) are passed to
`next_block_with` for each block and are treated exactly like tracks,
including the timeline reset.

Channel layout: mono output folds each Sample to a scalar, stereo output
broadcasts scalars to both sides. Every buffer is allocated up front for
MAX_BLOCK_SIZE frames.
*/

const I16_PEAK: f32 = 32767.0;

pub struct Mixer {
    channels: usize,
    tracks: Vec<Track>,
    scratch: Vec<Sample>,
    left: Vec<f32>,
    right: Vec<f32>,
}

impl Mixer {
    pub fn new(channels: u16) -> Self {
        Self {
            channels: usize::from(channels.clamp(1, 2)),
            tracks: Vec::new(),
            scratch: vec![Sample::SILENCE; MAX_BLOCK_SIZE],
            left: vec![0.0; MAX_BLOCK_SIZE],
            right: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn channels(&self) -> u16 {
        self.channels as u16
    }

    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
        tracing::debug!(tracks = self.tracks.len(), "track added");
    }

    /// Keep the first `keep` tracks, then restart every remaining one.
    pub fn prune_tracks(&mut self, keep: usize) {
        self.tracks.truncate(keep);
        self.reset_all();
        tracing::debug!(tracks = self.tracks.len(), "tracks pruned");
    }

    pub fn reset_all(&mut self) {
        for track in self.tracks.iter_mut() {
            track.reset();
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn next_block(&mut self, timeline: &mut TimeLine, out: &mut [i16]) {
        self.next_block_with(timeline, &mut [], out);
    }

    /// Mix the owned tracks plus `extra` into `out` (interleaved, `channels`
    /// values per frame).
    pub fn next_block_with(
        &mut self,
        timeline: &mut TimeLine,
        extra: &mut [&mut dyn BlockSource],
        out: &mut [i16],
    ) {
        let frames = (out.len() / self.channels).min(MAX_BLOCK_SIZE);

        if timeline.is_finished() {
            self.reset_all();
            for source in extra.iter_mut() {
                source.reset();
            }
            timeline.reset();
            tracing::trace!("timeline wrapped");
        }
        timeline.advance(frames as u64);

        self.left[..frames].fill(0.0);
        self.right[..frames].fill(0.0);
        let mut active = 0usize;

        for track in self.tracks.iter_mut() {
            if track.is_active() {
                Self::accumulate(
                    track,
                    self.channels,
                    &mut self.scratch[..frames],
                    &mut self.left[..frames],
                    &mut self.right[..frames],
                );
                active += 1;
            }
        }
        for source in extra.iter_mut() {
            if source.is_active() {
                Self::accumulate(
                    &mut **source,
                    self.channels,
                    &mut self.scratch[..frames],
                    &mut self.left[..frames],
                    &mut self.right[..frames],
                );
                active += 1;
            }
        }

        if active == 0 {
            out.fill(0);
            return;
        }

        let scale = 1.0 / active as f32;
        for (i, frame) in out.chunks_exact_mut(self.channels).take(frames).enumerate() {
            frame[0] = to_i16(self.left[i] * scale);
            if self.channels == 2 {
                frame[1] = to_i16(self.right[i] * scale);
            }
        }
    }

    fn accumulate(
        source: &mut dyn BlockSource,
        channels: usize,
        scratch: &mut [Sample],
        left: &mut [f32],
        right: &mut [f32],
    ) {
        source.render_block(scratch);
        if channels == 1 {
            for (acc, sample) in left.iter_mut().zip(scratch.iter()) {
                *acc += sample.mono();
            }
        } else {
            for ((l, r), sample) in left.iter_mut().zip(right.iter_mut()).zip(scratch.iter()) {
                let (sl, sr) = sample.stereo();
                *l += sl;
                *r += sr;
            }
        }
    }
}

#[inline]
fn to_i16(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * I16_PEAK) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::{extensions::NodeExt, node::SignalSource, oscillator::Oscillator, pan::Panner},
        runtime::track::TrackWindow,
    };

    struct Constant(f32);

    impl SignalSource for Constant {
        fn next_sample(&mut self) -> Sample {
            Sample::Mono(self.0)
        }
    }

    /// Block source with a fixed value and activity, counting resets.
    struct Fixed {
        value: Sample,
        active: bool,
        resets: usize,
    }

    impl BlockSource for Fixed {
        fn render_block(&mut self, out: &mut [Sample]) {
            out.fill(self.value);
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    #[test]
    fn only_active_sources_are_mixed() {
        let mut mixer = Mixer::new(1);
        let mut timeline = TimeLine::new(None);
        let mut a = Fixed {
            value: Sample::Mono(0.25),
            active: true,
            resets: 0,
        };
        let mut b = Fixed {
            value: Sample::Mono(-1.0),
            active: false,
            resets: 0,
        };
        let mut out = vec![0i16; 960];
        let sources: &mut [&mut dyn BlockSource] = &mut [&mut a, &mut b];
        mixer.next_block_with(&mut timeline, sources, &mut out);

        assert!(out.iter().all(|&v| v == to_i16(0.25)));
        assert_eq!(timeline.position(), 960);
    }

    #[test]
    fn no_active_sources_is_silent() {
        let mut mixer = Mixer::new(2);
        let mut timeline = TimeLine::new(None);
        let mut out = vec![7i16; 1920];
        mixer.next_block(&mut timeline, &mut out);
        assert!(out.iter().all(|&v| v == 0));

        mixer.add_track(Track::new(Constant(0.5)).inactive());
        out.fill(7);
        mixer.next_block(&mut timeline, &mut out);
        assert!(out.iter().all(|&v| v == 0));
    }

    #[test]
    fn output_is_mean_scaled_and_clamped() {
        let mut mixer = Mixer::new(1);
        let mut timeline = TimeLine::new(None);
        mixer.add_track(Track::new(Constant(0.5)));
        mixer.add_track(Track::new(Constant(0.0)));
        let mut out = vec![0i16; 64];
        mixer.next_block(&mut timeline, &mut out);
        assert!(out.iter().all(|&v| v == to_i16(0.25)));

        let mut loud = Mixer::new(1);
        loud.add_track(Track::new(Constant(3.0)));
        loud.next_block(&mut timeline, &mut out);
        assert!(out.iter().all(|&v| v == 32767));
        assert_eq!(to_i16(-2.0), -32767);
    }

    #[test]
    fn stereo_output_is_interleaved() {
        let mut mixer = Mixer::new(2);
        let mut timeline = TimeLine::new(None);
        // square wave starts at +1, hard left doubles it before clamping
        mixer.add_track(Track::new(
            Oscillator::square(10.0, 48_000.0)
                .with_amplitude(0.25)
                .chain(Panner::new(0.0)),
        ));
        let mut out = vec![0i16; 8];
        mixer.next_block(&mut timeline, &mut out);
        assert_eq!(&out[..2], &[to_i16(0.5), 0]);
    }

    #[test]
    fn finished_timeline_resets_every_source() {
        let mut mixer = Mixer::new(1);
        let mut timeline = TimeLine::new(Some(1920));
        let window = TrackWindow::new(0, 0, 960, false).unwrap();
        mixer.add_track(Track::windowed(Constant(0.5), window).unwrap());
        let mut metronome_like = Fixed {
            value: Sample::Mono(0.0),
            active: true,
            resets: 0,
        };
        let mut out = vec![0i16; 960];

        for _ in 0..2 {
            mixer.next_block_with(&mut timeline, &mut [&mut metronome_like], &mut out);
        }
        // the one-shot track ended during the second block
        assert!(!mixer.tracks()[0].is_active());
        assert_eq!(timeline.position(), 1920);

        mixer.next_block_with(&mut timeline, &mut [&mut metronome_like], &mut out);
        assert_eq!(metronome_like.resets, 1);
        assert_eq!(timeline.position(), 960);
        assert!(mixer.tracks()[0].is_active());
        // mean of the restarted track and the silent extra source
        assert!(out.iter().all(|&v| v == to_i16(0.25)));
    }

    #[test]
    fn prune_keeps_leading_tracks_and_restarts_them() {
        let mut mixer = Mixer::new(1);
        for _ in 0..3 {
            mixer.add_track(Track::new(Constant(0.1)));
        }
        mixer.add_track(Track::new(Constant(0.1)).inactive());
        let mut timeline = TimeLine::new(None);
        let mut out = vec![0i16; 32];
        mixer.next_block(&mut timeline, &mut out);

        mixer.prune_tracks(2);
        assert_eq!(mixer.len(), 2);
        assert!(mixer.tracks().iter().all(|t| t.cursor() == 0 && t.is_active()));
    }
}
