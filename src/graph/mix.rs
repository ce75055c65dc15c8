use crate::graph::node::{all_ended, Releasable, Sample, SignalSource, Terminable};

/*
Parallel Signal Averaging
=========================

WaveAdder pulls one sample from every source and outputs their unweighted
mean, channel by channel:

  out = (s1 + s2 + ... + sN) / N

Averaging (instead of summing) keeps N full-scale sources inside [-1, 1]
without a separate gain stage.

Channel handling:
-----------------
  stereo output:  a scalar source is broadcast to (v, v)
  mono output:    a pair source is folded to (l + r) / 2

Use Cases:
----------
- Layering oscillators (a chord, an octave stack)
- Mixing a voice's partials before a shared modifier chain

Capabilities follow the members: release reaches every releasable source,
and the adder has ended once every terminable source has ended.

Example usage:
  let chord = WaveAdder::mono()
      .with(Oscillator::sine(261.6, sr))
      .with(Oscillator::sine(329.6, sr))
      .with(Oscillator::sine(392.0, sr));
*/

pub struct WaveAdder {
    sources: Vec<Box<dyn SignalSource>>,
    stereo: bool,
}

impl WaveAdder {
    pub fn new(sources: Vec<Box<dyn SignalSource>>, stereo: bool) -> Self {
        Self { sources, stereo }
    }

    pub fn mono() -> Self {
        Self::new(Vec::new(), false)
    }

    pub fn stereo() -> Self {
        Self::new(Vec::new(), true)
    }

    pub fn with<S: SignalSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl SignalSource for WaveAdder {
    fn next_sample(&mut self) -> Sample {
        if self.sources.is_empty() {
            return Sample::silence(self.stereo);
        }
        let count = self.sources.len() as f32;

        if self.stereo {
            let (mut left, mut right) = (0.0, 0.0);
            for source in self.sources.iter_mut() {
                let (l, r) = source.next_sample().stereo();
                left += l;
                right += r;
            }
            Sample::Stereo(left / count, right / count)
        } else {
            let sum: f32 = self
                .sources
                .iter_mut()
                .map(|source| source.next_sample().mono())
                .sum();
            Sample::Mono(sum / count)
        }
    }

    fn as_releasable(&mut self) -> Option<&mut dyn Releasable> {
        if self.sources.iter_mut().any(|s| s.as_releasable().is_some()) {
            Some(self)
        } else {
            None
        }
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        if self.sources.iter().any(|s| s.as_terminable().is_some()) {
            Some(self)
        } else {
            None
        }
    }
}

impl Releasable for WaveAdder {
    fn trigger_release(&mut self) {
        for source in self.sources.iter_mut() {
            if let Some(source) = source.as_releasable() {
                source.trigger_release();
            }
        }
    }
}

impl Terminable for WaveAdder {
    fn ended(&self) -> bool {
        all_ended(self.sources.iter().map(|s| s.as_terminable())).unwrap_or(false)
    }
}
