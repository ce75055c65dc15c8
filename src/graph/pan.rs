use crate::graph::node::{Modifier, Sample, SignalSource};

/*
Stereo Placement
================

  position r ∈ [0, 1]     0 = hard left, 0.5 = centre, 1 = hard right

  right gain = 2r
  left gain  = 2 - 2r

    r = 0.0  →  (2v, 0)
    r = 0.5  →  (v,  v)
    r = 1.0  →  (0, 2v)

This is a linear law: the centre keeps the input level on both sides and a
hard pan doubles the level on one side, so the sum of both channels is always
2v. A stereo input is folded to mono before it is placed.

ModulatedPanner maps a bipolar modulator sample m ∈ [-1, 1] onto the
position each pull: r = (m + 1) / 2. A slow sine gives an auto-pan.
*/

#[inline]
fn place(position: f32, input: Sample) -> Sample {
    let value = input.mono();
    let right = position * 2.0;
    let left = 2.0 - right;
    Sample::Stereo(left * value, right * value)
}

/// Fixed stereo position.
pub struct Panner {
    position: f32,
}

impl Panner {
    pub fn new(position: f32) -> Self {
        Self {
            position: position.clamp(0.0, 1.0),
        }
    }

    pub fn centre() -> Self {
        Self::new(0.5)
    }

    pub fn position(&self) -> f32 {
        self.position
    }
}

impl Modifier for Panner {
    fn apply(&self, input: Sample) -> Sample {
        place(self.position, input)
    }
}

/// Stereo position driven by a modulator.
pub struct ModulatedPanner {
    modulator: Box<dyn SignalSource>,
    position: f32,
}

impl ModulatedPanner {
    pub fn new<M: SignalSource + 'static>(modulator: M) -> Self {
        Self {
            modulator: Box::new(modulator),
            position: 0.0,
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }
}

impl Modifier for ModulatedPanner {
    fn tick(&mut self) {
        let m = self.modulator.next_sample().mono();
        self.position = ((m + 1.0) * 0.5).clamp(0.0, 1.0);
    }

    fn apply(&self, input: Sample) -> Sample {
        place(self.position, input)
    }
}
