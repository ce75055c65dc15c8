use crate::graph::node::{Modifier, Releasable, Sample, SignalSource, Terminable};

/// Constant gain. Scales a scalar, or each side of a pair.
pub struct VolumeScaler {
    amplitude: f32,
}

impl VolumeScaler {
    pub fn new(amplitude: f32) -> Self {
        Self { amplitude }
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }
}

impl Modifier for VolumeScaler {
    #[inline]
    fn apply(&self, input: Sample) -> Sample {
        input.scale(self.amplitude)
    }
}

/// Gain taken from a modulator sample each pull.
///
/// With an envelope as modulator this is the amplitude envelope of a voice:
/// releasing the volume releases the envelope, and the volume has ended once
/// the envelope has. A modulator without a finite lifetime never ends.
pub struct ModulatedVolume {
    modulator: Box<dyn SignalSource>,
    amplitude: f32,
}

impl ModulatedVolume {
    pub fn new<M: SignalSource + 'static>(modulator: M) -> Self {
        Self {
            modulator: Box::new(modulator),
            amplitude: 0.0,
        }
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }
}

impl Modifier for ModulatedVolume {
    fn tick(&mut self) {
        self.amplitude = self.modulator.next_sample().mono();
    }

    #[inline]
    fn apply(&self, input: Sample) -> Sample {
        input.scale(self.amplitude)
    }

    fn as_releasable(&mut self) -> Option<&mut dyn Releasable> {
        if self.modulator.as_releasable().is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        Some(self)
    }
}

impl Releasable for ModulatedVolume {
    fn trigger_release(&mut self) {
        if let Some(modulator) = self.modulator.as_releasable() {
            modulator.trigger_release();
        }
    }
}

impl Terminable for ModulatedVolume {
    fn ended(&self) -> bool {
        self.modulator
            .as_terminable()
            .is_some_and(|modulator| modulator.ended())
    }
}
