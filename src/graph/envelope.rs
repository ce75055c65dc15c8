use crate::{
    dsp::envelope::{Envelope, EnvelopeState},
    graph::node::{Releasable, Sample, SignalSource, Terminable},
};

/// ADSR envelope as a graph node.
///
/// Emits its level as a mono control signal in `[0, 1]`. Usually fed to a
/// [`ModulatedVolume`](crate::graph::volume::ModulatedVolume) or used as an
/// amplitude modulator.
pub struct EnvNode {
    env: Envelope,
}

impl EnvNode {
    pub fn adsr(sample_rate: f32, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            env: Envelope::adsr(sample_rate, attack, decay, sustain, release),
        }
    }

    /// Envelope with the default release time.
    pub fn ads(sample_rate: f32, attack: f32, decay: f32, sustain: f32) -> Self {
        Self {
            env: Envelope::ads(sample_rate, attack, decay, sustain),
        }
    }

    pub fn state(&self) -> EnvelopeState {
        self.env.state()
    }

    pub fn level(&self) -> f32 {
        self.env.level()
    }

    pub fn reset(&mut self) {
        self.env.reset();
    }
}

impl SignalSource for EnvNode {
    #[inline]
    fn next_sample(&mut self) -> Sample {
        Sample::Mono(self.env.next_sample())
    }

    fn as_releasable(&mut self) -> Option<&mut dyn Releasable> {
        Some(self)
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        Some(self)
    }
}

impl Releasable for EnvNode {
    fn trigger_release(&mut self) {
        self.env.trigger_release();
    }
}

impl Terminable for EnvNode {
    fn ended(&self) -> bool {
        self.env.ended()
    }
}
