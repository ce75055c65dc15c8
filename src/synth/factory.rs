use crate::graph::{
    chain::Chain,
    envelope::EnvNode,
    extensions::NodeExt,
    node::SignalSource,
    oscillator::Oscillator,
    pan::ModulatedPanner,
    volume::ModulatedVolume,
};

/// Factory for creating voices with a specific patch/sound design
///
/// This is the "instrument design" layer - you configure your sound once,
/// then the voice scheduler asks the factory for a fresh generator on every
/// note-on, passing the note frequency and the velocity-derived amplitude.
pub trait VoiceFactory: Send {
    fn create_voice(&self, frequency: f32, amplitude: f32) -> Box<dyn SignalSource>;
}

impl<F, T> VoiceFactory for F
where
    F: Fn(f32, f32) -> T + Send,
    T: SignalSource + 'static,
{
    fn create_voice(&self, frequency: f32, amplitude: f32) -> Box<dyn SignalSource> {
        Box::new(self(frequency, amplitude))
    }
}

/// Default patch: a triangle wave slowly auto-panned, shaped by a short ADSR.
///
/// The pan rate follows the pitch (`frequency / 100`), so higher notes sweep
/// faster.
pub fn triangle_pad(sample_rate: f32) -> impl VoiceFactory {
    move |frequency: f32, amplitude: f32| -> Chain {
        Oscillator::triangle(frequency, sample_rate)
            .with_amplitude(amplitude)
            .chain(ModulatedPanner::new(
                Oscillator::sine(frequency / 100.0, sample_rate).with_phase(90.0),
            ))
            .with(ModulatedVolume::new(EnvNode::adsr(
                sample_rate,
                0.01,
                0.1,
                0.75,
                0.001,
            )))
    }
}
