use std::ops::Add;

/// One pulled value: a mono scalar or a left/right pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Mono(f32),
    Stereo(f32, f32),
}

impl Sample {
    pub const SILENCE: Sample = Sample::Mono(0.0);

    pub fn silence(stereo: bool) -> Self {
        if stereo {
            Sample::Stereo(0.0, 0.0)
        } else {
            Sample::Mono(0.0)
        }
    }

    /// Collapse to a scalar; a pair is averaged.
    #[inline]
    pub fn mono(self) -> f32 {
        match self {
            Sample::Mono(v) => v,
            Sample::Stereo(l, r) => (l + r) * 0.5,
        }
    }

    /// Broadcast a scalar to both channels.
    #[inline]
    pub fn stereo(self) -> (f32, f32) {
        match self {
            Sample::Mono(v) => (v, v),
            Sample::Stereo(l, r) => (l, r),
        }
    }

    #[inline]
    pub fn scale(self, gain: f32) -> Self {
        match self {
            Sample::Mono(v) => Sample::Mono(v * gain),
            Sample::Stereo(l, r) => Sample::Stereo(l * gain, r * gain),
        }
    }

    pub fn is_stereo(self) -> bool {
        matches!(self, Sample::Stereo(..))
    }
}

impl Default for Sample {
    fn default() -> Self {
        Sample::SILENCE
    }
}

/// Mono + mono stays mono; anything involving a pair is a pair.
impl Add for Sample {
    type Output = Sample;

    fn add(self, rhs: Sample) -> Sample {
        match (self, rhs) {
            (Sample::Mono(a), Sample::Mono(b)) => Sample::Mono(a + b),
            (a, b) => {
                let (al, ar) = a.stereo();
                let (bl, br) = b.stereo();
                Sample::Stereo(al + bl, ar + br)
            }
        }
    }
}

/// Nodes that can be told to start their release phase.
pub trait Releasable {
    fn trigger_release(&mut self);
}

/// Nodes with a finite lifetime.
pub trait Terminable {
    fn ended(&self) -> bool;
}

/// Core contract for every generator in the graph.
///
/// Exactly one sample per pull; state only moves forward. The two `as_*`
/// methods are how composite nodes discover the optional capabilities of
/// their members.
pub trait SignalSource: Send {
    fn next_sample(&mut self) -> Sample;

    /// Fill `out` with consecutive pulls.
    fn render_block(&mut self, out: &mut [Sample]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    fn as_releasable(&mut self) -> Option<&mut dyn Releasable> {
        None
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        None
    }
}

/// Per-sample transform applied by a [`Chain`](crate::graph::chain::Chain).
///
/// `tick` advances any internal modulator once per pull, `apply` reshapes the
/// carrier sample.
pub trait Modifier: Send {
    fn tick(&mut self) {}

    fn apply(&self, input: Sample) -> Sample;

    fn as_releasable(&mut self) -> Option<&mut dyn Releasable> {
        None
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        None
    }
}

/// Allow boxed sources to be used as sources (for dynamic dispatch)
impl SignalSource for Box<dyn SignalSource> {
    fn next_sample(&mut self) -> Sample {
        (**self).next_sample()
    }

    fn render_block(&mut self, out: &mut [Sample]) {
        (**self).render_block(out)
    }

    fn as_releasable(&mut self) -> Option<&mut dyn Releasable> {
        (**self).as_releasable()
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        (**self).as_terminable()
    }
}

impl Modifier for Box<dyn Modifier> {
    fn tick(&mut self) {
        (**self).tick()
    }

    fn apply(&self, input: Sample) -> Sample {
        (**self).apply(input)
    }

    fn as_releasable(&mut self) -> Option<&mut dyn Releasable> {
        (**self).as_releasable()
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        (**self).as_terminable()
    }
}

/// Conjunction of `ended` over the members that expose it.
///
/// Returns `None` when no member is terminable, so the caller can hide the
/// capability altogether.
pub(crate) fn all_ended<'a>(
    members: impl IntoIterator<Item = Option<&'a dyn Terminable>>,
) -> Option<bool> {
    let mut any = false;
    let mut ended = true;
    for member in members.into_iter().flatten() {
        any = true;
        ended &= member.ended();
    }
    any.then_some(ended)
}
