use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    error::{EngineError, Result},
    graph::{
        node::{all_ended, Releasable, Sample, SignalSource, Terminable},
        oscillator::{OscParam, Oscillator},
    },
};

/*
Modulated Oscillator
====================

Drives an oscillator's amplitude, frequency or phase from other signals,
sample by sample (tremolo, vibrato, FM, enveloped amplitude).

Each pull:
  1. draw one sample from every modulator
  2. for every binding: value = map(initial_value, modulator_sample)
  3. set the oscillator parameter to that value
  4. pull the oscillator

Values are always recomputed from the oscillator's INITIAL parameters, so
repeated modulation never accumulates.


Bindings
--------

Modulators are registered first and get a `ModulatorId`. A binding pairs one
oscillator parameter with one of those ids and a mapping function:

  let mut node = ModulatedOscillator::new(Oscillator::sine(440.0, sr));
  let env = node.add_modulator(EnvNode::adsr(sr, 0.01, 0.1, 0.7, 0.2));
  let lfo = node.add_modulator(Oscillator::sine(5.0, sr));
  node.bind(OscParam::Amplitude, env, mapping::scale)?;
  node.bind(OscParam::Frequency, lfo, mapping::vibrato(2.0))?;

Ids carry the node that minted them; binding an id from another node is
rejected.

One modulator may feed several parameters; every binding then sees the same
sample drawn for that pull. Each parameter has at most one binding; binding
it again replaces the previous mapping.


Mapping Functions
-----------------

  scale          initial × m                    (envelope → amplitude)
  offset(d)      initial + m × d                (phase or frequency offset)
  vibrato(p)     initial × (1 + m × p / 100)    (± p percent of the pitch)
*/

/// Handle to a modulator registered on a [`ModulatedOscillator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModulatorId {
    owner: u64,
    index: usize,
}

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

pub type ModMap = Box<dyn Fn(f32, f32) -> f32 + Send>;

struct Binding {
    param: OscParam,
    modulator: ModulatorId,
    map: ModMap,
}

pub struct ModulatedOscillator {
    owner: u64,
    oscillator: Oscillator,
    modulators: Vec<Box<dyn SignalSource>>,
    values: Vec<f32>, // last sample drawn from each modulator
    bindings: Vec<Binding>,
}

impl ModulatedOscillator {
    pub fn new(oscillator: Oscillator) -> Self {
        Self {
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            oscillator,
            modulators: Vec::new(),
            values: Vec::new(),
            bindings: Vec::new(),
        }
    }

    pub fn add_modulator<M: SignalSource + 'static>(&mut self, modulator: M) -> ModulatorId {
        self.modulators.push(Box::new(modulator));
        self.values.push(0.0);
        ModulatorId {
            owner: self.owner,
            index: self.modulators.len() - 1,
        }
    }

    /// Route `modulator` into `param` through `map`.
    pub fn bind<F>(&mut self, param: OscParam, modulator: ModulatorId, map: F) -> Result<()>
    where
        F: Fn(f32, f32) -> f32 + Send + 'static,
    {
        if modulator.owner != self.owner || modulator.index >= self.modulators.len() {
            return Err(EngineError::InvalidConfig(format!(
                "modulator {} is not registered on this oscillator",
                modulator.index
            )));
        }
        self.bindings.retain(|b| b.param != param);
        self.bindings.push(Binding {
            param,
            modulator,
            map: Box::new(map),
        });
        Ok(())
    }

    /// Register `modulator` and bind it to `param` in one step.
    pub fn modulate<M, F>(mut self, param: OscParam, modulator: M, map: F) -> Self
    where
        M: SignalSource + 'static,
        F: Fn(f32, f32) -> f32 + Send + 'static,
    {
        let id = self.add_modulator(modulator);
        self.bindings.retain(|b| b.param != param);
        self.bindings.push(Binding {
            param,
            modulator: id,
            map: Box::new(map),
        });
        self
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }
}

impl SignalSource for ModulatedOscillator {
    fn next_sample(&mut self) -> Sample {
        for (value, modulator) in self.values.iter_mut().zip(self.modulators.iter_mut()) {
            *value = modulator.next_sample().mono();
        }

        for binding in &self.bindings {
            let initial = self.oscillator.initial(binding.param);
            let m = self.values[binding.modulator.index];
            self.oscillator.set(binding.param, (binding.map)(initial, m));
        }

        self.oscillator.next_sample()
    }

    fn as_releasable(&mut self) -> Option<&mut dyn Releasable> {
        if self.modulators.iter_mut().any(|m| m.as_releasable().is_some()) {
            Some(self)
        } else {
            None
        }
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        if self.modulators.iter().any(|m| m.as_terminable().is_some()) {
            Some(self)
        } else {
            None
        }
    }
}

impl Releasable for ModulatedOscillator {
    fn trigger_release(&mut self) {
        for modulator in self.modulators.iter_mut() {
            if let Some(modulator) = modulator.as_releasable() {
                modulator.trigger_release();
            }
        }
    }
}

impl Terminable for ModulatedOscillator {
    fn ended(&self) -> bool {
        all_ended(self.modulators.iter().map(|m| m.as_terminable())).unwrap_or(false)
    }
}

/// Stock mapping functions for [`ModulatedOscillator::bind`].
pub mod mapping {
    pub fn scale(initial: f32, m: f32) -> f32 {
        initial * m
    }

    pub fn offset(depth: f32) -> impl Fn(f32, f32) -> f32 + Send + 'static {
        move |initial, m| initial + m * depth
    }

    pub fn vibrato(percent: f32) -> impl Fn(f32, f32) -> f32 + Send + 'static {
        move |initial, m| initial * (1.0 + m * percent / 100.0)
    }
}
