use std::iter;

use crate::graph::node::{all_ended, Modifier, Releasable, Sample, SignalSource, Terminable};

/*
Serial Modifier Chain
=====================

A Chain owns one primary generator and an ordered list of modifiers
(panners, volume scalers, ...). Each pull:

  1. pull one sample from the primary
  2. tick every modifier once (modulated modifiers pull their modulator)
  3. pass the sample through each modifier in registration order

  Primary:    Triangle 220 Hz  ──→ 0.42
  Modifier 1: ModulatedPanner  ──→ (0.63, 0.21)
  Modifier 2: ModulatedVolume  ──→ (0.50, 0.17)   (envelope at 0.8)

Capabilities are the union of the members':
  - the chain is Releasable if any member is; a release reaches every
    releasable member
  - the chain is Terminable if any member is; it has ended once every
    terminable member has ended. Members without the capability never hold
    the chain open.

Example usage:
  let voice = Oscillator::triangle(freq, sr).with_amplitude(amp)
      .chain(ModulatedPanner::new(Oscillator::sine(freq / 100.0, sr).with_phase(90.0)))
      .with(ModulatedVolume::new(EnvNode::adsr(sr, 0.01, 0.1, 0.75, 0.001)));
*/

pub struct Chain {
    primary: Box<dyn SignalSource>,
    modifiers: Vec<Box<dyn Modifier>>,
}

impl Chain {
    pub fn new<S: SignalSource + 'static>(primary: S) -> Self {
        Self {
            primary: Box::new(primary),
            modifiers: Vec::new(),
        }
    }

    /// Append a modifier; it runs after every modifier already registered.
    pub fn with<M: Modifier + 'static>(mut self, modifier: M) -> Self {
        self.modifiers.push(Box::new(modifier));
        self
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    fn any_releasable(&mut self) -> bool {
        self.primary.as_releasable().is_some()
            || self.modifiers.iter_mut().any(|m| m.as_releasable().is_some())
    }
}

impl SignalSource for Chain {
    fn next_sample(&mut self) -> Sample {
        let mut value = self.primary.next_sample();
        for modifier in self.modifiers.iter_mut() {
            modifier.tick();
        }
        for modifier in self.modifiers.iter() {
            value = modifier.apply(value);
        }
        value
    }

    fn as_releasable(&mut self) -> Option<&mut dyn Releasable> {
        if self.any_releasable() {
            Some(self)
        } else {
            None
        }
    }

    fn as_terminable(&self) -> Option<&dyn Terminable> {
        let any = self.primary.as_terminable().is_some()
            || self.modifiers.iter().any(|m| m.as_terminable().is_some());
        if any {
            Some(self)
        } else {
            None
        }
    }
}

impl Releasable for Chain {
    fn trigger_release(&mut self) {
        if let Some(primary) = self.primary.as_releasable() {
            primary.trigger_release();
        }
        for modifier in self.modifiers.iter_mut() {
            if let Some(modifier) = modifier.as_releasable() {
                modifier.trigger_release();
            }
        }
    }
}

impl Terminable for Chain {
    fn ended(&self) -> bool {
        let members = iter::once(self.primary.as_terminable())
            .chain(self.modifiers.iter().map(|m| m.as_terminable()));
        all_ended(members).unwrap_or(false)
    }
}
