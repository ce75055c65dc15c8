use crate::graph::node::{Sample, SignalSource};

/// One sounding note: the generator built for it and whether its release has
/// been triggered.
pub struct Voice {
    note: u8,
    generator: Box<dyn SignalSource>,
    released: bool,
}

impl Voice {
    pub fn new(note: u8, generator: Box<dyn SignalSource>) -> Self {
        Self {
            note,
            generator,
            released: false,
        }
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn is_releasable(&mut self) -> bool {
        self.generator.as_releasable().is_some()
    }

    /// Trigger the generator's release. Returns `false` when the generator
    /// cannot be released; the caller then drops the voice.
    pub fn release(&mut self) -> bool {
        if self.released {
            return true;
        }
        match self.generator.as_releasable() {
            Some(generator) => {
                generator.trigger_release();
                self.released = true;
                true
            }
            None => false,
        }
    }

    /// Released and silent. A generator without a lifetime is done as soon as
    /// it has been released.
    pub fn is_finished(&self) -> bool {
        self.released
            && self
                .generator
                .as_terminable()
                .map_or(true, |generator| generator.ended())
    }

    pub fn render(&mut self, out: &mut [Sample]) {
        self.generator.render_block(out);
    }
}
