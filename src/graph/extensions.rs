use crate::graph::{
    chain::Chain,
    node::{Modifier, SignalSource},
};

pub trait NodeExt: SignalSource + Sized + 'static {
    /// Start a [`Chain`] with `self` as the primary generator.
    fn chain<M: Modifier + 'static>(self, modifier: M) -> Chain {
        Chain::new(self).with(modifier)
    }

    fn boxed(self) -> Box<dyn SignalSource> {
        Box::new(self)
    }
}

impl<T: SignalSource + 'static> NodeExt for T {}
