//! Registers and wires: the 1-bit storage and net primitives procedural
//! code reads and writes.

mod register;
mod wire;

#[cfg(test)]
mod resolution_tests;

pub use register::{
    Register,
    RegisterHandle,
};
pub use wire::{
    Wire,
    WireHandle,
};

use crate::logic_state::LogicState;

/// A driver reference usable by a [`Wire`]'s resolution fold or a
/// [`crate::sensitivity::Sensitivity`] predicate.
///
/// Kept as a small enum rather than a `dyn Trait` object: both variants are
/// already cheap, `Clone`-able handles (an `Arc<Mutex<_>>` underneath), and
/// the enum avoids an extra vtable indirection for the two cases that
/// actually exist.
#[derive(Debug, Clone)]
pub enum SignalHandle {
    /// A register driving this net.
    Register(RegisterHandle),
    /// Another wire driving this net (e.g. a pass-through port).
    Wire(WireHandle),
}

impl SignalHandle {
    /// The signal's value as of the last commit/propagate barrier.
    pub fn current(&self) -> LogicState {
        match self {
            SignalHandle::Register(r) => r.current(),
            SignalHandle::Wire(w) => w.current(),
        }
    }

    /// The signal's value as of the barrier before that.
    pub fn last(&self) -> LogicState {
        match self {
            SignalHandle::Register(r) => r.last(),
            SignalHandle::Wire(w) => w.last(),
        }
    }
}

impl From<RegisterHandle> for SignalHandle {
    fn from(r: RegisterHandle) -> Self {
        SignalHandle::Register(r)
    }
}

impl From<WireHandle> for SignalHandle {
    fn from(w: WireHandle) -> Self {
        SignalHandle::Wire(w)
    }
}
