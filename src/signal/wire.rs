//! Nets resolved from drivers via wire-OR.

use std::sync::{
    Arc,
    Mutex,
};

use super::SignalHandle;
use crate::logic_state::LogicState;

/// Named net holding a resolved value and lists of drivers/receivers.
///
/// `current` is recomputed at every wire-propagation barrier by reducing
/// all drivers through [`LogicState::combine`] (whose identity is `HiZ`,
/// not `Undefined` — `Undefined` is absorbing), falling back to
/// `Undefined` only when there are no drivers at all, then pushed to
/// every receiver. Receivers are always other wires; registers are never
/// legal receivers.
#[derive(Clone)]
pub struct Wire {
    name: String,
    current: LogicState,
    last: LogicState,
    drivers: Vec<SignalHandle>,
    receivers: Vec<WireHandle>,
}

impl Wire {
    /// A wire named `name`, starting `HiZ` (the `combine` identity) with no
    /// drivers or receivers, so an initial `accept_push` lands the pushed
    /// value rather than being absorbed by a vacuous `Undefined`.
    pub fn new(name: impl Into<String>) -> Self {
        Wire {
            name: name.into(),
            current: LogicState::HiZ,
            last: LogicState::HiZ,
            drivers: Vec::new(),
            receivers: Vec::new(),
        }
    }

    /// The wire's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value as of the last propagation.
    pub const fn current(&self) -> LogicState {
        self.current
    }

    /// The value as of the propagation before that.
    pub const fn last(&self) -> LogicState {
        self.last
    }

    /// Add a driver feeding this net's resolution.
    pub fn add_driver(&mut self, driver: impl Into<SignalHandle>) {
        self.drivers.push(driver.into());
    }

    /// Add a downstream wire that receives this net's resolved value.
    pub fn add_receiver(&mut self, receiver: WireHandle) {
        self.receivers.push(receiver);
    }

    /// Fold all drivers' current values through `combine`, starting from
    /// the `HiZ` identity; `Undefined` with no drivers (spec §4.3's
    /// "identity = Undefined when there are no drivers" applies to the
    /// empty case only — `Undefined` itself is absorbing in `combine`, so
    /// folding a non-empty set from it would collapse every resolution to
    /// `Undefined` regardless of what the drivers hold).
    pub fn resolve(&self) -> LogicState {
        self.drivers
            .iter()
            .map(|d| d.current())
            .reduce(LogicState::combine)
            .unwrap_or(LogicState::Undefined)
    }

    /// Combine a value pushed from an upstream wire into `current`.
    ///
    /// Combined rather than overwritten: `combine` is commutative and
    /// associative, so a receiver's final value does not depend on
    /// whether its own drivers were resolved before or after the push
    /// arrives within the same propagation phase (worker ordering within
    /// a phase is unspecified).
    pub fn accept_push(&mut self, pushed: LogicState) {
        self.current = self.current.combine(pushed);
    }

    /// Recompute `current` from drivers, advance `last`, and push the
    /// result to every receiver. Call once per owned wire at the
    /// wire-propagation barrier.
    pub fn propagate(&mut self) -> LogicState {
        let resolved = self.resolve();
        self.last = self.current;
        self.current = resolved;
        resolved
    }
}

/// A cheaply cloneable, thread-shareable handle to a [`Wire`].
#[derive(Clone)]
pub struct WireHandle(Arc<Mutex<Wire>>);

impl WireHandle {
    /// Wrap a fresh [`Wire`] named `name` in a shareable handle.
    pub fn new(name: impl Into<String>) -> Self {
        WireHandle(Arc::new(Mutex::new(Wire::new(name))))
    }

    /// The wire's name.
    pub fn name(&self) -> String {
        self.0.lock().expect("wire mutex poisoned").name().to_string()
    }

    /// The value as of the last propagation.
    pub fn current(&self) -> LogicState {
        self.0.lock().expect("wire mutex poisoned").current()
    }

    /// The value as of the propagation before that.
    pub fn last(&self) -> LogicState {
        self.0.lock().expect("wire mutex poisoned").last()
    }

    /// Add a driver feeding this net's resolution.
    pub fn add_driver(&self, driver: impl Into<SignalHandle>) {
        self.0.lock().expect("wire mutex poisoned").add_driver(driver);
    }

    /// Add a downstream wire that receives this net's resolved value.
    pub fn add_receiver(&self, receiver: WireHandle) {
        self.0.lock().expect("wire mutex poisoned").add_receiver(receiver);
    }

    /// Recompute and publish `current`, pushing the result to every
    /// receiver; see [`Wire::propagate`].
    pub fn propagate(&self) {
        let resolved = {
            let mut wire = self.0.lock().expect("wire mutex poisoned");
            wire.propagate()
        };
        let receivers = self.0.lock().expect("wire mutex poisoned").receivers.clone();
        for receiver in receivers {
            receiver.accept_push(resolved);
        }
    }

    /// Combine a pushed value into `current`; see [`Wire::accept_push`].
    pub fn accept_push(&self, pushed: LogicState) {
        self.0.lock().expect("wire mutex poisoned").accept_push(pushed);
    }
}

impl std::fmt::Debug for WireHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireHandle").field("name", &self.name()).finish()
    }
}
