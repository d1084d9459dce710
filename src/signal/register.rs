//! Deferred-assignment 1-bit storage.

use std::sync::{
    Arc,
    Mutex,
};

use crate::{
    error::{
        SimError,
        SimResult,
    },
    logic_state::LogicState,
};

/// Named 1-bit storage with a deferred-update slot.
///
/// A procedural write lands in `next` and is only observable through
/// `current` after the owning module's register-update barrier commits it.
/// This is what gives non-blocking assignments their "reads see the old
/// value this round" semantics.
#[derive(Debug, Clone)]
pub struct Register {
    name: String,
    current: LogicState,
    next: LogicState,
    last: LogicState,
    modified: bool,
}

impl Register {
    /// A register named `name`, starting `Undefined` on every slot.
    pub fn new(name: impl Into<String>) -> Self {
        Register {
            name: name.into(),
            current: LogicState::Undefined,
            next: LogicState::Undefined,
            last: LogicState::Undefined,
            modified: false,
        }
    }

    /// The register's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value as of the last commit.
    pub const fn current(&self) -> LogicState {
        self.current
    }

    /// The value as of the commit before that.
    pub const fn last(&self) -> LogicState {
        self.last
    }

    /// Schedule `state` to become `current` at the next commit.
    ///
    /// Fails with [`SimError::MultipleAssignment`] if this register has
    /// already been written since the last commit.
    pub fn set_value(&mut self, state: LogicState) -> SimResult<()> {
        if self.modified {
            return Err(SimError::MultipleAssignment {
                name: self.name.clone(),
            });
        }
        self.next = state;
        self.modified = true;
        Ok(())
    }

    /// Commit a pending write at the register-update barrier.
    ///
    /// A no-op if nothing was written since the previous commit; `last`
    /// only advances when a write actually happened.
    pub fn commit(&mut self) {
        if self.modified {
            self.last = self.current;
            self.current = self.next;
            self.modified = false;
        }
    }
}

/// A cheaply cloneable, thread-shareable handle to a [`Register`].
///
/// Procedural bodies run on their own worker thread (see
/// [`crate::scheduler`]) and reach a module's registers through handles
/// cloned out of the owning [`crate::module::Module`].
#[derive(Debug, Clone)]
pub struct RegisterHandle(Arc<Mutex<Register>>);

impl RegisterHandle {
    /// Wrap a fresh [`Register`] named `name` in a shareable handle.
    pub fn new(name: impl Into<String>) -> Self {
        RegisterHandle(Arc::new(Mutex::new(Register::new(name))))
    }

    /// The register's name.
    pub fn name(&self) -> String {
        self.0.lock().expect("register mutex poisoned").name().to_string()
    }

    /// The value as of the last commit.
    pub fn current(&self) -> LogicState {
        self.0.lock().expect("register mutex poisoned").current()
    }

    /// The value as of the commit before that.
    pub fn last(&self) -> LogicState {
        self.0.lock().expect("register mutex poisoned").last()
    }

    /// Schedule a write for the next commit; see [`Register::set_value`].
    pub fn set_value(&self, state: LogicState) -> SimResult<()> {
        self.0.lock().expect("register mutex poisoned").set_value(state)
    }

    /// Commit a pending write; see [`Register::commit`].
    pub fn commit(&self) {
        self.0.lock().expect("register mutex poisoned").commit();
    }
}
