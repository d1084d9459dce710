//! Event predicates gating when a procedural clause runs.

use crate::{
    logic_state::LogicState,
    signal::SignalHandle,
};

/// Edge/level qualifier applied to a watched signal's current/last bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensitivityQualifier {
    /// Active whenever `current == Hi` (same as [`PosLevel`](Self::PosLevel)).
    None,
    /// Active when `current == Hi`.
    PosLevel,
    /// Active when `current == Lo`.
    NegLevel,
    /// Active on a `Lo -> Hi` transition.
    PosEdge,
    /// Active on a `Hi -> Lo` transition.
    NegEdge,
}

/// One watched signal paired with the qualifier that governs it.
#[derive(Clone)]
pub struct Sensitivity {
    signal: SignalHandle,
    qualifier: SensitivityQualifier,
}

impl Sensitivity {
    /// Watch `signal` under `qualifier`.
    pub fn new(signal: impl Into<SignalHandle>, qualifier: SensitivityQualifier) -> Self {
        Sensitivity {
            signal: signal.into(),
            qualifier,
        }
    }

    /// Evaluate this entry's predicate against the signal's current/last
    /// state.
    pub fn is_active(&self) -> bool {
        let current = self.signal.current();
        let last = self.signal.last();
        match self.qualifier {
            SensitivityQualifier::None | SensitivityQualifier::PosLevel => current == LogicState::Hi,
            SensitivityQualifier::NegLevel => current == LogicState::Lo,
            SensitivityQualifier::PosEdge => current == LogicState::Hi && last == LogicState::Lo,
            SensitivityQualifier::NegEdge => current == LogicState::Lo && last == LogicState::Hi,
        }
    }
}

/// An ordered, logically OR'ed list of [`Sensitivity`] entries paired with
/// the procedural body they gate.
///
/// An empty entry list means "active every round"; the body itself is
/// supplied by the owning [`crate::module::Module`] and invoked by the
/// scheduler's sensitivity worker, not stored here.
#[derive(Clone)]
pub struct SensitivityClause {
    entries: Vec<Sensitivity>,
}

impl SensitivityClause {
    /// A clause active on any of `entries`; empty means unconditionally
    /// active.
    pub fn new(entries: Vec<Sensitivity>) -> Self {
        SensitivityClause { entries }
    }

    /// An always-active clause (`@(*)` / an empty sensitivity list).
    pub fn always() -> Self {
        SensitivityClause { entries: Vec::new() }
    }

    /// True if the entry list is empty, or any entry's predicate holds.
    pub fn is_active(&self) -> bool {
        self.entries.is_empty() || self.entries.iter().any(Sensitivity::is_active)
    }
}
