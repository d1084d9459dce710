//! The single-bit four-valued logic algebra.

use strum::EnumIter;

/// A single bit of Verilog-style four-valued logic.
///
/// Exactly one variant holds at any time; there is no combined or partial
/// state below this granularity. [`Value`](crate::value::Value) builds
/// multi-width vectors out of three planes of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogicState {
    /// Driven low (`0`).
    Lo,
    /// Driven high (`1`).
    Hi,
    /// High impedance / not driven (`z`).
    HiZ,
    /// Unknown / conflicting (`x`).
    Undefined,
}

impl LogicState {
    /// Invert a driven value; `HiZ` and `Undefined` pass through unchanged.
    pub const fn invert(self) -> Self {
        match self {
            Self::Lo => Self::Hi,
            Self::Hi => Self::Lo,
            other => other,
        }
    }

    /// Resolve two drivers of the same net (wire-OR).
    ///
    /// `Undefined` is absorbing, `HiZ` is the identity when paired with a
    /// driven value, and two conflicting driven values resolve to
    /// `Undefined`. The operation is commutative and associative, so it
    /// left-folds cleanly over any number of drivers.
    pub const fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Lo, Self::Lo) => Self::Lo,
            (Self::Hi, Self::Hi) => Self::Hi,
            (Self::HiZ, Self::HiZ) => Self::HiZ,
            (Self::Undefined, Self::Undefined) => Self::Undefined,
            (Self::Undefined, _) | (_, Self::Undefined) => Self::Undefined,
            (Self::HiZ, other) => other,
            (this, Self::HiZ) => this,
            _ => Self::Undefined,
        }
    }

    /// Render as the conventional single-character digit.
    pub const fn as_char(self) -> char {
        match self {
            Self::Lo => '0',
            Self::Hi => '1',
            Self::HiZ => 'z',
            Self::Undefined => 'x',
        }
    }

    /// True for [`LogicState::Hi`].
    pub const fn is_hi(self) -> bool {
        matches!(self, Self::Hi)
    }

    /// True for [`LogicState::Lo`].
    pub const fn is_lo(self) -> bool {
        matches!(self, Self::Lo)
    }
}

impl core::fmt::Display for LogicState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_char(self.as_char())
    }
}

use core::fmt::Write as _;

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn invert_involution_on_driven_values() {
        assert_eq!(LogicState::Lo.invert(), LogicState::Hi);
        assert_eq!(LogicState::Hi.invert(), LogicState::Lo);
        assert_eq!(LogicState::Lo.invert().invert(), LogicState::Lo);
    }

    #[test]
    fn invert_idempotent_on_hiz_and_undefined() {
        assert_eq!(LogicState::HiZ.invert(), LogicState::HiZ);
        assert_eq!(LogicState::Undefined.invert(), LogicState::Undefined);
    }

    #[test]
    fn combine_identity_is_hiz() {
        for s in LogicState::iter() {
            assert_eq!(s.combine(LogicState::HiZ), s);
            assert_eq!(LogicState::HiZ.combine(s), s);
        }
    }

    #[test]
    fn combine_absorbs_undefined() {
        for s in LogicState::iter() {
            assert_eq!(s.combine(LogicState::Undefined), LogicState::Undefined);
        }
    }

    #[test]
    fn combine_commutative_and_associative() {
        let states: Vec<_> = LogicState::iter().collect();
        for &a in &states {
            for &b in &states {
                assert_eq!(a.combine(b), b.combine(a));
                for &c in &states {
                    assert_eq!(
                        a.combine(b).combine(c),
                        a.combine(b.combine(c))
                    );
                }
            }
        }
    }

    #[test]
    fn combine_conflicting_driven_values_is_undefined() {
        assert_eq!(LogicState::Lo.combine(LogicState::Hi), LogicState::Undefined);
        assert_eq!(LogicState::Hi.combine(LogicState::Lo), LogicState::Undefined);
    }

    #[test]
    fn char_rendering() {
        assert_eq!(LogicState::Lo.as_char(), '0');
        assert_eq!(LogicState::Hi.as_char(), '1');
        assert_eq!(LogicState::HiZ.as_char(), 'z');
        assert_eq!(LogicState::Undefined.as_char(), 'x');
    }
}
