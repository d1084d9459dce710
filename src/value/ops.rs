//! Unary, reduction, and binary operators over [`super::Value`].

use super::{
    bit_at,
    repr::limbs_for,
    Value,
};
use crate::logic_state::LogicState;

/// 256-entry byte parity lookup table, used by the `^`/`~^` reduction
/// operators instead of a bit-at-a-time loop.
const PARITY_TABLE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = (i as u8).count_ones() as u8 % 2;
        i += 1;
    }
    table
};

impl Value {
    /// Bitwise invert over the full width. Bits that were hiz or undef
    /// become `Undefined` in the result.
    pub fn not(&self) -> Value {
        let (bits, hiz, undef) = self.planes();
        let mut out_bits = Vec::with_capacity(bits.len());
        let mut out_undef = Vec::with_capacity(bits.len());
        for i in 0..bits.len() {
            let unknown = hiz[i] | undef[i];
            out_bits.push(!bits[i] & !unknown);
            out_undef.push(unknown);
        }
        Value::from_planes(self.width, out_bits, vec![0; bits.len()], out_undef)
    }

    /// OR-reduction: `Hi` if any value bit is driven `1`; `Undefined` if any
    /// hiz/undef bit is set and no value bit is `1`; `Lo` otherwise.
    pub fn reduce_or(&self) -> Value {
        self.reduce_or_or_nor(false)
    }

    /// NOR-reduction: the inverse of [`Value::reduce_or`].
    pub fn reduce_nor(&self) -> Value {
        self.reduce_or_or_nor(true)
    }

    fn reduce_or_or_nor(&self, invert: bool) -> Value {
        let (bits, hiz, undef) = self.planes();
        let any_one = bits.iter().any(|&w| w != 0);
        let any_unknown = hiz.iter().any(|&w| w != 0) || undef.iter().any(|&w| w != 0);
        let mut result = if any_one {
            LogicState::Hi
        } else if any_unknown {
            LogicState::Undefined
        } else {
            LogicState::Lo
        };
        if invert {
            result = result.invert();
        }
        Value::single(result)
    }

    /// AND-reduction: `Undefined` if any hiz/undef bit is set; `Hi` iff
    /// every value bit is `1`; `Lo` otherwise.
    pub fn reduce_and(&self) -> Value {
        self.reduce_and_or_nand(false)
    }

    /// NAND-reduction: the inverse of [`Value::reduce_and`].
    pub fn reduce_nand(&self) -> Value {
        self.reduce_and_or_nand(true)
    }

    fn reduce_and_or_nand(&self, invert: bool) -> Value {
        let (bits, hiz, undef) = self.planes();
        let any_unknown = hiz.iter().any(|&w| w != 0) || undef.iter().any(|&w| w != 0);
        let mut result = if any_unknown {
            LogicState::Undefined
        } else if all_bits_set(&bits, self.width) {
            LogicState::Hi
        } else {
            LogicState::Lo
        };
        if invert {
            result = result.invert();
        }
        Value::single(result)
    }

    /// XOR-reduction (parity): `Undefined` if any hiz/undef bit is set;
    /// otherwise the XOR of every value bit, via a byte-parity table.
    pub fn reduce_xor(&self) -> Value {
        self.reduce_xor_or_xnor(false)
    }

    /// XNOR-reduction: the inverse of [`Value::reduce_xor`].
    pub fn reduce_xnor(&self) -> Value {
        self.reduce_xor_or_xnor(true)
    }

    fn reduce_xor_or_xnor(&self, invert: bool) -> Value {
        let (bits, hiz, undef) = self.planes();
        let any_unknown = hiz.iter().any(|&w| w != 0) || undef.iter().any(|&w| w != 0);
        let mut result = if any_unknown {
            LogicState::Undefined
        } else {
            let mut parity = 0u8;
            for &limb in &bits {
                for byte in limb.to_le_bytes() {
                    parity ^= PARITY_TABLE[byte as usize];
                }
            }
            if parity == 1 {
                LogicState::Hi
            } else {
                LogicState::Lo
            }
        };
        if invert {
            result = result.invert();
        }
        Value::single(result)
    }

    /// Logical equality (`==`): `Undefined` if either operand has any
    /// hiz/undef bit; otherwise compares driven values across the wider
    /// operand's width, zero-extending the narrower one.
    pub fn logical_eq(&self, other: &Value) -> Value {
        if self.has_hiz() || self.has_undef() || other.has_hiz() || other.has_undef() {
            return Value::single(LogicState::Undefined);
        }
        Value::single(if values_equal(self, other) {
            LogicState::Hi
        } else {
            LogicState::Lo
        })
    }

    /// Logical inequality (`!=`): inverts [`Value::logical_eq`].
    pub fn logical_ne(&self, other: &Value) -> Value {
        Value::single(self.logical_eq(other).single_state().invert())
    }

    /// Case equality (`===`): strict bit-for-bit equality of all three
    /// planes, zero-extending the narrower operand. Always `Hi` or `Lo`.
    pub fn case_eq(&self, other: &Value) -> Value {
        let width = self.width.max(other.width);
        let (a_bits, a_hiz, a_undef) = self.planes_at(width);
        let (b_bits, b_hiz, b_undef) = other.planes_at(width);
        let eq = a_bits == b_bits && a_hiz == b_hiz && a_undef == b_undef;
        Value::single(if eq { LogicState::Hi } else { LogicState::Lo })
    }

    /// Case inequality (`!==`): inverts [`Value::case_eq`].
    pub fn case_ne(&self, other: &Value) -> Value {
        Value::single(self.case_eq(other).single_state().invert())
    }

    /// Relational comparisons (`<`, `<=`, `>`, `>=`): `Undefined` if either
    /// operand has hiz/undef bits; otherwise an unsigned compare across the
    /// wider operand's width.
    pub fn relational(&self, other: &Value, op: RelOp) -> Value {
        if self.has_hiz() || self.has_undef() || other.has_hiz() || other.has_undef() {
            return Value::single(LogicState::Undefined);
        }
        let width = self.width.max(other.width);
        let (a_bits, ..) = self.planes_at(width);
        let (b_bits, ..) = other.planes_at(width);
        let ordering = compare_limbs(&a_bits, &b_bits);
        let result = match op {
            RelOp::Lt => ordering.is_lt(),
            RelOp::Le => ordering.is_le(),
            RelOp::Gt => ordering.is_gt(),
            RelOp::Ge => ordering.is_ge(),
        };
        Value::single(if result { LogicState::Hi } else { LogicState::Lo })
    }

    /// Logical AND (`&&`): three-valued logic over each operand's
    /// OR-reduction.
    pub fn logical_and(&self, other: &Value) -> Value {
        let a = self.reduce_or().single_state();
        let b = other.reduce_or().single_state();
        let result = match (a, b) {
            (LogicState::Lo, _) | (_, LogicState::Lo) => LogicState::Lo,
            (LogicState::Hi, LogicState::Hi) => LogicState::Hi,
            _ => LogicState::Undefined,
        };
        Value::single(result)
    }

    /// Logical OR (`||`): three-valued logic over each operand's
    /// OR-reduction.
    pub fn logical_or(&self, other: &Value) -> Value {
        let a = self.reduce_or().single_state();
        let b = other.reduce_or().single_state();
        let result = match (a, b) {
            (LogicState::Hi, _) | (_, LogicState::Hi) => LogicState::Hi,
            (LogicState::Lo, LogicState::Lo) => LogicState::Lo,
            _ => LogicState::Undefined,
        };
        Value::single(result)
    }

    /// Bitwise AND, result width is the max of the two operand widths with
    /// the narrower zero-extended. `0` on either side forces `0`; otherwise
    /// a hiz/undef bit on either side yields `Undefined`.
    pub fn bitand(&self, other: &Value) -> Value {
        self.bitwise(other, |known_a, is1_a, known_b, is1_b| {
            let is0_a = known_a & !is1_a;
            let is0_b = known_b & !is1_b;
            let res1 = is1_a & is1_b;
            let res0 = is0_a | is0_b;
            (res1, res0)
        })
    }

    /// Bitwise OR, result width is the max of the two operand widths with
    /// the narrower zero-extended. `1` on either side forces `1`; otherwise
    /// a hiz/undef bit on either side yields `Undefined`.
    pub fn bitor(&self, other: &Value) -> Value {
        self.bitwise(other, |known_a, is1_a, known_b, is1_b| {
            let is0_a = known_a & !is1_a;
            let is0_b = known_b & !is1_b;
            let res1 = is1_a | is1_b;
            let res0 = is0_a & is0_b;
            (res1, res0)
        })
    }

    /// Bitwise XOR: any hiz/undef bit on either operand yields `Undefined`
    /// at that position; otherwise the standard XOR.
    pub fn bitxor(&self, other: &Value) -> Value {
        self.bitwise(other, |known_a, is1_a, known_b, is1_b| {
            let known = known_a & known_b;
            let res1 = known & (is1_a ^ is1_b);
            let res0 = known & !(is1_a ^ is1_b);
            (res1, res0)
        })
    }

    /// Bitwise XNOR (`~^`/`^~`): inverts [`Value::bitxor`].
    pub fn bitxnor(&self, other: &Value) -> Value {
        self.bitxor(other).not_preserving_unknowns()
    }

    fn not_preserving_unknowns(&self) -> Value {
        // Invert only the driven bits; undef bits (there's no hiz in a
        // bitwise-op result) stay undef.
        let (bits, _, undef) = self.planes();
        let mut out_bits = Vec::with_capacity(bits.len());
        for i in 0..bits.len() {
            out_bits.push(!bits[i] & !undef[i]);
        }
        Value::from_planes(self.width, out_bits, vec![0; bits.len()], undef)
    }

    fn bitwise(&self, other: &Value, combine: impl Fn(u64, u64, u64, u64) -> (u64, u64)) -> Value {
        let width = self.width.max(other.width);
        let (a_bits, a_hiz, a_undef) = self.planes_at(width);
        let (b_bits, b_hiz, b_undef) = other.planes_at(width);
        let n = limbs_for(width);
        let mut out_bits = vec![0u64; n];
        let mut out_undef = vec![0u64; n];
        for i in 0..n {
            let known_a = !(a_hiz[i] | a_undef[i]);
            let known_b = !(b_hiz[i] | b_undef[i]);
            let (res1, res0) = combine(known_a, a_bits[i], known_b, b_bits[i]);
            let unknown = !(res0 | res1);
            out_bits[i] = res1;
            out_undef[i] = unknown;
        }
        Value::from_planes(width, out_bits, vec![0; n], out_undef)
    }

    /// The planes of this value, zero-extended to `width` (which must be
    /// `>= self.bit_len()`).
    pub(super) fn planes_at(&self, width: u32) -> (Vec<u64>, Vec<u64>, Vec<u64>) {
        let (mut bits, mut hiz, mut undef) = self.planes();
        let n = limbs_for(width);
        bits.resize(n, 0);
        hiz.resize(n, 0);
        undef.resize(n, 0);
        (bits, hiz, undef)
    }

    /// Wire-OR resolution, generalized bit-wise from
    /// [`LogicState::combine`].
    pub fn combine(&self, other: &Value) -> Value {
        let width = self.width.max(other.width);
        let (a_bits, a_hiz, a_undef) = self.planes_at(width);
        let (b_bits, b_hiz, b_undef) = other.planes_at(width);
        let n = limbs_for(width);
        let mut out_bits = vec![0u64; n];
        let mut out_hiz = vec![0u64; n];
        let mut out_undef = vec![0u64; n];
        for i in 0..width {
            let a = bit_at(&a_bits, &a_hiz, &a_undef, i);
            let b = bit_at(&b_bits, &b_hiz, &b_undef, i);
            super::write_bit(&mut out_bits, &mut out_hiz, &mut out_undef, i, a.combine(b));
        }
        Value::from_planes(width, out_bits, out_hiz, out_undef)
    }

    fn single(state: LogicState) -> Value {
        let mut v = Value::new(1);
        v.set_bit(0, state).expect("bit 0 always in range for a 1-bit value");
        v
    }

    fn single_state(&self) -> LogicState {
        self.get_bit(0).0
    }
}

/// Relational operator selector for [`Value::relational`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

fn all_bits_set(limbs: &[u64], width: u32) -> bool {
    let full_limbs = (width / 64) as usize;
    let rem = width % 64;
    for &limb in limbs.iter().take(full_limbs) {
        if limb != u64::MAX {
            return false;
        }
    }
    if rem > 0 {
        let mask = (1u64 << rem) - 1;
        if limbs.get(full_limbs).copied().unwrap_or(0) & mask != mask {
            return false;
        }
    }
    true
}

fn values_equal(a: &Value, b: &Value) -> bool {
    let width = a.width.max(b.width);
    let (a_bits, ..) = a.planes_at(width);
    let (b_bits, ..) = b.planes_at(width);
    a_bits == b_bits
}

fn compare_limbs(a: &[u64], b: &[u64]) -> core::cmp::Ordering {
    for i in (0..a.len()).rev() {
        match a[i].cmp(&b[i]) {
            core::cmp::Ordering::Equal => continue,
            other => return other,
        }
    }
    core::cmp::Ordering::Equal
}
