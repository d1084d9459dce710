//! Property-based tests for the algebraic identities in spec §8, run over
//! randomly generated [`Value`]s via `quickcheck`.

use quickcheck::{
    Arbitrary,
    Gen,
};
use quickcheck_macros::quickcheck;

use super::{
    literal::Radix,
    Value,
};
use crate::logic_state::LogicState;

/// A random value of width 1..=128, each bit independently Lo/Hi/HiZ/Undef.
#[derive(Debug, Clone)]
struct ArbValue(Value);

impl Arbitrary for ArbValue {
    fn arbitrary(g: &mut Gen) -> Self {
        let width = 1 + (u32::arbitrary(g) % 128);
        let mut v = Value::new(width);
        for i in 0..width {
            let state = match u8::arbitrary(g) % 4 {
                0 => LogicState::Lo,
                1 => LogicState::Hi,
                2 => LogicState::HiZ,
                _ => LogicState::Undefined,
            };
            v.set_bit(i, state).expect("i < width by construction");
        }
        ArbValue(v)
    }
}

/// Tri-plane invariant (spec §8): after construction, every bit is exactly
/// one of Lo/Hi/HiZ/Undefined and nothing above the width leaks in.
#[quickcheck]
fn tri_plane_invariant_holds(v: ArbValue) -> bool {
    let v = v.0;
    (0..v.bit_len()).all(|i| v.get_bit(i).1.is_ok())
}

/// `from_literal(text(Binary)) == v` for any value (round-trip literal,
/// spec §8); binary grouping is always 1 bit per digit so this holds at
/// every width.
#[quickcheck]
fn binary_round_trip(v: ArbValue) -> bool {
    let v = v.0;
    let text = v.text(Radix::Binary);
    Value::from_literal(&text).unwrap() == v
}

/// `concat(X, Y).bit_len() == X.bit_len() + Y.bit_len()`, and slicing the
/// result back apart recovers both operands (spec §8's concat property).
#[quickcheck]
fn concat_width_and_slices_round_trip(x: ArbValue, y: ArbValue) -> bool {
    let (x, y) = (x.0, y.0);
    let z = Value::concat(&x, &y);
    z.bit_len() == x.bit_len() + y.bit_len()
        && z.get_bit_range(0, y.bit_len() - 1).unwrap() == y
        && z.get_bit_range(y.bit_len(), y.bit_len() + x.bit_len() - 1).unwrap() == x
}

/// `lsh(n)` grows the width by `n` and the low `n` bits are driven `Lo`.
#[quickcheck]
fn lsh_grows_width_and_zero_fills_low_bits(v: ArbValue, n: u8) -> bool {
    let v = v.0;
    let n = (n % 32) as u32;
    let shifted = v.lsh(n);
    shifted.bit_len() == v.bit_len() + n && (0..n).all(|i| shifted.get_bit(i).0 == LogicState::Lo)
}

/// Case equality is reflexive for every value, including ones carrying
/// hiz/undef bits (spec §8).
#[quickcheck]
fn case_equality_is_reflexive(v: ArbValue) -> bool {
    let v = v.0;
    v.case_eq(&v).get_bit(0).0 == LogicState::Hi
}
