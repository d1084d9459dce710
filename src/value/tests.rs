use super::ops::RelOp;
use super::*;
use crate::logic_state::LogicState;

#[test]
fn literal_hex_with_x_and_z() {
    let v = Value::from_literal("32'hdxadbezf").unwrap();
    assert_eq!(v.bit_len(), 32);
    let (bits, hiz, undef) = v.planes();
    assert_eq!(bits[0], 0xd0adbe0f);
    assert_eq!(hiz[0], 0x000000f0);
    assert_eq!(undef[0], 0x0f000000);
    assert_eq!(v.text(Radix::Binary), "32'b1101xxxx1010110110111110zzzz1111");
    assert_eq!(v.text(Radix::Hex), "32'hdxadbezf");
}

#[test]
fn concat_wide_values() {
    let x = Value::from_literal("3'b101").unwrap();
    let y = Value::from_literal("65'h1deadbeef01234567").unwrap();
    let z = Value::concat(&x, &y);
    assert_eq!(z.bit_len(), 68);
    assert_eq!(z.text(Radix::Hex), "68'hbdeadbeef01234567");
}

#[test]
fn equality_semantics() {
    let a = Value::from_literal("4'b101z").unwrap();
    let b = Value::from_literal("4'b101x").unwrap();
    let c = Value::from_literal("4'b1010").unwrap();

    assert_eq!(a.logical_eq(&b).get_bit(0).0, LogicState::Undefined);
    assert_eq!(a.case_eq(&b).get_bit(0).0, LogicState::Lo);
    assert_eq!(a.case_ne(&b).get_bit(0).0, LogicState::Hi);
    assert_eq!(c.logical_eq(&c).get_bit(0).0, LogicState::Hi);
    assert_eq!(a.logical_eq(&c).get_bit(0).0, LogicState::Undefined);
}

#[test]
fn case_equality_is_reflexive_even_with_unknowns() {
    let v = Value::from_literal("8'hzx").unwrap();
    assert_eq!(v.case_eq(&v).get_bit(0).0, LogicState::Hi);
    assert_eq!(v.logical_eq(&v).get_bit(0).0, LogicState::Undefined);
}

#[test]
fn concat_width_and_extraction_round_trip() {
    let x = Value::from_literal("5'b10110").unwrap();
    let y = Value::from_literal("9'b101010101").unwrap();
    let z = Value::concat(&x, &y);
    assert_eq!(z.bit_len(), x.bit_len() + y.bit_len());
    assert_eq!(z.get_bit_range(0, y.bit_len() - 1).unwrap(), y);
    assert_eq!(
        z.get_bit_range(y.bit_len(), y.bit_len() + x.bit_len() - 1).unwrap(),
        x
    );
}

#[test]
fn shift_consistency() {
    let v = Value::from_literal("4'b1011").unwrap();
    let shifted = v.lsh(3);
    assert_eq!(shifted.bit_len(), v.bit_len() + 3);
    for i in 0..3 {
        assert_eq!(shifted.get_bit(i).0, LogicState::Lo);
    }
}

#[test]
fn rsh_discards_low_bits_and_preserves_width() {
    let v = Value::from_literal("4'b1011").unwrap();
    let shifted = v.rsh(2);
    assert_eq!(shifted.bit_len(), 4);
    assert_eq!(shifted.get_bit(0).0, LogicState::Hi); // was bit 2
    assert_eq!(shifted.get_bit(1).0, LogicState::Hi); // was bit 3
    assert_eq!(shifted.get_bit(2).0, LogicState::Lo);
    assert_eq!(shifted.get_bit(3).0, LogicState::Lo);
}

#[test]
fn relational_is_undefined_with_unknown_bits() {
    let a = Value::from_literal("4'b101x").unwrap();
    let b = Value::from_literal("4'b0001").unwrap();
    assert_eq!(a.relational(&b, RelOp::Lt).get_bit(0).0, LogicState::Undefined);
}

#[test]
fn relational_unsigned_compare() {
    let a = Value::from_literal("4'd2").unwrap();
    let b = Value::from_literal("4'd10").unwrap();
    assert_eq!(a.relational(&b, RelOp::Lt).get_bit(0).0, LogicState::Hi);
    assert_eq!(b.relational(&a, RelOp::Gt).get_bit(0).0, LogicState::Hi);
}

#[test]
fn bitwise_and_truth_table() {
    let x = Value::from_literal("1'bx").unwrap();
    let zero = Value::from_literal("1'b0").unwrap();
    let one = Value::from_literal("1'b1").unwrap();
    assert_eq!(x.bitand(&zero).get_bit(0).0, LogicState::Lo);
    assert_eq!(one.bitand(&x).get_bit(0).0, LogicState::Undefined);
    assert_eq!(x.bitand(&x).get_bit(0).0, LogicState::Undefined);
}

#[test]
fn bitwise_or_truth_table() {
    let x = Value::from_literal("1'bx").unwrap();
    let one = Value::from_literal("1'b1").unwrap();
    let z = Value::from_literal("1'bz").unwrap();
    assert_eq!(x.bitor(&one).get_bit(0).0, LogicState::Hi);
    assert_eq!(one.bitor(&z).get_bit(0).0, LogicState::Hi);
    assert_eq!(x.bitor(&z).get_bit(0).0, LogicState::Undefined);
}

#[test]
fn bitwise_xor_any_unknown_is_undefined() {
    let z = Value::from_literal("1'bz").unwrap();
    let one = Value::from_literal("1'b1").unwrap();
    assert_eq!(z.bitxor(&one).get_bit(0).0, LogicState::Undefined);
}

#[test]
fn tri_plane_invariant_after_set_bit() {
    let mut v = Value::new(70);
    v.set_bit(69, LogicState::Undefined).unwrap();
    v.set_bit(3, LogicState::HiZ).unwrap();
    let (bits, hiz, undef) = v.planes();
    for i in 0..bits.len() {
        assert_eq!(hiz[i] & undef[i], 0);
        assert_eq!((hiz[i] | undef[i]) & bits[i], 0);
    }
}

#[test]
fn index_out_of_range_reports_error() {
    let v = Value::new(4);
    let (state, res) = v.get_bit(10);
    assert_eq!(state, LogicState::Undefined);
    assert!(res.is_err());
}

#[test]
fn set_bit_range_width_mismatch_errors() {
    let mut v = Value::new(8);
    let narrow = Value::new(2);
    assert!(v.set_bit_range(0, 3, &narrow).is_err());
}

#[test]
fn literal_size_mismatch_errors() {
    assert!(Value::from_literal("2'hff").is_err());
}

#[test]
fn literal_underscore_separators_are_ignored() {
    let v = Value::from_literal("8'b1010_1010").unwrap();
    assert_eq!(v.text(Radix::Hex), "8'haa");
}

#[test]
fn literal_decimal_x_and_z_whole_value() {
    let undef = Value::from_literal("4'dx").unwrap();
    assert!(undef.has_undef());
    let hiz = Value::from_literal("4'dz").unwrap();
    assert!(hiz.has_hiz());
}

#[test]
fn combine_generalizes_bitwise_from_logic_state() {
    let a = Value::from_literal("2'b0z").unwrap();
    let b = Value::from_literal("2'bz1").unwrap();
    let combined = a.combine(&b);
    assert_eq!(combined.get_bit(0).0, LogicState::Lo);
    assert_eq!(combined.get_bit(1).0, LogicState::Hi);
}
