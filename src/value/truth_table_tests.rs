//! Table-driven coverage of the three-valued bitwise truth tables spec §4.2
//! spells out explicitly for `&`, `|`, and `^`/`~^`.

use test_case::test_case;

use super::Value;
use crate::logic_state::LogicState;

fn bit(state: LogicState) -> Value {
    let mut v = Value::new(1);
    v.set_bit(0, state).unwrap();
    v
}

fn result_state(v: &Value) -> LogicState {
    v.get_bit(0).0
}

use LogicState::{
    Hi,
    HiZ,
    Lo,
    Undefined,
};

#[test_case(Lo, Lo, Lo)]
#[test_case(Lo, Hi, Lo)]
#[test_case(Hi, Hi, Hi)]
#[test_case(Lo, Undefined, Lo)]
#[test_case(Lo, HiZ, Lo)]
#[test_case(Hi, Undefined, Undefined)]
#[test_case(Hi, HiZ, Undefined)]
#[test_case(Undefined, Undefined, Undefined)]
fn and_truth_table(a: LogicState, b: LogicState, expected: LogicState) {
    assert_eq!(result_state(&bit(a).bitand(&bit(b))), expected);
    assert_eq!(result_state(&bit(b).bitand(&bit(a))), expected);
}

#[test_case(Hi, Hi, Hi)]
#[test_case(Hi, Lo, Hi)]
#[test_case(Lo, Lo, Lo)]
#[test_case(Hi, Undefined, Hi)]
#[test_case(Hi, HiZ, Hi)]
#[test_case(Lo, Undefined, Undefined)]
#[test_case(Lo, HiZ, Undefined)]
#[test_case(Undefined, Undefined, Undefined)]
fn or_truth_table(a: LogicState, b: LogicState, expected: LogicState) {
    assert_eq!(result_state(&bit(a).bitor(&bit(b))), expected);
    assert_eq!(result_state(&bit(b).bitor(&bit(a))), expected);
}

#[test_case(Lo, Lo, Lo)]
#[test_case(Lo, Hi, Hi)]
#[test_case(Hi, Hi, Lo)]
#[test_case(Lo, Undefined, Undefined)]
#[test_case(Lo, HiZ, Undefined)]
#[test_case(Undefined, Undefined, Undefined)]
fn xor_truth_table(a: LogicState, b: LogicState, expected: LogicState) {
    assert_eq!(result_state(&bit(a).bitxor(&bit(b))), expected);
    assert_eq!(result_state(&bit(b).bitxor(&bit(a))), expected);
}

#[test_case(Lo, Lo, Hi)]
#[test_case(Lo, Hi, Lo)]
#[test_case(Lo, Undefined, Undefined)]
fn xnor_inverts_xor(a: LogicState, b: LogicState, expected: LogicState) {
    assert_eq!(result_state(&bit(a).bitxnor(&bit(b))), expected);
}
