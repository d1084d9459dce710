//! Table-driven coverage of wire resolution (spec §8 scenario 4: multiple
//! drivers resolving through `LogicState::combine`).

use rstest::rstest;

use super::{
    RegisterHandle,
    Wire,
};
use crate::logic_state::LogicState::{
    self,
    Hi,
    HiZ,
    Lo,
    Undefined,
};

#[rstest]
#[case(vec![Lo, HiZ, HiZ], Lo)]
#[case(vec![Lo, Hi, HiZ], Undefined)]
#[case(vec![HiZ, HiZ, HiZ], HiZ)]
#[case(vec![Hi, Hi, Hi], Hi)]
#[case(vec![Undefined, Lo, Hi], Undefined)]
fn wire_resolves_its_drivers(#[case] drivers: Vec<LogicState>, #[case] expected: LogicState) {
    let mut w = Wire::new("net");
    for (i, state) in drivers.into_iter().enumerate() {
        let r = RegisterHandle::new(format!("d{i}"));
        r.set_value(state).unwrap();
        r.commit();
        w.add_driver(r);
    }
    assert_eq!(w.resolve(), expected);
}

#[rstest]
fn wire_with_no_drivers_resolves_undefined() {
    let w = Wire::new("net");
    assert_eq!(w.resolve(), Undefined);
}
