//! Textual rendering of [`super::Value`], the inverse of `from_literal`.

use super::{
    bit_at,
    literal::Radix,
    Value,
};

impl Value {
    /// Render as `<width>'<base><digits>`, high-order digit first.
    ///
    /// Digits are grouped by the radix's bits-per-digit (1 for `b`, 3 for
    /// `o`, 4 for `h`); a group containing any undefined bit renders as
    /// `x` (undef takes precedence over hiz), a group containing any hiz
    /// bit (and no undef bit) renders as `z`, otherwise it renders as the
    /// ordinary numeral for its driven bits.
    pub fn text(&self, base: Radix) -> String {
        let bits_per_digit = match base {
            Radix::Binary => 1,
            Radix::Octal => 3,
            Radix::Hex => 4,
            Radix::Decimal => 1, // not a documented public path; degrade to binary-style grouping
        };
        let (bits, hiz, undef) = self.planes();
        let group_count = (self.width + bits_per_digit - 1) / bits_per_digit;

        let mut digits = String::with_capacity(group_count as usize);
        for g in (0..group_count).rev() {
            let lo = g * bits_per_digit;
            let hi = ((g + 1) * bits_per_digit).min(self.width);
            let mut any_undef = false;
            let mut any_hiz = false;
            let mut value = 0u32;
            for (shift, bit) in (lo..hi).enumerate() {
                match bit_at(&bits, &hiz, &undef, bit) {
                    crate::logic_state::LogicState::Undefined => any_undef = true,
                    crate::logic_state::LogicState::HiZ => any_hiz = true,
                    crate::logic_state::LogicState::Hi => value |= 1 << shift,
                    crate::logic_state::LogicState::Lo => {}
                }
            }
            let ch = if any_undef {
                'x'
            } else if any_hiz {
                'z'
            } else {
                char::from_digit(value, 1 << bits_per_digit.min(4)).unwrap_or('?')
            };
            digits.push(ch);
        }

        format!("{}'{}{}", self.width, base.render_char(), digits)
    }
}
