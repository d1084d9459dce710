//! Parser for the sized literal notation: `size?'signed?radix?digits`.

use super::{
    repr::limbs_for,
    Value,
};
use crate::error::{
    SimError,
    SimResult,
};

/// Numeral base of a parsed literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    /// `b`/`B`, one bit per digit.
    Binary,
    /// `o`/`O`, three bits per digit.
    Octal,
    /// `d`/`D` (the default), parsed as a whole decimal number.
    Decimal,
    /// `h`/`H`, four bits per digit.
    Hex,
}

impl Radix {
    /// Bits contributed by one digit, for the positional (non-decimal)
    /// radices.
    const fn bits_per_digit(self) -> Option<u32> {
        match self {
            Radix::Binary => Some(1),
            Radix::Octal => Some(3),
            Radix::Hex => Some(4),
            Radix::Decimal => None,
        }
    }

    /// The character used to render this radix in `text()` output.
    pub(super) const fn render_char(self) -> char {
        match self {
            Radix::Binary => 'b',
            Radix::Octal => 'o',
            Radix::Decimal => 'd',
            Radix::Hex => 'h',
        }
    }
}

fn config_error(literal: &str, reason: impl Into<String>) -> SimError {
    SimError::Configuration {
        literal: literal.to_string(),
        reason: reason.into(),
    }
}

impl Value {
    /// Parse a sized literal: `size?'signed-flag?radix?digits`.
    ///
    /// `size` is a decimal integer (omitted: the minimum width that fits
    /// the digits); `signed-flag` is `s`/`S` and is accepted but not used;
    /// `radix` is one of `b`/`o`/`d`/`h` (case-insensitive, default `d`);
    /// digits may contain `z`/`x` spans (case-insensitive) and `_`
    /// separators, which are ignored.
    pub fn from_literal(s: &str) -> SimResult<Value> {
        let tick = s.find('\'').ok_or_else(|| {
            config_error(s, "missing `'` separating size from digits")
        })?;
        let (size_str, rest) = s.split_at(tick);
        let rest = &rest[1..]; // drop the tick

        let size: Option<u32> = if size_str.is_empty() {
            None
        } else {
            Some(
                size_str
                    .parse()
                    .map_err(|_| config_error(s, "size must be a decimal integer"))?,
            )
        };

        let mut chars = rest.chars().peekable();
        if matches!(chars.peek(), Some('s') | Some('S')) {
            chars.next();
        }

        let radix = match chars.peek() {
            Some('b') | Some('B') => {
                chars.next();
                Radix::Binary
            }
            Some('o') | Some('O') => {
                chars.next();
                Radix::Octal
            }
            Some('h') | Some('H') => {
                chars.next();
                Radix::Hex
            }
            Some('d') | Some('D') => {
                chars.next();
                Radix::Decimal
            }
            _ => Radix::Decimal,
        };

        let digits: String = chars.filter(|&c| c != '_').collect();
        if digits.is_empty() {
            return Err(config_error(s, "literal has no digits"));
        }

        match radix.bits_per_digit() {
            Some(bits_per_digit) => parse_positional(s, radix, bits_per_digit, &digits, size),
            None => parse_decimal(s, &digits, size),
        }
    }
}

fn parse_positional(
    literal: &str,
    radix: Radix,
    bits_per_digit: u32,
    digits: &str,
    size: Option<u32>,
) -> SimResult<Value> {
    let digit_count = digits.chars().count() as u32;
    let width = size.unwrap_or(digit_count * bits_per_digit).max(1);

    // Digit slots needed to cover `width`; the most significant slot may be
    // partial when `width` isn't a multiple of `bits_per_digit` (e.g. a
    // 65-bit hex literal has 17 digit slots, the top one contributing a
    // single bit).
    let slot_count = (width + bits_per_digit - 1) / bits_per_digit;
    if digit_count != slot_count {
        return Err(config_error(
            literal,
            format!(
                "{digit_count} digits given but a {width}-bit value needs {slot_count}"
            ),
        ));
    }
    let top_slot_bits = width - (slot_count - 1) * bits_per_digit;

    let n = limbs_for(width);
    let mut bits = vec![0u64; n];
    let mut hiz = vec![0u64; n];
    let mut undef = vec![0u64; n];

    // Digits are written high-order first; walk them in reverse so bit
    // index 0 lines up with the last (least significant) digit.
    for (digit_index, ch) in digits.chars().rev().enumerate() {
        let digit_index = digit_index as u32;
        let base_bit = digit_index * bits_per_digit;
        let is_top = digit_index == slot_count - 1;
        let this_digit_bits = if is_top { top_slot_bits } else { bits_per_digit };

        match ch {
            'z' | 'Z' => {
                for b in 0..this_digit_bits {
                    set_plane_bit(&mut hiz, base_bit + b);
                }
            }
            'x' | 'X' => {
                for b in 0..this_digit_bits {
                    set_plane_bit(&mut undef, base_bit + b);
                }
            }
            _ => {
                let value = digit_value(radix, ch).ok_or_else(|| {
                    config_error(literal, format!("invalid digit `{ch}` for this radix"))
                })?;
                if is_top && value >> top_slot_bits != 0 {
                    return Err(config_error(
                        literal,
                        format!("digit `{ch}` does not fit in the top {top_slot_bits}-bit slot"),
                    ));
                }
                for b in 0..this_digit_bits {
                    if value & (1 << b) != 0 {
                        set_plane_bit(&mut bits, base_bit + b);
                    }
                }
            }
        }
    }

    Ok(Value::from_planes(width, bits, hiz, undef))
}

fn digit_value(radix: Radix, ch: char) -> Option<u32> {
    let v = ch.to_digit(match radix {
        Radix::Binary => 2,
        Radix::Octal => 8,
        Radix::Hex => 16,
        Radix::Decimal => unreachable!("decimal handled separately"),
    })?;
    Some(v)
}

fn set_plane_bit(plane: &mut [u64], bit: u32) {
    plane[(bit / 64) as usize] |= 1u64 << (bit % 64);
}

fn parse_decimal(literal: &str, digits: &str, size: Option<u32>) -> SimResult<Value> {
    if digits.chars().all(|c| c == 'x' || c == 'X') {
        let width = size.unwrap_or(1).max(1);
        let n = limbs_for(width);
        let mut undef = vec![0u64; n];
        for b in 0..width {
            set_plane_bit(&mut undef, b);
        }
        return Ok(Value::from_planes(width, vec![0; n], vec![0; n], undef));
    }
    if digits.chars().all(|c| c == 'z' || c == 'Z') {
        let width = size.unwrap_or(1).max(1);
        let n = limbs_for(width);
        let mut hiz = vec![0u64; n];
        for b in 0..width {
            set_plane_bit(&mut hiz, b);
        }
        return Ok(Value::from_planes(width, vec![0; n], hiz, vec![0; n]));
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(config_error(literal, "decimal digits must be `0`-`9`"));
    }

    // Parse an arbitrary-precision decimal number into 64-bit limbs via
    // repeated multiply-by-ten-add-digit.
    let mut limbs: Vec<u64> = vec![0];
    for ch in digits.chars() {
        let digit = ch.to_digit(10).expect("validated above") as u64;
        let mut carry = digit;
        for limb in limbs.iter_mut() {
            let product = (*limb as u128) * 10 + carry as u128;
            *limb = product as u64;
            carry = (product >> 64) as u64;
        }
        if carry != 0 {
            limbs.push(carry);
        }
    }

    let minimal_width = minimal_width_for(&limbs);
    let width = size.unwrap_or(minimal_width).max(1);
    if minimal_width > width {
        return Err(config_error(
            literal,
            format!("value requires {minimal_width} bits but size is {width}"),
        ));
    }

    let n = limbs_for(width);
    limbs.resize(n, 0);
    Ok(Value::from_planes(width, limbs, vec![0; n], vec![0; n]))
}

fn minimal_width_for(limbs: &[u64]) -> u32 {
    for (i, &limb) in limbs.iter().enumerate().rev() {
        if limb != 0 {
            return (i as u32) * 64 + (64 - limb.leading_zeros());
        }
    }
    1
}
