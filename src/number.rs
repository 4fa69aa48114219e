//! Integers in four radixes and floats.

use crate::combinator::{Cursor, alt, attempt, opt, pair, recognize};
use crate::error::ValueReason;
use crate::grammar::RawValue;
use crate::scalar::{
    byte, byte_if, digits, is_bin_digit, is_digit, is_hex_digit, is_oct_digit, tag,
};

#[cfg(test)]
#[path = "./number_tests.rs"]
mod tests;

fn is_sign(b: u8) -> bool {
    b == b'+' || b == b'-'
}

fn strip_underscores(text: &str) -> String {
    text.chars().filter(|&ch| ch != '_').collect()
}

/// Any integer literal, prefixed radixes first.
pub(crate) fn integer(c: &mut Cursor<'_>) -> Option<RawValue> {
    alt((hexadecimal, octal, binary, decimal))(c)
}

fn hexadecimal(c: &mut Cursor<'_>) -> Option<RawValue> {
    radix_integer(c, "0x", is_hex_digit, 16, ValueReason::InvalidHexadecimal)
}

fn octal(c: &mut Cursor<'_>) -> Option<RawValue> {
    radix_integer(c, "0o", is_oct_digit, 8, ValueReason::InvalidOctal)
}

fn binary(c: &mut Cursor<'_>) -> Option<RawValue> {
    radix_integer(c, "0b", is_bin_digit, 2, ValueReason::InvalidBinary)
}

/// A prefixed, unsigned integer. Once the prefix matched, anything other than
/// a valid digit sequence that fits in an `i64` is an error.
fn radix_integer(
    c: &mut Cursor<'_>,
    prefix: &'static str,
    pred: fn(u8) -> bool,
    radix: u32,
    reason: ValueReason,
) -> Option<RawValue> {
    let start = c.pos();
    if !c.eat_str(prefix) {
        return None;
    }
    let Some(text) = digits(pred)(c) else {
        return Some(RawValue::Error(c.char_span(c.pos()), reason));
    };
    match i64::from_str_radix(&strip_underscores(text), radix) {
        Ok(value) => Some(RawValue::Integer(value)),
        Err(_) => Some(RawValue::Error(c.span_from(start), reason)),
    }
}

/// `0`, or digits without a leading zero.
fn unsigned_decimal<'a>(c: &mut Cursor<'a>) -> Option<&'a str> {
    if c.peek() == Some(b'0') {
        return recognize(byte(b'0'))(c);
    }
    digits(is_digit)(c)
}

/// Optionally signed decimal digits, shared by integers and float mantissas.
fn decimal_text<'a>(c: &mut Cursor<'a>) -> Option<&'a str> {
    recognize(pair(opt(byte_if(is_sign)), unsigned_decimal))(c)
}

fn decimal(c: &mut Cursor<'_>) -> Option<RawValue> {
    let start = c.pos();
    let text = decimal_text(c)?;
    match strip_underscores(text).parse::<i64>() {
        Ok(value) => Some(RawValue::Integer(value)),
        Err(_) => Some(RawValue::Error(c.span_from(start), ValueReason::InvalidDecimal)),
    }
}

fn exponent<'a>(c: &mut Cursor<'a>) -> Option<&'a str> {
    recognize(pair(
        byte_if(|b| b == b'e' || b == b'E'),
        pair(opt(byte_if(is_sign)), digits(is_digit)),
    ))(c)
}

/// A float with a fraction and/or exponent, or `inf`/`nan`. Plain integers
/// do not match.
pub(crate) fn float(c: &mut Cursor<'_>) -> Option<RawValue> {
    alt((special_float, normal_float))(c)
}

fn special_float(c: &mut Cursor<'_>) -> Option<RawValue> {
    attempt(c, |c| {
        let negative = opt(byte_if(is_sign))(c)? == Some(b'-');
        match alt((tag("inf"), tag("nan")))(c)? {
            "inf" if negative => Some(RawValue::Float(f64::NEG_INFINITY)),
            "inf" => Some(RawValue::Float(f64::INFINITY)),
            _ => Some(RawValue::Float(f64::NAN)),
        }
    })
}

fn normal_float(c: &mut Cursor<'_>) -> Option<RawValue> {
    attempt(c, |c| {
        let start = c.pos();
        decimal_text(c)?;
        if c.eat(b'.') {
            if digits(is_digit)(c).is_none() {
                return Some(RawValue::Error(
                    c.span_from(start),
                    ValueReason::InvalidFloatMissingFraction,
                ));
            }
            exponent(c);
        } else {
            exponent(c)?;
        }
        match strip_underscores(c.slice(start)).parse::<f64>() {
            Ok(value) if value.is_finite() => Some(RawValue::Float(value)),
            _ => Some(RawValue::Error(c.span_from(start), ValueReason::InvalidFloat)),
        }
    })
}
