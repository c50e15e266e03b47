//! Integer and float recognizers: decimal/hex/oct/bin integers with `_`
//! separators, floats with fraction/exponent, and the `inf`/`nan` special
//! forms.

use crate::cursor::Cursor;
use crate::error::{Error, LexErrorKind, Position, Result};
use crate::value::Value;

/// Recognizes a boolean literal (`true`/`false`) at the cursor.
pub fn lex_boolean(cursor: &mut Cursor<'_>) -> Option<Value> {
    if cursor.starts_with("true") && !follows_ident(cursor, 4) {
        cursor.advance(4);
        return Some(Value::Boolean(true));
    }
    if cursor.starts_with("false") && !follows_ident(cursor, 5) {
        cursor.advance(5);
        return Some(Value::Boolean(false));
    }
    None
}

fn follows_ident(cursor: &Cursor<'_>, len: usize) -> bool {
    cursor.peek(len).is_some_and(super::is_bare_key_char)
}

/// Recognizes a number literal: decimal/hex/oct/bin integer, or a float
/// (including `inf`/`nan` with optional sign).
pub fn lex_number(cursor: &mut Cursor<'_>) -> Result<Value> {
    let start = cursor.position();
    let mut negative = false;
    match cursor.peek0() {
        Some(b'+') => {
            cursor.advance(1);
        }
        Some(b'-') => {
            negative = true;
            cursor.advance(1);
        }
        _ => {}
    }

    if cursor.starts_with("inf") && !follows_ident(cursor, 3) {
        cursor.advance(3);
        return Ok(Value::Float(if negative { f64::NEG_INFINITY } else { f64::INFINITY }));
    }
    if cursor.starts_with("nan") && !follows_ident(cursor, 3) {
        cursor.advance(3);
        let nan = f64::NAN;
        return Ok(Value::Float(if negative { -nan } else { nan }));
    }

    if !negative && cursor.peek0() == Some(b'0') {
        match cursor.peek(1) {
            Some(b'x') => return lex_radix_integer(cursor, start, 16, |b| b.is_ascii_hexdigit()),
            Some(b'o') => return lex_radix_integer(cursor, start, 8, |b| (b'0'..=b'7').contains(&b)),
            Some(b'b') => return lex_radix_integer(cursor, start, 2, |b| b == b'0' || b == b'1'),
            _ => {}
        }
    }

    lex_decimal(cursor, negative, start)
}

fn lex_radix_integer(
    cursor: &mut Cursor<'_>,
    start: Position,
    radix: u32,
    digit_ok: impl Fn(u8) -> bool,
) -> Result<Value> {
    cursor.advance(2); // "0x" / "0o" / "0b"
    let mut raw = String::new();
    while let Some(b) = cursor.peek0() {
        if digit_ok(b) || b == b'_' {
            raw.push(b as char);
            cursor.advance(1);
        } else {
            break;
        }
    }
    if raw.is_empty() {
        return Err(Error::lex(LexErrorKind::InvalidNumber("missing digits after prefix".into()), start));
    }
    let digits = strip_underscores(&raw, start)?;
    let magnitude = u64::from_str_radix(&digits, radix)
        .map_err(|_| Error::lex(LexErrorKind::IntegerOverflow, start))?;
    if magnitude > i64::MAX as u64 {
        return Err(Error::lex(LexErrorKind::IntegerOverflow, start));
    }
    Ok(Value::Integer(magnitude as i64))
}

fn lex_decimal(cursor: &mut Cursor<'_>, negative: bool, start: Position) -> Result<Value> {
    let mut raw_int = String::new();
    while let Some(b) = cursor.peek0() {
        if b.is_ascii_digit() || b == b'_' {
            raw_int.push(b as char);
            cursor.advance(1);
        } else {
            break;
        }
    }
    if raw_int.is_empty() {
        return Err(Error::lex(LexErrorKind::InvalidNumber("expected a digit".into()), start));
    }
    let int_digits = strip_underscores(&raw_int, start)?;
    if int_digits.len() > 1 && int_digits.starts_with('0') {
        return Err(Error::lex(LexErrorKind::InvalidNumber("leading zero".into()), start));
    }

    let mut is_float = false;
    let mut frac_digits = String::new();
    let mut exp_sign = "";
    let mut exp_digits = String::new();

    if cursor.peek0() == Some(b'.') && cursor.peek(1).is_some_and(|b| b.is_ascii_digit()) {
        is_float = true;
        cursor.advance(1);
        let mut raw_frac = String::new();
        while let Some(b) = cursor.peek0() {
            if b.is_ascii_digit() || b == b'_' {
                raw_frac.push(b as char);
                cursor.advance(1);
            } else {
                break;
            }
        }
        frac_digits = strip_underscores(&raw_frac, start)?;
    }

    if matches!(cursor.peek0(), Some(b'e' | b'E')) {
        is_float = true;
        cursor.advance(1);
        if matches!(cursor.peek0(), Some(b'+')) {
            exp_sign = "+";
            cursor.advance(1);
        } else if matches!(cursor.peek0(), Some(b'-')) {
            exp_sign = "-";
            cursor.advance(1);
        }
        let mut raw_exp = String::new();
        while let Some(b) = cursor.peek0() {
            if b.is_ascii_digit() || b == b'_' {
                raw_exp.push(b as char);
                cursor.advance(1);
            } else {
                break;
            }
        }
        if raw_exp.is_empty() {
            return Err(Error::lex(LexErrorKind::InvalidNumber("expected exponent digits".into()), start));
        }
        exp_digits = strip_underscores(&raw_exp, start)?;
    }

    if !is_float {
        let magnitude: u64 = int_digits
            .parse()
            .map_err(|_| Error::lex(LexErrorKind::IntegerOverflow, start))?;
        let value = if negative {
            if magnitude == i64::MIN.unsigned_abs() {
                i64::MIN
            } else if magnitude <= i64::MAX as u64 {
                -(magnitude as i64)
            } else {
                return Err(Error::lex(LexErrorKind::IntegerOverflow, start));
            }
        } else if magnitude <= i64::MAX as u64 {
            magnitude as i64
        } else {
            return Err(Error::lex(LexErrorKind::IntegerOverflow, start));
        };
        return Ok(Value::Integer(value));
    }

    let mut text = String::new();
    if negative {
        text.push('-');
    }
    text.push_str(&int_digits);
    if !frac_digits.is_empty() {
        text.push('.');
        text.push_str(&frac_digits);
    }
    if !exp_digits.is_empty() {
        text.push('e');
        text.push_str(exp_sign);
        text.push_str(&exp_digits);
    }
    let value: f64 = text
        .parse()
        .map_err(|_| Error::lex(LexErrorKind::InvalidNumber(text.clone()), start))?;
    Ok(Value::Float(value))
}

/// Validates `_` separator placement (no leading, trailing, or adjacent
/// underscores) and returns the digit text with underscores removed.
fn strip_underscores(s: &str, start: Position) -> Result<String> {
    let bytes = s.as_bytes();
    if bytes.first() == Some(&b'_') || bytes.last() == Some(&b'_') {
        return Err(Error::lex(
            LexErrorKind::InvalidNumber("stray `_` separator".into()),
            start,
        ));
    }
    let mut out = String::with_capacity(s.len());
    let mut prev_underscore = false;
    for &b in bytes {
        if b == b'_' {
            if prev_underscore {
                return Err(Error::lex(
                    LexErrorKind::InvalidNumber("adjacent `_` separators".into()),
                    start,
                ));
            }
            prev_underscore = true;
        } else {
            out.push(b as char);
            prev_underscore = false;
        }
    }
    Ok(out)
}
