//! Date/time recognizers: RFC 3339 with the TOML relaxations (space
//! date/time separator, strict calendar validation). Error messages name
//! the specific violated field (`invalid month 99`, `invalid day 30 for
//! month 2`) rather than a generic "invalid date".
//!
//! Leap second `:60` is rejected for simplicity rather than accepted per
//! strict RFC 3339.

use crate::cursor::Cursor;
use crate::error::{Error, LexErrorKind, Position, Result};
use crate::value::{LocalDate, LocalDateTime, LocalTime, Offset, OffsetDateTime, Value};

/// True if the cursor is at a date start: four digits followed by `-`.
pub fn looks_like_date(cursor: &Cursor<'_>) -> bool {
    (0..4).all(|i| cursor.peek(i).is_some_and(|b| b.is_ascii_digit())) && cursor.peek(4) == Some(b'-')
}

/// True if the cursor is at a time start: two digits followed by `:`.
pub fn looks_like_time(cursor: &Cursor<'_>) -> bool {
    (0..2).all(|i| cursor.peek(i).is_some_and(|b| b.is_ascii_digit())) && cursor.peek(2) == Some(b':')
}

/// Recognizes a local-time, local-date, local-datetime, or offset-datetime
/// literal. The cursor must be positioned where `looks_like_date` or
/// `looks_like_time` returned true.
pub fn lex_date_or_time(cursor: &mut Cursor<'_>) -> Result<Value> {
    let start = cursor.position();

    if looks_like_time(cursor) {
        let time = parse_time(cursor, start)?;
        return Ok(Value::LocalTime(time));
    }

    let date = parse_date(cursor, start)?;

    let takes_time = match cursor.peek0() {
        Some(b'T') | Some(b't') => {
            cursor.advance(1);
            true
        }
        Some(b' ') => {
            let is_time_next = cursor.peek(1).is_some_and(|b| b.is_ascii_digit())
                && cursor.peek(2).is_some_and(|b| b.is_ascii_digit())
                && cursor.peek(3) == Some(b':');
            if is_time_next {
                cursor.advance(1);
            }
            is_time_next
        }
        _ => false,
    };

    if !takes_time {
        return Ok(Value::LocalDate(date));
    }

    let time = parse_time(cursor, start)?;
    match parse_offset(cursor, start)? {
        Some(offset) => Ok(Value::OffsetDateTime(OffsetDateTime { date, time, offset })),
        None => Ok(Value::LocalDateTime(LocalDateTime { date, time })),
    }
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
            if leap { 29 } else { 28 }
        }
        _ => 0,
    }
}

fn two_digits(cursor: &Cursor<'_>, offset: usize) -> u32 {
    let b0 = cursor.peek(offset).unwrap() - b'0';
    let b1 = cursor.peek(offset + 1).unwrap() - b'0';
    (b0 as u32) * 10 + b1 as u32
}

fn parse_date(cursor: &mut Cursor<'_>, start: Position) -> Result<LocalDate> {
    let ok = (0..10).all(|i| cursor.peek(i).is_some())
        && (0..4).all(|i| cursor.peek(i).unwrap().is_ascii_digit())
        && cursor.peek(4) == Some(b'-')
        && cursor.peek(5).unwrap_or(b' ').is_ascii_digit()
        && cursor.peek(6).unwrap_or(b' ').is_ascii_digit()
        && cursor.peek(7) == Some(b'-')
        && cursor.peek(8).unwrap_or(b' ').is_ascii_digit()
        && cursor.peek(9).unwrap_or(b' ').is_ascii_digit();
    if !ok {
        return Err(Error::lex(LexErrorKind::InvalidDate("expected YYYY-MM-DD".into()), start));
    }

    let year = (0..4).fold(0u32, |acc, i| acc * 10 + (cursor.peek(i).unwrap() - b'0') as u32);
    let month = two_digits(cursor, 5);
    let day = two_digits(cursor, 8);

    if !(1..=12).contains(&month) {
        return Err(Error::lex(LexErrorKind::InvalidDate(format!("invalid month {month}")), start));
    }
    let year = year as u16;
    let month = month as u8;
    let max_day = days_in_month(year, month);
    if day < 1 || day > max_day as u32 {
        return Err(Error::lex(
            LexErrorKind::InvalidDate(format!("invalid day {day} for month {month}")),
            start,
        ));
    }

    cursor.advance(10);
    Ok(LocalDate { year, month, day: day as u8 })
}

fn parse_time(cursor: &mut Cursor<'_>, start: Position) -> Result<LocalTime> {
    let ok = (0..8).all(|i| cursor.peek(i).is_some())
        && cursor.peek(0).unwrap().is_ascii_digit()
        && cursor.peek(1).unwrap().is_ascii_digit()
        && cursor.peek(2) == Some(b':')
        && cursor.peek(3).unwrap().is_ascii_digit()
        && cursor.peek(4).unwrap().is_ascii_digit()
        && cursor.peek(5) == Some(b':')
        && cursor.peek(6).unwrap().is_ascii_digit()
        && cursor.peek(7).unwrap().is_ascii_digit();
    if !ok {
        return Err(Error::lex(LexErrorKind::InvalidTime("expected HH:MM:SS".into()), start));
    }

    let hour = two_digits(cursor, 0);
    let minute = two_digits(cursor, 3);
    let second = two_digits(cursor, 6);

    if hour > 23 {
        return Err(Error::lex(LexErrorKind::InvalidTime(format!("invalid hour {hour}")), start));
    }
    if minute > 59 {
        return Err(Error::lex(LexErrorKind::InvalidTime(format!("invalid minute {minute}")), start));
    }
    if second > 59 {
        return Err(Error::lex(
            LexErrorKind::InvalidTime(format!("invalid second {second} (leap seconds are not supported)")),
            start,
        ));
    }

    cursor.advance(8);

    let mut nanosecond = 0u32;
    let mut frac_digits = 0u8;
    if cursor.peek0() == Some(b'.') && cursor.peek(1).is_some_and(|b| b.is_ascii_digit()) {
        cursor.advance(1);
        let frac_start = cursor.offset();
        while cursor.peek0().is_some_and(|b| b.is_ascii_digit()) {
            cursor.advance(1);
        }
        let frac_end = cursor.offset();
        let frac_str = &cursor.source()[frac_start..frac_end];
        let kept = frac_str.len().min(9);
        frac_digits = kept as u8;
        let mut nanos_str = frac_str[..kept].to_string();
        while nanos_str.len() < 9 {
            nanos_str.push('0');
        }
        nanosecond = nanos_str.parse().unwrap_or(0);
    }

    Ok(LocalTime { hour: hour as u8, minute: minute as u8, second: second as u8, nanosecond, frac_digits })
}

fn parse_offset(cursor: &mut Cursor<'_>, start: Position) -> Result<Option<Offset>> {
    match cursor.peek0() {
        Some(b'Z') | Some(b'z') => {
            cursor.advance(1);
            Ok(Some(Offset { minutes: 0, is_z: true }))
        }
        Some(sign @ (b'+' | b'-')) => {
            let ok = cursor.peek(1).is_some_and(|b| b.is_ascii_digit())
                && cursor.peek(2).is_some_and(|b| b.is_ascii_digit())
                && cursor.peek(3) == Some(b':')
                && cursor.peek(4).is_some_and(|b| b.is_ascii_digit())
                && cursor.peek(5).is_some_and(|b| b.is_ascii_digit());
            if !ok {
                return Err(Error::lex(LexErrorKind::InvalidDateTime("invalid offset".into()), start));
            }
            let hour = two_digits(cursor, 1);
            let minute = two_digits(cursor, 4);
            if hour > 23 || minute > 59 {
                return Err(Error::lex(LexErrorKind::InvalidDateTime("invalid offset".into()), start));
            }
            cursor.advance(6);
            let magnitude = (hour * 60 + minute) as i16;
            Ok(Some(Offset { minutes: if sign == b'-' { -magnitude } else { magnitude }, is_z: false }))
        }
        _ => Ok(None),
    }
}
