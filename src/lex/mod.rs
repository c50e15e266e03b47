//! Lexical recognizers: pure functions that, at a given cursor position,
//! recognize and consume one lexical form and return a decoded value or a
//! typed error. None of these perform table-building.

pub mod datetime;
pub mod numbers;
pub mod strings;

use crate::cursor::Cursor;
use crate::error::{Error, LexErrorKind, Result};

#[inline]
pub(crate) fn is_whitespace(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

#[inline]
pub(crate) fn is_bare_key_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Skips whitespace (not newlines) at the cursor.
pub fn skip_whitespace(cursor: &mut Cursor<'_>) {
    while let Some(b) = cursor.peek0() {
        if is_whitespace(b) {
            cursor.advance(1);
        } else {
            break;
        }
    }
}

/// Skips a single newline (`\n` or `\r\n`) if present, returning whether one
/// was consumed. A bare `\r` not followed by `\n` is left untouched for the
/// caller to reject: a lone carriage return outside a string is a lexical
/// error.
pub fn eat_newline(cursor: &mut Cursor<'_>) -> bool {
    if cursor.eat_str("\r\n") {
        return true;
    }
    if cursor.peek0() == Some(b'\n') {
        cursor.advance(1);
        return true;
    }
    false
}

/// Skips a `#`-comment up to (not including) the next newline or EOF.
/// Returns whether a comment was present. Control characters other than
/// tab are forbidden inside a comment, same as in a basic string.
pub fn skip_comment(cursor: &mut Cursor<'_>) -> Result<bool> {
    if cursor.peek0() != Some(b'#') {
        return Ok(false);
    }
    loop {
        let Some(c) = cursor.remainder().chars().next() else { break };
        if c == '\n' || c == '\r' {
            break;
        }
        if c != '\t' && c.is_control() {
            return Err(Error::lex(LexErrorKind::ControlCharacter(c), cursor.position()));
        }
        cursor.advance(c.len_utf8());
    }
    Ok(true)
}
