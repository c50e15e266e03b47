//! String recognizers for all four TOML string forms: basic, literal,
//! multiline basic, and multiline literal.

use crate::cursor::Cursor;
use crate::error::{Error, LexErrorKind, Position, Result};

#[inline]
fn peek_char(cursor: &Cursor<'_>) -> Option<char> {
    cursor.remainder().chars().next()
}

fn is_forbidden_control(c: char) -> bool {
    c != '\t' && c.is_control()
}

/// Decodes a basic string `"…"`. The cursor must be positioned at the
/// opening quote.
pub fn lex_basic_string(cursor: &mut Cursor<'_>) -> Result<String> {
    let start = cursor.position();
    cursor.advance(1); // opening quote
    let mut out = String::new();
    loop {
        match peek_char(cursor) {
            None => return Err(Error::lex(LexErrorKind::UnterminatedString, start)),
            Some('"') => {
                cursor.advance(1);
                return Ok(out);
            }
            Some('\\') => {
                let esc_pos = cursor.position();
                cursor.advance(1);
                decode_escape(cursor, &mut out, esc_pos, start)?;
            }
            Some(c @ ('\n' | '\r')) => {
                return Err(Error::lex(LexErrorKind::ControlCharacter(c), cursor.position()));
            }
            Some(c) => {
                if is_forbidden_control(c) {
                    return Err(Error::lex(LexErrorKind::ControlCharacter(c), cursor.position()));
                }
                out.push(c);
                cursor.advance(c.len_utf8());
            }
        }
    }
}

/// Decodes a literal string `'…'`. No escapes; no newlines.
pub fn lex_literal_string(cursor: &mut Cursor<'_>) -> Result<String> {
    let start = cursor.position();
    cursor.advance(1); // opening quote
    let mut out = String::new();
    loop {
        match peek_char(cursor) {
            None => return Err(Error::lex(LexErrorKind::UnterminatedString, start)),
            Some('\'') => {
                cursor.advance(1);
                return Ok(out);
            }
            Some(c @ ('\n' | '\r')) => {
                return Err(Error::lex(LexErrorKind::ControlCharacter(c), cursor.position()));
            }
            Some(c) => {
                if is_forbidden_control(c) {
                    return Err(Error::lex(LexErrorKind::ControlCharacter(c), cursor.position()));
                }
                out.push(c);
                cursor.advance(c.len_utf8());
            }
        }
    }
}

/// Decodes a multiline basic string `"""…"""`. The cursor must be
/// positioned at the first opening quote.
pub fn lex_multiline_basic_string(cursor: &mut Cursor<'_>) -> Result<String> {
    let start = cursor.position();
    cursor.advance(3);
    trim_leading_newline(cursor);

    let mut out = String::new();
    loop {
        match peek_char(cursor) {
            None => return Err(Error::lex(LexErrorKind::UnterminatedString, start)),
            Some('"') => match consume_closing_quotes(cursor, '"', &mut out)? {
                true => return Ok(out),
                false => continue,
            },
            Some('\\') => {
                if try_consume_line_continuation(cursor) {
                    continue;
                }
                let esc_pos = cursor.position();
                cursor.advance(1);
                decode_escape(cursor, &mut out, esc_pos, start)?;
            }
            Some(c @ ('\n' | '\r')) => {
                out.push(c);
                cursor.advance(1);
            }
            Some(c) => {
                if is_forbidden_control(c) {
                    return Err(Error::lex(LexErrorKind::ControlCharacter(c), cursor.position()));
                }
                out.push(c);
                cursor.advance(c.len_utf8());
            }
        }
    }
}

/// Decodes a multiline literal string `'''…'''`. No escapes.
pub fn lex_multiline_literal_string(cursor: &mut Cursor<'_>) -> Result<String> {
    let start = cursor.position();
    cursor.advance(3);
    trim_leading_newline(cursor);

    let mut out = String::new();
    loop {
        match peek_char(cursor) {
            None => return Err(Error::lex(LexErrorKind::UnterminatedString, start)),
            Some('\'') => match consume_closing_quotes(cursor, '\'', &mut out)? {
                true => return Ok(out),
                false => continue,
            },
            Some(c @ ('\n' | '\r')) => {
                out.push(c);
                cursor.advance(1);
            }
            Some(c) => {
                if is_forbidden_control(c) {
                    return Err(Error::lex(LexErrorKind::ControlCharacter(c), cursor.position()));
                }
                out.push(c);
                cursor.advance(c.len_utf8());
            }
        }
    }
}

fn trim_leading_newline(cursor: &mut Cursor<'_>) {
    if cursor.eat_str("\r\n") {
        return;
    }
    cursor.eat_byte(b'\n');
}

/// Handles a run of quote characters inside a multiline string: up to two
/// trailing quotes before the real terminator are content.
/// Returns `Ok(true)` if the terminator was consumed (string is finished),
/// `Ok(false)` if the quotes were content and scanning should continue.
fn consume_closing_quotes(cursor: &mut Cursor<'_>, quote: char, out: &mut String) -> Result<bool> {
    let rest = cursor.remainder();
    let run = rest.chars().take_while(|&c| c == quote).count();

    if run < 3 {
        for _ in 0..run {
            out.push(quote);
        }
        cursor.advance(run);
        return Ok(false);
    }

    // 3 quotes close the string; up to 2 extra leading quotes are content.
    let extra = (run - 3).min(2);
    if run - 3 > 2 {
        return Err(Error::lex(LexErrorKind::UnterminatedString, cursor.position()));
    }
    for _ in 0..extra {
        out.push(quote);
    }
    cursor.advance(extra + 3);
    Ok(true)
}

/// If the cursor is at a line-ending backslash (backslash, then only
/// whitespace, then a newline), consumes the backslash and all following
/// whitespace/newlines up to the next non-whitespace character, and
/// returns `true`. Otherwise leaves the cursor untouched and returns
/// `false`.
fn try_consume_line_continuation(cursor: &mut Cursor<'_>) -> bool {
    let rest = cursor.remainder();
    debug_assert!(rest.starts_with('\\'));
    let after_backslash = &rest[1..];
    let ws_len = after_backslash.bytes().take_while(|&b| b == b' ' || b == b'\t').count();
    let after_ws = &after_backslash[ws_len..];
    if !(after_ws.starts_with('\n') || after_ws.starts_with("\r\n")) {
        return false;
    }

    cursor.advance(1); // backslash
    loop {
        let rest = cursor.remainder();
        let ws = rest.bytes().take_while(|&b| b == b' ' || b == b'\t').count();
        cursor.advance(ws);
        if cursor.eat_str("\r\n") || cursor.eat_byte(b'\n') {
            continue;
        }
        break;
    }
    true
}

fn decode_escape(
    cursor: &mut Cursor<'_>,
    out: &mut String,
    backslash_pos: Position,
    _string_start: Position,
) -> Result<()> {
    let Some(c) = peek_char(cursor) else {
        return Err(Error::lex(LexErrorKind::UnterminatedString, backslash_pos));
    };
    match c {
        'b' => {
            out.push('\u{8}');
            cursor.advance(1);
        }
        't' => {
            out.push('\t');
            cursor.advance(1);
        }
        'n' => {
            out.push('\n');
            cursor.advance(1);
        }
        'f' => {
            out.push('\u{c}');
            cursor.advance(1);
        }
        'r' => {
            out.push('\r');
            cursor.advance(1);
        }
        '"' => {
            out.push('"');
            cursor.advance(1);
        }
        '\\' => {
            out.push('\\');
            cursor.advance(1);
        }
        'u' => {
            cursor.advance(1);
            decode_unicode_escape(cursor, out, 4, backslash_pos)?;
        }
        'U' => {
            cursor.advance(1);
            decode_unicode_escape(cursor, out, 8, backslash_pos)?;
        }
        other => return Err(Error::lex(LexErrorKind::InvalidEscape(other), backslash_pos)),
    }
    Ok(())
}

fn decode_unicode_escape(
    cursor: &mut Cursor<'_>,
    out: &mut String,
    digits: usize,
    pos: Position,
) -> Result<()> {
    let mut hex = String::with_capacity(digits);
    for _ in 0..digits {
        match cursor.peek0() {
            Some(b) if b.is_ascii_hexdigit() => {
                hex.push(b as char);
                cursor.advance(1);
            }
            _ => return Err(Error::lex(LexErrorKind::InvalidUnicodeEscape(0), pos)),
        }
    }
    let code = u32::from_str_radix(&hex, 16).expect("validated hex digits");
    match char::from_u32(code) {
        Some(ch) => {
            out.push(ch);
            Ok(())
        }
        None => Err(Error::lex(LexErrorKind::InvalidUnicodeEscape(code), pos)),
    }
}

/// Recognizes a bare key (`[A-Za-z0-9_-]+`) at the cursor, returning its
/// text if non-empty.
pub fn lex_bare_key<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    let start = cursor.offset();
    while let Some(b) = cursor.peek0() {
        if super::is_bare_key_char(b) {
            cursor.advance(1);
        } else {
            break;
        }
    }
    let end = cursor.offset();
    if end == start { None } else { Some(&cursor.source()[start..end]) }
}
