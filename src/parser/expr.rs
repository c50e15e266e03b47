//! Value and key expression parsing: scalars, inline arrays, and inline
//! tables.
//!
//! Dispatches on the first byte, with a single-lookahead check to tell a
//! date/time literal apart from a plain number, and bounds recursive
//! array/inline-table parsing with `crate::depth::DepthBudget`.

use crate::cursor::Cursor;
use crate::depth::DepthBudget;
use crate::error::{Error, LexErrorKind, Result, SemanticErrorKind};
use crate::lex::{self, datetime, numbers, strings};
use crate::value::{Array, Table, Value};

/// Parses one dotted key (`a.b.c`), allowing whitespace around each `.`.
pub fn parse_dotted_key(cursor: &mut Cursor<'_>) -> Result<Vec<String>> {
    let mut segments = vec![parse_key_segment(cursor)?];
    loop {
        lex::skip_whitespace(cursor);
        if cursor.peek0() != Some(b'.') {
            break;
        }
        cursor.advance(1);
        lex::skip_whitespace(cursor);
        segments.push(parse_key_segment(cursor)?);
    }
    Ok(segments)
}

/// Parses one key segment: a bare key or a quoted (basic/literal) string.
pub fn parse_key_segment(cursor: &mut Cursor<'_>) -> Result<String> {
    match cursor.peek0() {
        Some(b'"') => strings::lex_basic_string(cursor),
        Some(b'\'') => strings::lex_literal_string(cursor),
        Some(b) if lex::is_bare_key_char(b) => Ok(strings::lex_bare_key(cursor)
            .expect("checked is_bare_key_char")
            .to_string()),
        _ => Err(Error::lex(LexErrorKind::UnexpectedCharacter(peek_char_or_eof(cursor)), cursor.position())),
    }
}

fn peek_char_or_eof(cursor: &Cursor<'_>) -> char {
    cursor.remainder().chars().next().unwrap_or('\0')
}

/// Parses one value: scalar, array, or inline table.
pub fn parse_value(cursor: &mut Cursor<'_>, depth: &mut DepthBudget) -> Result<Value> {
    match cursor.peek0() {
        Some(b'"') => {
            if cursor.starts_with("\"\"\"") {
                Ok(Value::String(strings::lex_multiline_basic_string(cursor)?))
            } else {
                Ok(Value::String(strings::lex_basic_string(cursor)?))
            }
        }
        Some(b'\'') => {
            if cursor.starts_with("'''") {
                Ok(Value::String(strings::lex_multiline_literal_string(cursor)?))
            } else {
                Ok(Value::String(strings::lex_literal_string(cursor)?))
            }
        }
        Some(b'[') => parse_array(cursor, depth),
        Some(b'{') => parse_inline_table(cursor, depth),
        Some(b't') | Some(b'f') => {
            numbers::lex_boolean(cursor).ok_or_else(|| unexpected(cursor))
        }
        Some(b'+') | Some(b'-') | Some(b'i') | Some(b'n') => numbers::lex_number(cursor),
        Some(b) if b.is_ascii_digit() => {
            if datetime::looks_like_date(cursor) || datetime::looks_like_time(cursor) {
                datetime::lex_date_or_time(cursor)
            } else {
                numbers::lex_number(cursor)
            }
        }
        _ => Err(unexpected(cursor)),
    }
}

fn unexpected(cursor: &Cursor<'_>) -> Error {
    Error::lex(LexErrorKind::UnexpectedCharacter(peek_char_or_eof(cursor)), cursor.position())
}

/// Parses `[ v1, v2, ... ]`, allowing newlines, comments, and a trailing
/// comma.
fn parse_array(cursor: &mut Cursor<'_>, depth: &mut DepthBudget) -> Result<Value> {
    let start = cursor.position();
    let mut guard = depth.enter(start)?;
    cursor.advance(1); // '['

    let mut array = Array::new();
    array.inline = true;
    loop {
        skip_array_separators(cursor)?;
        if cursor.peek0() == Some(b']') {
            cursor.advance(1);
            drop(guard);
            return Ok(Value::Array(array));
        }
        if cursor.at_eof() {
            return Err(Error::lex(LexErrorKind::UnexpectedEof, cursor.position()));
        }
        let mut inner = guard.budget().enter(cursor.position())?;
        let value = parse_value(cursor, inner.budget())?;
        drop(inner);
        array.push(value);
        skip_array_separators(cursor)?;
        match cursor.peek0() {
            Some(b',') => {
                cursor.advance(1);
            }
            Some(b']') => {}
            _ => {
                return Err(Error::lex(
                    LexErrorKind::UnexpectedCharacter(peek_char_or_eof(cursor)),
                    cursor.position(),
                ));
            }
        }
    }
}

fn skip_array_separators(cursor: &mut Cursor<'_>) -> Result<()> {
    loop {
        lex::skip_whitespace(cursor);
        if lex::skip_comment(cursor)? {
            continue;
        }
        if lex::eat_newline(cursor) {
            continue;
        }
        break;
    }
    Ok(())
}

/// Parses `{ k = v, ... }`. No newlines or comments are permitted inside an
/// inline table: only a single line of whitespace-separated `key = value`
/// pairs.
fn parse_inline_table(cursor: &mut Cursor<'_>, depth: &mut DepthBudget) -> Result<Value> {
    let start = cursor.position();
    let mut guard = depth.enter(start)?;
    cursor.advance(1); // '{'

    let mut table = Table::new();
    table.inline = true;
    table.closed = true;

    lex::skip_whitespace(cursor);
    if cursor.peek0() == Some(b'}') {
        cursor.advance(1);
        return Ok(Value::Table(table));
    }

    loop {
        lex::skip_whitespace(cursor);
        let path = parse_dotted_key(cursor)?;
        lex::skip_whitespace(cursor);
        if cursor.peek0() != Some(b'=') {
            return Err(Error::lex(LexErrorKind::UnexpectedCharacter(peek_char_or_eof(cursor)), cursor.position()));
        }
        cursor.advance(1);
        lex::skip_whitespace(cursor);
        let mut inner = guard.budget().enter(cursor.position())?;
        let value = parse_value(cursor, inner.budget())?;
        drop(inner);
        insert_inline_path(&mut table, &path, value, cursor)?;

        lex::skip_whitespace(cursor);
        match cursor.peek0() {
            Some(b',') => {
                cursor.advance(1);
            }
            Some(b'}') => {
                cursor.advance(1);
                return Ok(Value::Table(table));
            }
            _ => {
                return Err(Error::lex(
                    LexErrorKind::UnexpectedCharacter(peek_char_or_eof(cursor)),
                    cursor.position(),
                ));
            }
        }
    }
}

/// Inserts `value` at `path` inside an inline table literal, creating
/// intermediate implicit tables for dotted keys: `a.b = 1` inside `{ }` is
/// permitted and behaves like the top-level form.
fn insert_inline_path(table: &mut Table, path: &[String], value: Value, cursor: &Cursor<'_>) -> Result<()> {
    let (intermediate, last) = path.split_at(path.len() - 1);
    let mut current = table;
    for (i, key) in intermediate.iter().enumerate() {
        if !current.contains_key(key) {
            let mut t = Table::new();
            t.inline = true;
            current.insert(key.clone(), Value::Table(t));
        }
        match current.get_mut(key).expect("just inserted or present") {
            Value::Table(t) => current = t,
            other => {
                return Err(Error::semantic(
                    SemanticErrorKind::TypeConflict { expected: "table", found: other.type_str() },
                    cursor.position(),
                    path[..=i].join("."),
                ));
            }
        }
    }
    let last_key = &last[0];
    if current.contains_key(last_key) {
        return Err(Error::semantic(SemanticErrorKind::DuplicateKey, cursor.position(), path.join(".")));
    }
    current.insert(last_key.clone(), value);
    Ok(())
}
