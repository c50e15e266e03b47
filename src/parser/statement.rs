//! Statement parsing: one TOML line is a blank line, a comment, a
//! `[header]`, a `[[header]]`, or a `key = value` assignment.

use super::expr;
use crate::builder::Builder;
use crate::cursor::Cursor;
use crate::depth::DepthBudget;
use crate::error::{Error, LexErrorKind, Result};
use crate::lex;

/// Parses every statement in `cursor` into `builder`.
pub fn parse_document(cursor: &mut Cursor<'_>, builder: &mut Builder, depth: &mut DepthBudget) -> Result<()> {
    loop {
        lex::skip_whitespace(cursor);
        if cursor.at_eof() {
            return Ok(());
        }
        if lex::eat_newline(cursor) {
            continue;
        }
        if lex::skip_comment(cursor)? {
            expect_line_end(cursor)?;
            continue;
        }

        if cursor.starts_with("[[") {
            parse_array_table_header(cursor, builder)?;
        } else if cursor.peek0() == Some(b'[') {
            parse_table_header(cursor, builder)?;
        } else {
            parse_key_value(cursor, builder, depth)?;
        }
        end_of_statement(cursor)?;
    }
}

/// After a statement, only whitespace, an optional comment, and a newline
/// (or EOF) may follow on the same line.
fn end_of_statement(cursor: &mut Cursor<'_>) -> Result<()> {
    lex::skip_whitespace(cursor);
    lex::skip_comment(cursor)?;
    expect_line_end(cursor)
}

fn expect_line_end(cursor: &mut Cursor<'_>) -> Result<()> {
    if cursor.at_eof() || lex::eat_newline(cursor) {
        return Ok(());
    }
    Err(unexpected(cursor))
}

fn unexpected(cursor: &Cursor<'_>) -> Error {
    let c = cursor.remainder().chars().next().unwrap_or('\0');
    Error::lex(LexErrorKind::UnexpectedCharacter(c), cursor.position())
}

fn parse_table_header(cursor: &mut Cursor<'_>, builder: &mut Builder) -> Result<()> {
    let position = cursor.position();
    cursor.advance(1); // '['
    lex::skip_whitespace(cursor);
    let path = expr::parse_dotted_key(cursor)?;
    lex::skip_whitespace(cursor);
    if cursor.peek0() != Some(b']') {
        return Err(unexpected(cursor));
    }
    cursor.advance(1);
    builder.open_table_header(&path, position)
}

fn parse_array_table_header(cursor: &mut Cursor<'_>, builder: &mut Builder) -> Result<()> {
    let position = cursor.position();
    cursor.advance(2); // '[['
    lex::skip_whitespace(cursor);
    let path = expr::parse_dotted_key(cursor)?;
    lex::skip_whitespace(cursor);
    if !cursor.starts_with("]]") {
        return Err(unexpected(cursor));
    }
    cursor.advance(2);
    builder.open_array_table_header(&path, position)
}

fn parse_key_value(cursor: &mut Cursor<'_>, builder: &mut Builder, depth: &mut DepthBudget) -> Result<()> {
    let path = expr::parse_dotted_key(cursor)?;
    lex::skip_whitespace(cursor);
    if cursor.peek0() != Some(b'=') {
        return Err(unexpected(cursor));
    }
    let position = cursor.position();
    cursor.advance(1);
    lex::skip_whitespace(cursor);
    let value = expr::parse_value(cursor, depth)?;
    builder.assign(&path, value, position)
}
