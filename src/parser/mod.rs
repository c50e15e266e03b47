//! Expression and statement parsing: combines the lexical recognizers in
//! `crate::lex` with `crate::builder::Builder` to turn a complete TOML
//! document into a `Table` tree.
//!
//! A recursive-descent structure, one function per grammar production,
//! each taking a `&mut Cursor` and returning a value or a typed error.

mod expr;
mod statement;

use crate::builder::Builder;
use crate::cursor::Cursor;
use crate::error::Result;
use crate::value::Table;

/// Parses a complete TOML document into a `Table`.
pub fn parse(source: &str) -> Result<Table> {
    let mut cursor = Cursor::new(source);
    let mut builder = Builder::new();
    let mut depth = crate::depth::DepthBudget::default();
    statement::parse_document(&mut cursor, &mut builder, &mut depth)?;
    Ok(builder.finish())
}
