//! Typed errors for the decoder and encoder.

use std::fmt;

/// A source position: byte offset plus 1-based line/column.
///
/// Columns count Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Lexical error kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("invalid escape sequence \\{0}")]
    InvalidEscape(char),
    #[error("invalid unicode escape \\u{{{0:x}}}")]
    InvalidUnicodeEscape(u32),
    #[error("control character {0:?} is not allowed here")]
    ControlCharacter(char),
    #[error("input is not valid UTF-8")]
    InvalidUtf8,
    #[error("invalid number literal: {0}")]
    InvalidNumber(String),
    #[error("integer literal overflows 64 bits")]
    IntegerOverflow,
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid time: {0}")]
    InvalidTime(String),
    #[error("invalid datetime: {0}")]
    InvalidDateTime(String),
    #[error("unexpected end of input")]
    UnexpectedEof,
}

/// Semantic (tree-building) error kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticErrorKind {
    #[error("duplicate key")]
    DuplicateKey,
    #[error("table already defined")]
    RedefinedTable,
    #[error("cannot extend an inline table from outside its literal")]
    ExtendedInlineTable,
    #[error("cannot extend an inline array from outside its literal")]
    ExtendedInlineArray,
    #[error("key is bound to a non-table value")]
    TableIsValue,
    #[error("key is bound to a table, not a value")]
    ValueIsTable,
    #[error("type conflict: expected {expected}, found {found}")]
    TypeConflict { expected: &'static str, found: &'static str },
    #[error("empty key is not allowed")]
    EmptyKey,
    #[error("nesting depth exceeds the maximum of {max}")]
    NestingTooDeep { max: usize },
}

/// Top-level decode/encode error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind} at {position}")]
    Lex { kind: LexErrorKind, position: Position },

    #[error("{kind} at {position} (path: {path})")]
    Semantic { kind: SemanticErrorKind, position: Position, path: String },

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode error: {0}")]
    Encode(String),
}

impl Error {
    pub fn lex(kind: LexErrorKind, position: Position) -> Self {
        Error::Lex { kind, position }
    }

    pub fn semantic(kind: SemanticErrorKind, position: Position, path: impl Into<String>) -> Self {
        Error::Semantic { kind, position, path: path.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
