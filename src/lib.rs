//! A TOML 1.0.0 decoder and encoder.
//!
//! ```
//! let table = toml_rt::loads("name = \"example\"\nversion = 1\n").unwrap();
//! assert_eq!(table.get("name").unwrap().as_str(), Some("example"));
//! ```

mod builder;
mod cursor;
mod depth;
mod encoder;
mod error;
mod lex;
mod parser;
mod value;

use std::io::{Read, Write};
use std::path::Path;

pub use error::{Error, LexErrorKind, Position, Result, SemanticErrorKind};
pub use value::{Array, LocalDate, LocalDateTime, LocalTime, Offset, OffsetDateTime, Table, Value};

pub use encoder::Options;

/// Validates `bytes` as UTF-8 without allocating a second buffer on
/// success. Surfaces `InvalidUtf8` rather than letting a lossy or
/// `std::io`-flavored failure stand in for it, per the documented contract
/// that invalid UTF-8 input is rejected with that specific lexical error.
fn bytes_to_utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| Error::lex(LexErrorKind::InvalidUtf8, Position::default()))
}

/// Decodes a TOML document from a string, returning the root table.
pub fn loads(text: &str) -> Result<Table> {
    log::trace!("decoding {} bytes of TOML", text.len());
    let result = parser::parse(text);
    match &result {
        Ok(table) => log::debug!("decoded {} top-level keys", table.len()),
        Err(err) => log::debug!("decode failed: {err}"),
    }
    result
}

/// Reads `path` as UTF-8 and decodes it as TOML. Surfaces `FileNotFound` if
/// the path does not exist, `InvalidUtf8` if it isn't valid UTF-8, `Io` for
/// any other I/O failure.
pub fn load(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    log::trace!("loading TOML from {}", path.display());
    let bytes = std::fs::read(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path.display().to_string())
        } else {
            Error::Io(err)
        }
    })?;
    let text = bytes_to_utf8(bytes)?;
    loads(&text)
}

/// Reads all of `reader` and decodes it as UTF-8 TOML. Surfaces
/// `InvalidUtf8` if the bytes read aren't valid UTF-8.
pub fn load_reader(mut reader: impl Read) -> Result<Table> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = bytes_to_utf8(bytes)?;
    loads(&text)
}

/// Encodes `table` to a TOML document using default `Options`.
pub fn dumps(table: &Table) -> Result<String> {
    encoder::encode(table)
}

/// Encodes `table` to a TOML document using the given `Options`.
pub fn dumps_with(table: &Table, options: &Options) -> Result<String> {
    encoder::encode_with(table, options)
}

/// Encodes `table` and writes it to `path`, creating or truncating the file.
pub fn dump(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let text = dumps(table)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Encodes `table` and writes it to `writer`.
pub fn dump_writer(table: &Table, mut writer: impl Write) -> Result<()> {
    let text = dumps(table)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}
