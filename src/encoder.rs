//! Encoder: renders a `Table` tree back to TOML text by structural
//! recursion, byte-predicate string checks rather than regex.

use itertools::Itertools;

use crate::error::{Error, Result};
use crate::value::{Array, Table, Value};

/// Formatting knobs for the encoder.
#[derive(Debug, Clone)]
pub struct Options {
    /// When set, a string value matching one of the three datetime shapes
    /// is emitted as a bare date/time/datetime literal
    /// instead of a quoted string. Off by default: this crate's `Value`
    /// carries typed datetime variants, so the heuristic is only needed
    /// for trees built by a caller that chose to represent datetimes as
    /// strings.
    pub string_shaped_datetimes: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { string_shaped_datetimes: false }
    }
}

/// Encodes `table` as a complete TOML document using default `Options`.
pub fn encode(table: &Table) -> Result<String> {
    encode_with(table, &Options::default())
}

/// Encodes `table` as a complete TOML document.
pub fn encode_with(table: &Table, options: &Options) -> Result<String> {
    let mut lines = Vec::new();
    serialize_table_body(table, "", options, &mut lines)?;
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

fn is_bare_key(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(crate::lex::is_bare_key_char)
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn format_key(key: &str) -> Result<String> {
    if key.is_empty() {
        return Err(Error::Encode("empty key".into()));
    }
    if is_bare_key(key) {
        Ok(key.to_string())
    } else {
        Ok(format!("\"{}\"", escape_string(key)))
    }
}

/// Formats a finite float with enough precision to round-trip, preserving
/// the sign of zero. Rust's `{}` formatter already produces
/// the shortest round-tripping decimal; the only gap is that it omits a
/// fractional part for whole numbers, where TOML requires one.
fn format_finite_float(value: f64) -> String {
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0".to_string() } else { "0.0".to_string() };
    }
    let s = format!("{value}");
    if s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{s}.0")
    }
}

fn format_scalar(value: &Value, options: &Options) -> Result<String> {
    match value {
        Value::String(s) => {
            if options.string_shaped_datetimes {
                if let Some(literal) = string_shaped_datetime_literal(s) {
                    return Ok(literal);
                }
            }
            Ok(format!("\"{}\"", escape_string(s)))
        }
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => {
            if f.is_nan() {
                Ok(if f.is_sign_negative() { "-nan".to_string() } else { "nan".to_string() })
            } else if f.is_infinite() {
                Ok(if *f < 0.0 { "-inf".to_string() } else { "inf".to_string() })
            } else {
                Ok(format_finite_float(*f))
            }
        }
        Value::Boolean(b) => Ok(if *b { "true".to_string() } else { "false".to_string() }),
        Value::OffsetDateTime(dt) => Ok(dt.to_string()),
        Value::LocalDateTime(dt) => Ok(dt.to_string()),
        Value::LocalDate(d) => Ok(d.to_string()),
        Value::LocalTime(t) => Ok(t.to_string()),
        Value::Array(a) => format_array(a, options),
        Value::Table(t) => format_inline_table(t, options),
    }
}

fn format_array(array: &Array, options: &Options) -> Result<String> {
    let items = array
        .iter()
        .map(|v| format_scalar(v, options))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .join(", ");
    Ok(format!("[{items}]"))
}

fn format_inline_table(table: &Table, options: &Options) -> Result<String> {
    let pairs = table
        .iter()
        .map(|(k, v)| Ok(format!("{} = {}", format_key(k)?, format_scalar(v, options)?)))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .join(", ");
    Ok(format!("{{{pairs}}}"))
}

/// Partitions `table`'s entries into scalars, sub-tables, and
/// arrays-of-tables and emits each group in turn.
fn serialize_table_body(table: &Table, path_prefix: &str, options: &Options, out: &mut Vec<String>) -> Result<()> {
    let mut scalars = Vec::new();
    let mut tables = Vec::new();
    let mut array_tables = Vec::new();

    for (key, value) in table.iter() {
        if value.is_table() {
            tables.push((key, value));
        } else if value.renders_as_array_of_tables() {
            array_tables.push((key, value));
        } else {
            scalars.push((key, value));
        }
    }

    for (key, value) in &scalars {
        out.push(format!("{} = {}", format_key(key)?, format_scalar(value, options)?));
    }

    for (key, value) in &tables {
        let path = join_path(path_prefix, key);
        out.push(format!("[{path}]"));
        serialize_table_body(value.as_table().expect("checked is_table"), &path, options, out)?;
    }

    for (key, value) in &array_tables {
        let path = join_path(path_prefix, key);
        let array = value.as_array().expect("checked renders_as_array_of_tables");
        for element in array.iter() {
            out.push(format!("[[{path}]]"));
            let element_table = element.as_table().expect("renders_as_array_of_tables guarantees Table elements");
            serialize_table_body(element_table, &path, options, out)?;
        }
    }

    Ok(())
}

/// Builds the dotted path used in a `[header]`/`[[header]]` line. Key
/// segments that aren't bare are rendered as quoted strings, same as
/// `format_key`, so a header round-trips through the parser.
fn join_path(prefix: &str, key: &str) -> String {
    let quoted = if is_bare_key(key) { key.to_string() } else { format!("\"{}\"", escape_string(key)) };
    if prefix.is_empty() { quoted } else { format!("{prefix}.{quoted}") }
}

/// Tests `s` against the three datetime shapes
/// (`YYYY-MM-DD`, `HH:MM:SS[.frac]`, `YYYY-MM-DDTHH:MM:SS[.frac]`, the `T`
/// optionally a space or lowercase `t`), returning the bare literal to
/// emit on a match.
fn string_shaped_datetime_literal(s: &str) -> Option<String> {
    let bytes = s.as_bytes();

    let is_date = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes[0..4].iter().all(u8::is_ascii_digit)
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[8..10].iter().all(u8::is_ascii_digit);

    let is_time = bytes.len() >= 8
        && bytes[2] == b':'
        && bytes[5] == b':'
        && bytes[0..2].iter().all(u8::is_ascii_digit)
        && bytes[3..5].iter().all(u8::is_ascii_digit)
        && bytes[6..8].iter().all(u8::is_ascii_digit)
        && (bytes.len() == 8 || (bytes[8] == b'.' && bytes[9..].iter().all(u8::is_ascii_digit) && bytes.len() > 9));

    let is_local_datetime = bytes.len() >= 19
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && matches!(bytes[10], b'T' | b't' | b' ')
        && bytes[13] == b':'
        && bytes[16] == b':'
        && bytes[0..4].iter().all(u8::is_ascii_digit)
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[8..10].iter().all(u8::is_ascii_digit)
        && bytes[11..13].iter().all(u8::is_ascii_digit)
        && bytes[14..16].iter().all(u8::is_ascii_digit)
        && bytes[17..19].iter().all(u8::is_ascii_digit)
        && (bytes.len() == 19
            || (bytes.len() > 19 && bytes[19] == b'.' && bytes[20..].iter().all(u8::is_ascii_digit) && bytes.len() > 20));

    if is_local_datetime {
        let mut out = s.to_string();
        out.replace_range(10..11, "T");
        return Some(out);
    }
    if is_time && !is_local_datetime {
        return Some(s.to_string());
    }
    if is_date && !is_time {
        return Some(s[..10].to_string());
    }
    None
}
