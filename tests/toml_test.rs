//! Conformance harness: decodes the curated `toml-test`-shaped fixtures
//! under `tests/fixtures/toml-test/` and checks `valid/*.toml` against a
//! tagged-JSON sidecar, `invalid/*.toml` against rejection.
//!
//! Walks the fixture directory with `WalkDir` and an extension filter,
//! comparing each decoded value against the tagged-JSON encoding used by
//! the upstream `toml-test` suite. This crate vendors a small
//! representative fixture set rather than the full upstream suite (no
//! git submodule / network checkout in this exercise).

use std::fs;
use std::path::Path;

use toml_rt::Value;
use walkdir::WalkDir;

const FIXTURE_DIR: &str = "tests/fixtures/toml-test";

/// A minimal JSON value, just expressive enough for the toml-test tagged
/// format: objects, arrays, and strings (every leaf "type"/"value" pair is
/// string-keyed). No numbers or booleans appear at the JSON level since
/// tagged scalars are always `{"type": ..., "value": "<string>"}`.
#[derive(Debug, Clone, PartialEq)]
enum Json {
    Object(Vec<(String, Json)>),
    Array(Vec<Json>),
    String(String),
}

impl Json {
    fn get(&self, key: &str) -> Option<&Json> {
        match self {
            Json::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            Json::String(s) => Some(s),
            _ => None,
        }
    }
}

struct JsonParser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> JsonParser<'a> {
    fn new(text: &'a str) -> Self {
        Self { bytes: text.as_bytes(), pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, b: u8) {
        assert_eq!(self.peek(), Some(b), "expected {:?} at byte {}", b as char, self.pos);
        self.pos += 1;
    }

    fn parse_value(&mut self) -> Json {
        self.skip_whitespace();
        match self.peek() {
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => Json::String(self.parse_string()),
            other => panic!("unexpected JSON byte {other:?} at {}", self.pos),
        }
    }

    fn parse_object(&mut self) -> Json {
        self.expect(b'{');
        let mut entries = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Json::Object(entries);
        }
        loop {
            self.skip_whitespace();
            let key = self.parse_string();
            self.skip_whitespace();
            self.expect(b':');
            let value = self.parse_value();
            entries.push((key, value));
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                }
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                other => panic!("expected ',' or '}}', found {other:?}"),
            }
        }
        Json::Object(entries)
    }

    fn parse_array(&mut self) -> Json {
        self.expect(b'[');
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Json::Array(items);
        }
        loop {
            items.push(self.parse_value());
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                }
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                other => panic!("expected ',' or ']', found {other:?}"),
            }
        }
        Json::Array(items)
    }

    fn parse_string(&mut self) -> String {
        self.expect(b'"');
        let mut out = String::new();
        loop {
            match self.peek() {
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    match self.peek() {
                        Some(b'n') => out.push('\n'),
                        Some(b't') => out.push('\t'),
                        Some(b'r') => out.push('\r'),
                        Some(b'"') => out.push('"'),
                        Some(b'\\') => out.push('\\'),
                        Some(other) => out.push(other as char),
                        None => panic!("unterminated escape in JSON string"),
                    }
                    self.pos += 1;
                }
                Some(_) => {
                    let rest = std::str::from_utf8(&self.bytes[self.pos..]).expect("valid utf8");
                    let c = rest.chars().next().expect("non-empty");
                    out.push(c);
                    self.pos += c.len_utf8();
                }
                None => panic!("unterminated JSON string"),
            }
        }
        out
    }
}

fn parse_json(text: &str) -> Json {
    let mut parser = JsonParser::new(text);
    let value = parser.parse_value();
    parser.skip_whitespace();
    assert!(parser.pos >= parser.bytes.len(), "trailing JSON content");
    value
}

/// Parses a float's textual JSON representation the way the tagged format
/// encodes it, treating NaN as equal to NaN for comparison purposes.
fn float_eq(actual: f64, expected_text: &str) -> bool {
    match expected_text {
        "nan" | "-nan" | "+nan" => actual.is_nan(),
        "inf" | "+inf" => actual == f64::INFINITY,
        "-inf" => actual == f64::NEG_INFINITY,
        text => text.parse::<f64>().is_ok_and(|expected| expected == actual),
    }
}

/// Compares a decoded `Value` against its tagged-JSON description.
fn matches_tagged(value: &Value, json: &Json) -> bool {
    match json {
        Json::Object(entries) if entries.iter().any(|(k, _)| k == "type") => {
            let ty = json.get("type").and_then(Json::as_str).expect("tagged value has a type");
            let text = json.get("value").and_then(Json::as_str).expect("tagged value has a value");
            match (ty, value) {
                ("string", Value::String(s)) => s == text,
                ("integer", Value::Integer(i)) => i.to_string() == text,
                ("float", Value::Float(f)) => float_eq(*f, text),
                ("bool", Value::Boolean(b)) => b.to_string() == text,
                ("datetime", Value::OffsetDateTime(dt)) => dt.to_string() == text,
                ("datetime-local", Value::LocalDateTime(dt)) => dt.to_string() == text,
                ("date-local", Value::LocalDate(d)) => d.to_string() == text,
                ("time-local", Value::LocalTime(t)) => t.to_string() == text,
                _ => false,
            }
        }
        Json::Array(items) => match value {
            Value::Array(a) => {
                a.len() == items.len() && a.iter().zip(items).all(|(v, j)| matches_tagged(v, j))
            }
            _ => false,
        },
        Json::Object(entries) => match value {
            Value::Table(t) => {
                t.len() == entries.len()
                    && entries.iter().all(|(k, j)| t.get(k).is_some_and(|v| matches_tagged(v, j)))
            }
            _ => false,
        },
        Json::String(_) => false,
    }
}

fn toml_files(dir: &str) -> impl Iterator<Item = walkdir::DirEntry> {
    let path = Path::new(FIXTURE_DIR).join(dir);
    assert!(path.exists(), "fixture directory not found at {}", path.display());
    WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "toml"))
}

#[test]
fn valid_fixtures_match_tagged_json() {
    let mut failures = Vec::new();

    for entry in toml_files("valid") {
        let path = entry.path();
        let source = fs::read_to_string(path).unwrap();
        let json_path = path.with_extension("json");
        let json_text = fs::read_to_string(&json_path)
            .unwrap_or_else(|_| panic!("missing sidecar {}", json_path.display()));
        let expected = parse_json(&json_text);

        match toml_rt::loads(&source) {
            Ok(table) => {
                if !matches_tagged(&Value::Table(table), &expected) {
                    failures.push(format!("{}: decoded value did not match tagged JSON", path.display()));
                }
            }
            Err(err) => failures.push(format!("{}: expected to decode, got {err}", path.display())),
        }
    }

    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn invalid_fixtures_are_rejected() {
    let mut failures = Vec::new();

    for entry in toml_files("invalid") {
        let path = entry.path();
        let source = fs::read_to_string(path).unwrap();
        if toml_rt::loads(&source).is_ok() {
            failures.push(path.to_path_buf());
        }
    }

    assert!(failures.is_empty(), "expected parse errors for:\n{failures:#?}");
}
