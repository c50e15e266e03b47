//! Tree builder: turns header/array-header/assignment operations into
//! mutations of a typed `Table` tree, enforcing the cross-statement
//! invariants on dotted keys, explicit/implicit tables, and arrays of
//! tables.
//!
//! Builds and mutates typed `Value::Table`/`Value::Array` trees directly,
//! tracking `explicit`/`closed`/`inline`/`sealed` bookkeeping on each table.
//! The builder re-navigates from the root on every operation rather than
//! holding a stack of live frame references: the tree is a plain owned
//! `Table`, so holding `&mut` references across statements would fight the
//! borrow checker for no real benefit at TOML's nesting scale.

use crate::depth::MAX_DEPTH;
use crate::error::{Error, Position, Result, SemanticErrorKind};
use crate::value::{Array, Table, Value};

fn semantic(kind: SemanticErrorKind, position: Position, path: &[String]) -> Error {
    Error::semantic(kind, position, path.join("."))
}

/// Builds a `Table` tree from a stream of header/array-header/assignment
/// operations, as produced by the statement parser.
pub struct Builder {
    root: Table,
    /// Key path, from the root, of the table currently open for top-level
    /// key/value statements. Re-resolved on every operation rather than
    /// held as a live reference.
    current_path: Vec<String>,
}

impl Builder {
    pub fn new() -> Self {
        Self { root: Table::new(), current_path: Vec::new() }
    }

    pub fn finish(self) -> Table {
        self.root
    }

    fn check_depth(&self, len: usize, position: Position) -> Result<()> {
        if len > MAX_DEPTH {
            return Err(Error::semantic(SemanticErrorKind::NestingTooDeep { max: MAX_DEPTH }, position, ""));
        }
        Ok(())
    }

    /// `[a.b.c]`: opens (creating if absent, or promoting an existing
    /// implicit table) the table at `path` as the new insertion point.
    pub fn open_table_header(&mut self, path: &[String], position: Position) -> Result<()> {
        log::trace!("table header [{}] at {position}", path.join("."));
        self.check_depth(path.len(), position)?;
        if path.is_empty() {
            return Err(semantic(SemanticErrorKind::EmptyKey, position, path));
        }
        self.close_current();

        let (init, last) = path.split_at(path.len() - 1);
        let last_key = &last[0];

        let mut table = &mut self.root;
        for i in 0..init.len() {
            table = descend_create(table, &init[i], position, &path[..=i], false)?;
        }

        if !table.contains_key(last_key) {
            let mut t = Table::new();
            t.explicit = true;
            table.insert(last_key.clone(), Value::Table(t));
        } else {
            match table.get_mut(last_key).expect("just checked") {
                Value::Table(t) => {
                    if t.inline {
                        return Err(semantic(SemanticErrorKind::ExtendedInlineTable, position, path));
                    }
                    if t.explicit || t.sealed {
                        return Err(semantic(SemanticErrorKind::RedefinedTable, position, path));
                    }
                    t.explicit = true;
                }
                Value::Array(a) if a.is_array_of_tables() => {
                    return Err(semantic(
                        SemanticErrorKind::TypeConflict { expected: "table", found: "array" },
                        position,
                        path,
                    ));
                }
                other => {
                    return Err(semantic(
                        SemanticErrorKind::TypeConflict { expected: "table", found: other.type_str() },
                        position,
                        path,
                    ));
                }
            }
        }

        self.current_path = path.to_vec();
        Ok(())
    }

    /// `[[a.b.c]]`: appends a new table to the array of tables at `path`
    /// (creating the array if absent) as the new insertion point.
    pub fn open_array_table_header(&mut self, path: &[String], position: Position) -> Result<()> {
        log::trace!("array-of-tables header [[{}]] at {position}", path.join("."));
        self.check_depth(path.len(), position)?;
        if path.is_empty() {
            return Err(semantic(SemanticErrorKind::EmptyKey, position, path));
        }
        self.close_current();

        let (init, last) = path.split_at(path.len() - 1);
        let last_key = &last[0];

        let mut table = &mut self.root;
        for i in 0..init.len() {
            table = descend_create(table, &init[i], position, &path[..=i], false)?;
        }

        if !table.contains_key(last_key) {
            let mut array = Array::new();
            array.is_array_of_tables = true;
            let mut t = Table::new();
            t.explicit = true;
            array.push(Value::Table(t));
            table.insert(last_key.clone(), Value::Array(array));
        } else {
            match table.get_mut(last_key).expect("just checked") {
                Value::Array(a) if a.is_array_of_tables() && !a.is_inline() => {
                    let mut t = Table::new();
                    t.explicit = true;
                    a.push(Value::Table(t));
                    log::debug!("appended element {} to array of tables `{}`", a.len(), path.join("."));
                }
                Value::Array(_) => {
                    return Err(semantic(SemanticErrorKind::ExtendedInlineArray, position, path));
                }
                other => {
                    return Err(semantic(
                        SemanticErrorKind::TypeConflict { expected: "array of tables", found: other.type_str() },
                        position,
                        path,
                    ));
                }
            }
        }

        self.current_path = path.to_vec();
        Ok(())
    }

    /// `key.path = value`, relative to the current insertion point.
    pub fn assign(&mut self, key_path: &[String], value: Value, position: Position) -> Result<()> {
        if key_path.is_empty() {
            return Err(semantic(SemanticErrorKind::EmptyKey, position, key_path));
        }
        self.check_depth(self.current_path.len() + key_path.len(), position)?;

        let mut full_path = self.current_path.clone();
        let mut table = &mut self.root;
        for i in 0..self.current_path.len() {
            table = descend_create(table, &self.current_path[i], position, &full_path[..=i], false)?;
        }

        let (intermediate, last) = key_path.split_at(key_path.len() - 1);
        let last_key = &last[0];

        for key in intermediate {
            full_path.push(key.clone());
            table = descend_create(table, key, position, &full_path, true)?;
        }

        full_path.push(last_key.clone());
        if table.contains_key(last_key) {
            let kind = match table.get(last_key) {
                Some(Value::Table(_)) => SemanticErrorKind::ValueIsTable,
                _ => SemanticErrorKind::DuplicateKey,
            };
            return Err(semantic(kind, position, &full_path));
        }
        table.insert(last_key.clone(), value);
        Ok(())
    }

    /// Marks the table at the current insertion point closed: no more
    /// top-level dotted-key statements may extend it once a later header
    /// moves the insertion point elsewhere.
    fn close_current(&mut self) {
        if self.current_path.is_empty() {
            return;
        }
        let mut table = &mut self.root;
        for key in &self.current_path {
            match table.get_mut(key) {
                Some(Value::Table(t)) => table = t,
                Some(Value::Array(a)) => match a.last_mut() {
                    Some(Value::Table(t)) => table = t,
                    _ => return,
                },
                _ => return,
            }
        }
        table.closed = true;
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// Descends one key into `table`, creating an implicit table if the key is
/// absent, descending into the last element if the key holds an array of
/// tables, and erroring on any other shape. When `seal` is set (dotted-key
/// traversal), marks the descended-into table `sealed` per invariant 6:
/// once a dotted key has written through it, no later `[header]` may target
/// it directly.
fn descend_create<'a>(
    table: &'a mut Table,
    key: &str,
    position: Position,
    path_so_far: &[String],
    seal: bool,
) -> Result<&'a mut Table> {
    if !table.contains_key(key) {
        table.insert(key.to_string(), Value::Table(Table::new()));
    }
    let result = match table.get_mut(key).expect("just inserted or already present") {
        Value::Table(t) => {
            if t.inline {
                return Err(semantic(SemanticErrorKind::ExtendedInlineTable, position, path_so_far));
            }
            t
        }
        Value::Array(a) if a.is_array_of_tables() && !a.is_inline() => match a.last_mut() {
            Some(Value::Table(t)) => t,
            _ => return Err(semantic(SemanticErrorKind::TableIsValue, position, path_so_far)),
        },
        other => {
            return Err(semantic(
                SemanticErrorKind::TypeConflict { expected: "table", found: other.type_str() },
                position,
                path_so_far,
            ));
        }
    };
    if seal {
        result.sealed = true;
    }
    Ok(result)
}
