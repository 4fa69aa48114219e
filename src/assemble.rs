//! Builds the table tree from the flat list of top-level expressions.
//!
//! Headers set the current context path, key-value pairs are inserted below
//! it. Every table remembers how it was created, which decides whether a
//! later header or dotted key may extend or redefine it.

use tracing::trace;

use crate::error::{Error, ErrorKind};
use crate::grammar::{DottedKey, RawValue, TopLevel};
use crate::scalar::is_bare_key;
use crate::span::{Span, Spanned};
use crate::table::{Table, TableKind};
use crate::value::{Item, Key, Value};

#[cfg(test)]
#[path = "./assemble_tests.rs"]
mod tests;

type Path<'a> = [&'a Spanned<String>];

/// What to place at the end of a path.
enum Action {
    Value(Value),
    Table,
    ArrayTable,
}

pub(crate) struct Assembler {
    root: Table,
    /// Path of the most recent header, key-value pairs are placed below it.
    context: DottedKey,
    errors: Vec<Error>,
}

impl Assembler {
    pub(crate) fn new() -> Assembler {
        Assembler {
            root: Table::with_kind(TableKind::Header),
            context: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, entry: TopLevel) {
        let result = match entry {
            TopLevel::KeyValue(key, raw) => {
                let value = match convert(raw, &mut self.errors) {
                    Ok(value) => value,
                    Err(err) => {
                        self.errors.push(err);
                        return;
                    }
                };
                let path: Vec<&Spanned<String>> = self.context.iter().chain(&key).collect();
                insert(&mut self.root, &path, 0, self.context.len(), Action::Value(value))
            }
            TopLevel::Table(key) => {
                trace!(path = %display_path(&key), "table header");
                self.context = key;
                let path: Vec<&Spanned<String>> = self.context.iter().collect();
                insert(&mut self.root, &path, 0, path.len(), Action::Table)
            }
            TopLevel::ArrayTable(key) => {
                trace!(path = %display_path(&key), "array of tables header");
                self.context = key;
                let path: Vec<&Spanned<String>> = self.context.iter().collect();
                insert(&mut self.root, &path, 0, path.len(), Action::ArrayTable)
            }
            TopLevel::StructuralError(span, reason) => {
                Err(Error::from((ErrorKind::Structure(reason), span)))
            }
            TopLevel::ValueError(span, reason) => {
                Err(Error::from((ErrorKind::Value(reason), span)))
            }
        };
        if let Err(err) = result {
            self.errors.push(err);
        }
    }

    /// The assembled root table, or every error collected along the way in
    /// source order.
    pub(crate) fn finish(self) -> Result<Table, Vec<Error>> {
        let mut errors = self.errors;
        if errors.is_empty() {
            return Ok(self.root);
        }
        errors.sort_by_key(|err| err.span.start);
        Err(errors)
    }
}

/// Turns a parsed literal into a value. Inline tables are assembled on their
/// own, conflicts inside them are added to `errors`.
fn convert(raw: RawValue, errors: &mut Vec<Error>) -> Result<Value, Error> {
    let value = match raw {
        RawValue::String(s) => Value::String(s),
        RawValue::Boolean(b) => Value::Boolean(b),
        RawValue::Integer(i) => Value::Integer(i),
        RawValue::Float(f) => Value::Float(f),
        RawValue::LocalDate(date) => Value::LocalDate(date),
        RawValue::LocalTime(time) => Value::LocalTime(time),
        RawValue::LocalDateTime(dt) => Value::LocalDateTime(dt),
        RawValue::OffsetDateTime(dt) => Value::OffsetDateTime(dt),
        RawValue::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(convert(item, errors)?);
            }
            Value::Array(values)
        }
        RawValue::InlineTable(entries) => {
            let mut table = Table::with_kind(TableKind::Inline);
            for (key, raw) in entries {
                let value = convert(raw, errors)?;
                let path: Vec<&Spanned<String>> = key.iter().collect();
                if let Err(err) = insert(&mut table, &path, 0, 0, Action::Value(value)) {
                    errors.push(err);
                }
            }
            Value::Table(table)
        }
        RawValue::Error(span, reason) => return Err(Error::from((ErrorKind::Value(reason), span))),
    };
    Ok(value)
}

/// Places `action` at `path[i..]` below `table`.
///
/// The first `header_len` segments were written in a header and navigate
/// like one: they pass through any standard table and into the last table of
/// an array of tables. The remaining segments are dotted keys, which may only
/// pass through implicit or dotted tables.
fn insert(
    table: &mut Table,
    path: &Path<'_>,
    i: usize,
    header_len: usize,
    action: Action,
) -> Result<(), Error> {
    let segment = path[i];
    let found = table.find_index(&segment.value);
    if i + 1 == path.len() {
        return place(table, path, found, action);
    }

    let header_style = i < header_len;
    let at = match found {
        Some(at) => at,
        None => {
            let kind = if header_style {
                TableKind::Implicit
            } else {
                TableKind::Dotted
            };
            table.insert(new_key(segment), Item::Table(Table::with_kind(kind)))
        }
    };

    let first = table.entry_at(at).0.span;
    let child = match table.item_at_mut(at) {
        Item::Table(child) if header_style || child.kind() != TableKind::Header => child,
        Item::ArrayOfTables(tables) if header_style => match tables.last_mut() {
            Some(last) => last,
            None => return Err(conflict(&path[..=i], "array of tables", first)),
        },
        other => return Err(conflict(&path[..=i], other.type_str(), first)),
    };
    insert(child, path, i + 1, header_len, action)
}

/// Handles the final segment of a path.
fn place(
    table: &mut Table,
    path: &Path<'_>,
    found: Option<usize>,
    action: Action,
) -> Result<(), Error> {
    let segment = path[path.len() - 1];
    let Some(at) = found else {
        let item = match action {
            Action::Value(value) => Item::Value(value),
            Action::Table => Item::Table(Table::with_kind(TableKind::Header)),
            Action::ArrayTable => Item::ArrayOfTables(vec![Table::with_kind(TableKind::Header)]),
        };
        table.insert(new_key(segment), item);
        return Ok(());
    };

    let first = table.entry_at(at).0.span;
    match (action, table.item_at_mut(at)) {
        // a header may claim a table that so far only existed as a parent
        (Action::Table, Item::Table(existing)) if existing.kind() == TableKind::Implicit => {
            existing.set_kind(TableKind::Header);
            Ok(())
        }
        (Action::ArrayTable, Item::ArrayOfTables(tables)) => {
            tables.push(Table::with_kind(TableKind::Header));
            Ok(())
        }
        (_, existing) => Err(conflict(path, existing.type_str(), first)),
    }
}

fn new_key(segment: &Spanned<String>) -> Key {
    Key {
        name: segment.value.clone(),
        span: segment.span,
    }
}

/// A conflict at the last segment of `path`.
fn conflict(path: &Path<'_>, existing: &'static str, first: Span) -> Error {
    let span = path.last().map_or(Span::default(), |segment| segment.span);
    let path = display_path(path.iter().copied());
    trace!(%path, existing, "conflicting definition");
    Error::from((
        ErrorKind::Conflict {
            path,
            existing,
            first,
        },
        span,
    ))
}

/// Renders a dotted path the way it could be written in a document.
fn display_path<'a>(segments: impl IntoIterator<Item = &'a Spanned<String>>) -> String {
    let mut out = String::new();
    for segment in segments {
        if !out.is_empty() {
            out.push('.');
        }
        if is_bare_key(&segment.value) {
            out.push_str(&segment.value);
        } else {
            out.push('"');
            for ch in segment.value.chars() {
                match ch {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    _ => out.push(ch),
                }
            }
            out.push('"');
        }
    }
    out
}
