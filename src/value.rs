//! Values, items and keys of an assembled document.

#[cfg(test)]
#[path = "./value_tests.rs"]
mod tests;

use crate::Span;
use crate::table::Table;
use crate::time::{Date, LocalDateTime, OffsetDateTime, Time};
use std::fmt;

/// A TOML value, as it appears on the right of `=` or inside an array.
///
/// Inline tables are values, tables created by headers or dotted keys are
/// [`Item::Table`]s instead.
///
/// # Examples
///
/// ```
/// use toml_tree::Value;
///
/// let table = toml_tree::parse("n = 10\nxs = [1, 'two']")?;
/// match table.get_value("n") {
///     Some(Value::Integer(n)) => assert_eq!(*n, 10),
///     other => panic!("expected integer, got {other:?}"),
/// }
/// let xs = table.get_array("xs").unwrap();
/// assert_eq!(xs[1].as_str(), Some("two"));
/// # Ok::<(), toml_tree::Diagnostics>(())
/// ```
#[derive(Clone, PartialEq)]
pub enum Value {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// A date and time with an offset from UTC.
    OffsetDateTime(OffsetDateTime),
    /// A date and time without an offset.
    LocalDateTime(LocalDateTime),
    /// A date without a time.
    LocalDate(Date),
    /// A time of day without a date.
    LocalTime(Time),
    /// An array of values, element types may be mixed.
    Array(Vec<Value>),
    /// An inline table, `{ k = v }`.
    Table(Table),
}

impl Value {
    /// Returns the TOML type name (e.g. `"string"`, `"integer"`, `"inline table"`).
    pub fn type_str(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::OffsetDateTime(_) => "offset datetime",
            Value::LocalDateTime(_) => "local datetime",
            Value::LocalDate(_) => "local date",
            Value::LocalTime(_) => "local time",
            Value::Array(_) => "array",
            Value::Table(_) => "inline table",
        }
    }

    /// Returns a borrowed string if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns an `i64` if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns an `f64` if this is a float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns a `bool` if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_offset_datetime(&self) -> Option<&OffsetDateTime> {
        match self {
            Value::OffsetDateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_local_datetime(&self) -> Option<&LocalDateTime> {
        match self {
            Value::LocalDateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_local_date(&self) -> Option<&Date> {
        match self {
            Value::LocalDate(date) => Some(date),
            _ => None,
        }
    }

    pub fn as_local_time(&self) -> Option<&Time> {
        match self {
            Value::LocalTime(time) => Some(time),
            _ => None,
        }
    }

    /// Returns the elements if this is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the table if this is an inline table.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => fmt::Debug::fmt(s, f),
            Value::Integer(i) => fmt::Debug::fmt(i, f),
            Value::Float(v) => fmt::Debug::fmt(v, f),
            Value::Boolean(b) => fmt::Debug::fmt(b, f),
            Value::OffsetDateTime(dt) => fmt::Display::fmt(dt, f),
            Value::LocalDateTime(dt) => fmt::Display::fmt(dt, f),
            Value::LocalDate(date) => fmt::Display::fmt(date, f),
            Value::LocalTime(time) => fmt::Display::fmt(time, f),
            Value::Array(a) => fmt::Debug::fmt(a, f),
            Value::Table(t) => fmt::Debug::fmt(t, f),
        }
    }
}

/// An entry of a [`Table`]: a value, a table, or an array of tables.
#[derive(Clone, PartialEq)]
pub enum Item {
    /// A value assigned with `key = value`.
    Value(Value),
    /// A table created by a `[header]`, a dotted key, or implicitly as the
    /// parent of either.
    Table(Table),
    /// Tables appended with repeated `[[header]]`s, in source order.
    ArrayOfTables(Vec<Table>),
}

impl Item {
    /// Returns the TOML type name (e.g. `"string"`, `"table"`, `"array of tables"`).
    pub fn type_str(&self) -> &'static str {
        match self {
            Item::Value(value) => value.type_str(),
            Item::Table(_) => "table",
            Item::ArrayOfTables(_) => "array of tables",
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Item::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the table, standard or inline.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Item::Table(table) | Item::Value(Value::Table(table)) => Some(table),
            _ => None,
        }
    }

    pub fn as_array_of_tables(&self) -> Option<&[Table]> {
        match self {
            Item::ArrayOfTables(tables) => Some(tables),
            _ => None,
        }
    }

    /// Returns a borrowed string if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// Returns an `i64` if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_integer)
    }

    /// Returns an `f64` if this is a float value.
    pub fn as_float(&self) -> Option<f64> {
        self.as_value().and_then(Value::as_float)
    }

    /// Returns a `bool` if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        self.as_value().and_then(Value::as_bool)
    }

    /// Returns the elements if this is an array value.
    pub fn as_array(&self) -> Option<&[Value]> {
        self.as_value().and_then(Value::as_array)
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Value(value) => fmt::Debug::fmt(value, f),
            Item::Table(table) => fmt::Debug::fmt(table, f),
            Item::ArrayOfTables(tables) => fmt::Debug::fmt(tables, f),
        }
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Item::Value(value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::String(s) => ser.serialize_str(s),
            Value::Integer(i) => ser.serialize_i64(*i),
            Value::Float(f) => ser.serialize_f64(*f),
            Value::Boolean(b) => ser.serialize_bool(*b),
            Value::OffsetDateTime(dt) => serde::Serialize::serialize(dt, ser),
            Value::LocalDateTime(dt) => serde::Serialize::serialize(dt, ser),
            Value::LocalDate(date) => serde::Serialize::serialize(date, ser),
            Value::LocalTime(time) => serde::Serialize::serialize(time, ser),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = ser.serialize_seq(Some(arr.len()))?;
                for ele in arr {
                    seq.serialize_element(ele)?;
                }
                seq.end()
            }
            Value::Table(tab) => serde::Serialize::serialize(tab, ser),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Item {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Item::Value(value) => serde::Serialize::serialize(value, ser),
            Item::Table(tab) => serde::Serialize::serialize(tab, ser),
            Item::ArrayOfTables(tables) => {
                use serde::ser::SerializeSeq;
                let mut seq = ser.serialize_seq(Some(tables.len()))?;
                for tab in tables {
                    seq.serialize_element(tab)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Table {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = ser.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(&*k.name, v)?;
        }
        map.end()
    }
}

/// A TOML table key with its source span.
///
/// Keys appear as the first element in `(`[`Key`]`, `[`Item`]`)` entry pairs
/// when iterating over a [`Table`]. The span is that of the segment which
/// first defined the key, quotes included.
#[derive(Clone)]
pub struct Key {
    /// The key name, with escapes resolved.
    pub name: String,
    /// The byte-offset span of the key in the source document.
    pub span: Span,
}

impl Key {
    /// Returns the key name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq(&other.name)
    }
}

impl Eq for Key {}
