//! A TOML parser that assembles documents into a tree of ordered tables,
//! reporting every problem it finds instead of stopping at the first one.
//!
//! Parsing happens in two phases. A backtracking combinator grammar turns
//! the text into a flat list of expressions, each line on its own, so a
//! malformed line is recorded and skipped. The expressions are then
//! assembled into nested [`Table`]s, enforcing TOML's rules on duplicate
//! keys and table redefinition. A document with any error yields
//! [`Diagnostics`] listing all of them, with line and column.
//!
//! # Examples
//!
//! ```
//! use toml_tree::Value;
//!
//! let content = r#"
//! dev-mode = true
//!
//! [[things]]
//! name = "hammer"
//! value = 43
//!
//! [[things]]
//! name = "drill"
//! value = 300
//! color = "green"
//! "#;
//!
//! let table = toml_tree::parse(content)?;
//!
//! let things = table.get_array_of_tables("things").unwrap();
//! assert_eq!(things.len(), 2);
//! assert_eq!(things[0].get("name").and_then(|n| n.as_str()), Some("hammer"));
//! assert_eq!(things[1].get_value("value"), Some(&Value::Integer(300)));
//! assert_eq!(table.get("dev-mode").and_then(|d| d.as_bool()), Some(true));
//! # Ok::<(), toml_tree::Diagnostics>(())
//! ```
//!
//! Errors are collected across the whole document:
//!
//! ```
//! let err = toml_tree::parse("a = 1\na = 2\nb = \n").unwrap_err();
//! assert_eq!(err.len(), 2);
//! assert_eq!(
//!     err.to_string(),
//!     "Failed to parse TOML document:\n\
//!      |2, 1| Conflict: conflicting definition of `a`, already defined as an integer\n\
//!      |3, 5| Structure: missing value in key-value pair\n"
//! );
//! ```

mod assemble;
mod combinator;
mod error;
mod grammar;
mod number;
mod options;
mod scalar;
mod span;
mod string;
mod table;
mod time;
mod value;

pub use error::{Category, Diagnostics, Error, ErrorKind, StructureReason, ValueReason};
pub use options::ParseOptions;
pub use span::{LineIndex, Span, Spanned};
pub use table::Table;
pub use time::{Date, LocalDateTime, OffsetDateTime, Time, TimeOffset};
pub use value::{Item, Key, Value};

#[cfg(feature = "serde")]
pub mod impl_serde;

/// Parses a TOML document into its root [`Table`] with the default
/// [`ParseOptions`].
///
/// All errors in the document are reported together, see [`Diagnostics`].
pub fn parse(text: &str) -> Result<Table, Diagnostics> {
    ParseOptions::default().parse(text)
}

/// Like [`parse`], for input that has not been checked to be UTF-8.
pub fn parse_bytes(bytes: &[u8]) -> Result<Table, Diagnostics> {
    ParseOptions::default().parse_bytes(bytes)
}
