#![allow(clippy::question_mark)]
use crate::Span;
use crate::span::LineIndex;
use std::fmt::{self, Debug, Display};

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

/// A single problem found while parsing or assembling a TOML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The error kind
    pub kind: ErrorKind,
    /// The span where the error occurs.
    ///
    /// Conflicts additionally carry the span of the first definition.
    pub span: Span,
    /// 1-based line and column of `span.start`, filled in once the error is
    /// reported through [`Diagnostics`].
    pub line_info: Option<(usize, usize)>,
}

impl std::error::Error for Error {}

impl From<(ErrorKind, Span)> for Error {
    fn from((kind, span): (ErrorKind, Span)) -> Self {
        Self {
            kind,
            span,
            line_info: None,
        }
    }
}

impl Error {
    /// Which of the four diagnostic categories this error belongs to.
    pub fn category(&self) -> Category {
        self.kind.category()
    }
}

/// Grammar-level malformations of an expression.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StructureReason {
    /// A line starts with `=`.
    MissingKey,
    /// Nothing parseable follows the `=` of a key-value pair.
    MissingValue,
    /// A line looks like `key]`.
    StandardTableMissingOpening,
    /// A `[table` header is not closed.
    StandardTableMissingClosing,
    /// A `[[table` header is not closed with `]]`.
    ArrayTableMissingClosing,
    /// Unrecognized text, or text following a complete expression.
    InvalidExpression,
    /// Arrays and inline tables are nested deeper than the configured limit.
    NestingTooDeep {
        /// The configured recursion limit.
        limit: usize,
    },
}

/// Literals whose outer shape matched but whose content is invalid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ValueReason {
    InvalidUnicodeSequence,
    InvalidCharacter,
    LiteralStringMissingClosing,
    MultilineLiteralStringMissingClosing,
    BasicStringMissingClosing,
    MultilineBasicStringMissingClosing,
    InvalidTime,
    InvalidDate,
    InvalidTimeOffset,
    InlineTableMissingClosing,
    IncompleteDottedKey,
    InvalidDecimal,
    InvalidHexadecimal,
    InvalidOctal,
    InvalidBinary,
    InvalidFloatMissingFraction,
    InvalidFloat,
}

impl ValueReason {
    fn message(self) -> &'static str {
        match self {
            Self::InvalidUnicodeSequence => "invalid escape or unicode sequence",
            Self::InvalidCharacter => "control character is not allowed in string",
            Self::LiteralStringMissingClosing => "missing closing `'` in literal string",
            Self::MultilineLiteralStringMissingClosing => {
                "missing closing `'''` in multiline literal string"
            }
            Self::BasicStringMissingClosing => "missing closing `\"` in string",
            Self::MultilineBasicStringMissingClosing => {
                "missing closing `\"\"\"` in multiline string"
            }
            Self::InvalidTime => "ill-formed time",
            Self::InvalidDate => "ill-formed date",
            Self::InvalidTimeOffset => "ill-formed time offset",
            Self::InlineTableMissingClosing => "missing closing `}` in inline table",
            Self::IncompleteDottedKey => "dotted key lacks a final part",
            Self::InvalidDecimal => "invalid decimal integer, can't be represented in 64 bits",
            Self::InvalidHexadecimal => "ill-formed hexadecimal integer",
            Self::InvalidOctal => "ill-formed octal integer",
            Self::InvalidBinary => "ill-formed binary integer",
            Self::InvalidFloatMissingFraction => "floating point number is missing its fraction",
            Self::InvalidFloat => "floating point number is out of range",
        }
    }
}

/// The four groups diagnostics are reported under.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Category {
    Structure,
    Value,
    Conflict,
    General,
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Structure => "Structure",
            Category::Value => "Value",
            Category::Conflict => "Conflict",
            Category::General => "General",
        })
    }
}

/// Everything that can go wrong while turning text into a [`Table`](crate::Table).
#[derive(Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document is malformed at the grammar level.
    Structure(StructureReason),

    /// A literal value is malformed.
    Value(ValueReason),

    /// A key, table or array of tables was defined in a way that collides with
    /// an earlier definition.
    Conflict {
        /// Dotted path up to and including the offending segment.
        path: String,
        /// What already occupies the path, eg. `"integer"` or `"table"`.
        existing: &'static str,
        /// The span where the existing key was first defined
        first: Span,
    },

    /// The input is not valid UTF-8.
    InvalidUtf8,

    /// The input is larger than the configured maximum.
    FileTooLarge {
        /// The configured limit in bytes.
        limit: usize,
    },
}

impl ErrorKind {
    /// Which of the four diagnostic categories this kind belongs to.
    pub fn category(&self) -> Category {
        match self {
            Self::Structure(_) => Category::Structure,
            Self::Value(_) => Category::Value,
            Self::Conflict { .. } => Category::Conflict,
            Self::InvalidUtf8 | Self::FileTooLarge { .. } => Category::General,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Structure(reason) => match reason {
                StructureReason::MissingKey => "missing-key",
                StructureReason::MissingValue => "missing-value",
                StructureReason::StandardTableMissingOpening => "table-missing-opening",
                StructureReason::StandardTableMissingClosing => "table-missing-closing",
                StructureReason::ArrayTableMissingClosing => "array-table-missing-closing",
                StructureReason::InvalidExpression => "invalid-expression",
                StructureReason::NestingTooDeep { .. } => "nesting-too-deep",
            },
            Self::Value(reason) => match reason {
                ValueReason::InvalidUnicodeSequence => "invalid-unicode-sequence",
                ValueReason::InvalidCharacter => "invalid-character",
                ValueReason::LiteralStringMissingClosing
                | ValueReason::MultilineLiteralStringMissingClosing
                | ValueReason::BasicStringMissingClosing
                | ValueReason::MultilineBasicStringMissingClosing => "unterminated-string",
                ValueReason::InvalidTime => "invalid-time",
                ValueReason::InvalidDate => "invalid-date",
                ValueReason::InvalidTimeOffset => "invalid-time-offset",
                ValueReason::InlineTableMissingClosing => "unterminated-inline-table",
                ValueReason::IncompleteDottedKey => "incomplete-dotted-key",
                ValueReason::InvalidDecimal
                | ValueReason::InvalidHexadecimal
                | ValueReason::InvalidOctal
                | ValueReason::InvalidBinary => "invalid-integer",
                ValueReason::InvalidFloatMissingFraction | ValueReason::InvalidFloat => {
                    "invalid-float"
                }
            },
            Self::Conflict { .. } => "conflict",
            Self::InvalidUtf8 => "invalid-utf8",
            Self::FileTooLarge { .. } => "file-too-large",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

macro_rules! rtry {
    ($($tt:tt)*) => {
        if let Err(err) = $($tt)* {
            return Err(err);
        }
    };
}

fn article(noun: &str) -> &'static str {
    match noun.as_bytes().first() {
        Some(b'a' | b'e' | b'i' | b'o' | b'u') => "an ",
        _ => "a ",
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((line, column)) = self.line_info {
            rtry!(write!(f, "|{line}, {column}| "));
        }
        rtry!(Display::fmt(&self.category(), f));
        rtry!(f.write_str(": "));
        match &self.kind {
            ErrorKind::Structure(reason) => match reason {
                StructureReason::MissingKey => f.write_str("missing key in key-value pair"),
                StructureReason::MissingValue => f.write_str("missing value in key-value pair"),
                StructureReason::StandardTableMissingOpening => {
                    f.write_str("missing opening `[` in table header")
                }
                StructureReason::StandardTableMissingClosing => {
                    f.write_str("missing closing `]` in table header")
                }
                StructureReason::ArrayTableMissingClosing => {
                    f.write_str("missing closing `]]` in array of tables header")
                }
                StructureReason::InvalidExpression => f.write_str("invalid TOML expression"),
                StructureReason::NestingTooDeep { limit } => {
                    rtry!(f.write_str("arrays and inline tables nested deeper than "));
                    rtry!(Display::fmt(limit, f));
                    f.write_str(" levels")
                }
            },
            ErrorKind::Value(reason) => f.write_str(reason.message()),
            ErrorKind::Conflict { path, existing, .. } => {
                rtry!(f.write_str("conflicting definition of `"));
                rtry!(f.write_str(path));
                rtry!(f.write_str("`, already defined as "));
                rtry!(f.write_str(article(existing)));
                f.write_str(existing)
            }
            ErrorKind::InvalidUtf8 => f.write_str("input is not valid UTF-8"),
            ErrorKind::FileTooLarge { limit } => {
                rtry!(f.write_str("input is larger than the maximum of "));
                rtry!(Display::fmt(limit, f));
                f.write_str(" bytes")
            }
        }
    }
}

/// Every problem found in a document that failed to parse.
///
/// Parsing is all-or-nothing: a document with any error never yields a
/// partial table, instead all collected errors are reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    /// The collected errors, in source order.
    pub errors: Vec<Error>,
}

impl Diagnostics {
    /// Fills in line information for each error from `index`.
    pub(crate) fn locate(mut errors: Vec<Error>, index: &LineIndex<'_>) -> Diagnostics {
        for error in &mut errors {
            error.line_info = Some(index.line_col(error.span.start as usize));
        }
        Diagnostics { errors }
    }

    /// Number of collected errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false` for diagnostics returned by the parser.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates the collected errors.
    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    /// Appends the errors of `other`.
    pub fn merge(&mut self, mut other: Diagnostics) {
        self.errors.append(&mut other.errors);
    }
}

impl From<Error> for Diagnostics {
    fn from(value: Error) -> Self {
        Diagnostics {
            errors: vec![value],
        }
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        rtry!(f.write_str("Failed to parse TOML document:\n"));
        for error in &self.errors {
            rtry!(Display::fmt(error, f));
            rtry!(f.write_str("\n"));
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

impl IntoIterator for Diagnostics {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;
    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;
    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
