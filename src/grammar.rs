//! Keys, values, headers and the document loop.
//!
//! The grammar produces a flat list of [`TopLevel`] entries in source order.
//! Problems are recorded as entries instead of aborting, and parsing resumes
//! on the next line, so one pass reports every independent problem.

use crate::combinator::{
    Cursor, alt, at_least, attempt, flatten, map, preceded, recognize, terminated, traced,
};
use crate::error::{StructureReason, ValueReason};
use crate::number::{float, integer};
use crate::scalar::{
    byte, byte_if, comment, is_keylike, line_end, newline, whitespace, ws_comment_newline,
};
use crate::span::{Span, Spanned};
use crate::string::{basic_string, literal_string, ml_basic_string, ml_literal_string};
use crate::time::{Date, LocalDateTime, OffsetDateTime, Time, date_time};

#[cfg(test)]
#[path = "./grammar_tests.rs"]
mod tests;

/// A key of one or more segments, `a."b".c`, each with its own span.
pub(crate) type DottedKey = Vec<Spanned<String>>;

/// A parsed value before assembly. `Error` is a literal that was recognized
/// but is malformed; it never reaches the assembled table.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Array(Vec<RawValue>),
    InlineTable(Vec<(DottedKey, RawValue)>),
    LocalDate(Date),
    LocalTime(Time),
    LocalDateTime(LocalDateTime),
    OffsetDateTime(OffsetDateTime),
    Error(Span, ValueReason),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TopLevel {
    KeyValue(DottedKey, RawValue),
    Table(DottedKey),
    ArrayTable(DottedKey),
    StructuralError(Span, StructureReason),
    ValueError(Span, ValueReason),
}

fn bare_key(c: &mut Cursor<'_>) -> Option<RawValue> {
    map(recognize(at_least(1, byte_if(is_keylike))), |name: &str| {
        RawValue::String(name.to_owned())
    })(c)
}

fn simple_key(c: &mut Cursor<'_>) -> Option<RawValue> {
    alt((basic_string, literal_string, bare_key))(c)
}

fn key_separator(c: &mut Cursor<'_>) -> Option<u8> {
    preceded(whitespace, terminated(byte(b'.'), whitespace))(c)
}

/// A key, or the reason it is malformed.
type KeyResult = Result<DottedKey, (Span, ValueReason)>;

/// A bare, quoted or dotted key. Yields an error for a malformed quoted
/// segment or a trailing dot.
pub(crate) fn key(c: &mut Cursor<'_>) -> Option<KeyResult> {
    let first = traced(simple_key)(c)?;
    let mut segments = vec![first];
    while key_separator(c).is_some() {
        let at = c.pos();
        match traced(simple_key)(c) {
            Some(segment) => segments.push(segment),
            None => return Some(Err((c.char_span(at), ValueReason::IncompleteDottedKey))),
        }
    }

    let mut key = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment.value {
            RawValue::String(name) => key.push(Spanned::with_span(name, segment.span)),
            RawValue::Error(span, reason) => return Some(Err((span, reason))),
            _ => return None,
        }
    }
    Some(Ok(key))
}

/// `key =`, with the surrounding whitespace. A malformed key is returned
/// as is without looking for the `=`.
fn key_equals(c: &mut Cursor<'_>) -> Option<KeyResult> {
    attempt(c, |c| {
        let key = key(c)?;
        if key.is_err() {
            return Some(key);
        }
        whitespace(c);
        byte(b'=')(c)?;
        whitespace(c);
        Some(key)
    })
}

/// `true` or `false`, not followed by further key characters.
fn boolean(c: &mut Cursor<'_>) -> Option<RawValue> {
    let word = recognize(at_least(1, byte_if(is_keylike)));
    flatten(map(word, |word: &str| match word {
        "true" => Some(RawValue::Boolean(true)),
        "false" => Some(RawValue::Boolean(false)),
        _ => None,
    }))(c)
}

/// Any value, dispatched on its first byte.
pub(crate) fn value(c: &mut Cursor<'_>) -> Option<RawValue> {
    match c.peek()? {
        b'"' => alt((ml_basic_string, basic_string))(c),
        b'\'' => alt((ml_literal_string, literal_string))(c),
        b'[' => array(c),
        b'{' => inline_table(c),
        _ => alt((date_time, float, integer, boolean))(c),
    }
}

/// `[ v, v, ]` spanning any number of lines. The first malformed element is
/// returned in place of the array.
pub(crate) fn array(c: &mut Cursor<'_>) -> Option<RawValue> {
    attempt(c, |c| {
        if c.peek() != Some(b'[') || !c.descend() {
            return None;
        }
        c.advance(1);
        let result = array_values(c);
        c.ascend();
        result
    })
}

fn array_values(c: &mut Cursor<'_>) -> Option<RawValue> {
    let mut values = Vec::new();
    ws_comment_newline(c);
    loop {
        if c.eat(b']') {
            return Some(RawValue::Array(values));
        }
        match value(c)? {
            RawValue::Error(span, reason) => return Some(RawValue::Error(span, reason)),
            value => values.push(value),
        }
        ws_comment_newline(c);
        if c.eat(b',') {
            ws_comment_newline(c);
        } else if c.eat(b']') {
            return Some(RawValue::Array(values));
        } else {
            return None;
        }
    }
}

/// `{ k = v, k = v }` on a single line.
pub(crate) fn inline_table(c: &mut Cursor<'_>) -> Option<RawValue> {
    attempt(c, |c| {
        if c.peek() != Some(b'{') || !c.descend() {
            return None;
        }
        c.advance(1);
        let result = inline_entries(c);
        c.ascend();
        result
    })
}

fn inline_entries(c: &mut Cursor<'_>) -> Option<RawValue> {
    let mut entries = Vec::new();
    whitespace(c);
    if c.eat(b'}') {
        return Some(RawValue::InlineTable(entries));
    }
    loop {
        let at = c.pos();
        let key = match key_equals(c) {
            Some(Ok(key)) => key,
            Some(Err((span, reason))) => return Some(RawValue::Error(span, reason)),
            None => return missing_brace(c, at),
        };
        let at = c.pos();
        match value(c) {
            Some(RawValue::Error(span, reason)) => return Some(RawValue::Error(span, reason)),
            Some(value) => entries.push((key, value)),
            None => return missing_brace(c, at),
        }
        whitespace(c);
        if c.eat(b',') {
            whitespace(c);
        } else if c.eat(b'}') {
            return Some(RawValue::InlineTable(entries));
        } else {
            return missing_brace(c, c.pos());
        }
    }
}

fn missing_brace(c: &mut Cursor<'_>, at: usize) -> Option<RawValue> {
    if c.nesting_overflowed() {
        return None;
    }
    Some(RawValue::Error(
        c.char_span(at),
        ValueReason::InlineTableMissingClosing,
    ))
}

fn key_value(c: &mut Cursor<'_>) -> Option<TopLevel> {
    let key = match key_equals(c)? {
        Ok(key) => key,
        Err((span, reason)) => return Some(TopLevel::ValueError(span, reason)),
    };
    let at = c.pos();
    let entry = match value(c) {
        Some(RawValue::Error(span, reason)) => TopLevel::ValueError(span, reason),
        Some(value) => TopLevel::KeyValue(key, value),
        None => match c.take_nesting_overflow() {
            Some((offset, limit)) => TopLevel::StructuralError(
                c.char_span(offset),
                StructureReason::NestingTooDeep { limit },
            ),
            None => TopLevel::StructuralError(c.char_span(at), StructureReason::MissingValue),
        },
    };
    Some(entry)
}

/// The key of a header between `open` and `close`, or the header's error.
fn header(
    c: &mut Cursor<'_>,
    open: &'static str,
    close: &'static str,
    missing: StructureReason,
) -> Option<Result<DottedKey, TopLevel>> {
    attempt(c, |c| {
        if !c.eat_str(open) {
            return None;
        }
        whitespace(c);
        let key = match key(c)? {
            Ok(key) => key,
            Err((span, reason)) => return Some(Err(TopLevel::ValueError(span, reason))),
        };
        whitespace(c);
        if !c.eat_str(close) {
            let span = c.char_span(c.pos());
            return Some(Err(TopLevel::StructuralError(span, missing)));
        }
        Some(Ok(key))
    })
}

fn table_header(c: &mut Cursor<'_>) -> Option<TopLevel> {
    let key = header(c, "[", "]", StructureReason::StandardTableMissingClosing)?;
    Some(key.map_or_else(|err| err, TopLevel::Table))
}

fn array_table_header(c: &mut Cursor<'_>) -> Option<TopLevel> {
    let key = header(c, "[[", "]]", StructureReason::ArrayTableMissingClosing)?;
    Some(key.map_or_else(|err| err, TopLevel::ArrayTable))
}

/// One non-blank line of the document.
pub(crate) fn expression(c: &mut Cursor<'_>) -> Option<TopLevel> {
    alt((array_table_header, table_header, key_value))(c)
}

/// Picks the most specific reason for a line no expression matched.
fn diagnose(c: &mut Cursor<'_>, start: usize) -> TopLevel {
    let span = c.char_span(start);
    if c.peek() == Some(b'=') {
        return TopLevel::StructuralError(span, StructureReason::MissingKey);
    }
    let unopened = attempt(c, |c| {
        key(c)?;
        whitespace(c);
        byte(b']')(c)
    });
    if unopened.is_some() {
        return TopLevel::StructuralError(span, StructureReason::StandardTableMissingOpening);
    }
    TopLevel::StructuralError(span, StructureReason::InvalidExpression)
}

fn skip_line(c: &mut Cursor<'_>) {
    while let Some(b) = c.peek() {
        c.advance(1);
        if b == b'\n' {
            break;
        }
    }
}

/// Moves past the entry that failed at `start`. Recovery resumes on the next
/// line, unless the entry opened an array that continues below it: then the
/// remaining elements are skipped through the closing bracket, or up to the
/// next line that starts a key-value pair if the array is never closed.
fn skip_entry(c: &mut Cursor<'_>, start: usize) {
    let end = start + entry_len(c.text_from(start));
    if end > c.pos() {
        c.advance(end - c.pos());
    } else {
        skip_line(c);
    }
}

/// Length of the entry at the start of `text`, through its final newline.
fn entry_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    if bytes.iter().find(|&&b| b != b' ' && b != b'\t') == Some(&b'[') {
        return bytes.iter().position(|&b| b == b'\n').map_or(bytes.len(), |n| n + 1);
    }
    let mut open = Vec::new();
    let mut i = 0;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'\n' => {
                i += 1;
                // Inline tables end with their line, arrays may go on.
                if open.last() != Some(&b'[') || starts_key_value(&text[i..]) {
                    return i;
                }
            }
            b'#' => {
                i = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(bytes.len(), |n| i + n);
            }
            b'"' | b'\'' => i = string_end(bytes, i),
            b'[' | b'{' => {
                open.push(b);
                i += 1;
            }
            b']' | b'}' => {
                open.pop();
                i += 1;
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Offset just past the string opening at `start`. Single-line strings stop
/// before an unescaped newline.
fn string_end(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let escapes = quote == b'"';
    let multiline = bytes[start..].starts_with(&[quote; 3]);
    let mut i = start + if multiline { 3 } else { 1 };
    while let Some(&b) = bytes.get(i) {
        if escapes && b == b'\\' {
            i += 2;
        } else if b == quote && (!multiline || bytes[i..].starts_with(&[quote; 3])) {
            let run = bytes[i..].iter().take_while(|&&b| b == quote).count();
            return i + if multiline { run.min(5) } else { 1 };
        } else if b == b'\n' && !multiline {
            return i;
        } else {
            i += 1;
        }
    }
    bytes.len()
}

fn starts_key_value(line: &str) -> bool {
    let mut c = Cursor::new(line, None);
    whitespace(&mut c);
    matches!(key_equals(&mut c), Some(Ok(_)))
}

/// Parses a whole document into top-level entries.
pub(crate) fn document(c: &mut Cursor<'_>) -> Vec<TopLevel> {
    let mut entries = Vec::new();
    loop {
        whitespace(c);
        comment(c);
        if c.is_eof() {
            return entries;
        }
        if newline(c).is_some() {
            continue;
        }

        let start = c.pos();
        let Some(entry) = expression(c) else {
            entries.push(diagnose(c, start));
            skip_entry(c, start);
            continue;
        };
        let failed = matches!(
            entry,
            TopLevel::StructuralError(..) | TopLevel::ValueError(..)
        );
        entries.push(entry);
        if failed {
            skip_entry(c, start);
        } else if line_end(c).is_none() {
            whitespace(c);
            let span = c.char_span(c.pos());
            entries.push(TopLevel::StructuralError(
                span,
                StructureReason::InvalidExpression,
            ));
            skip_line(c);
        }
    }
}
