//! The four TOML string forms.

use crate::combinator::{Cursor, attempt};
use crate::error::ValueReason;
use crate::grammar::RawValue;
use crate::scalar::{escape, is_basic_unescaped, is_literal_char, newline, whitespace};
use crate::span::Span;

#[cfg(test)]
#[path = "./string_tests.rs"]
mod tests;

fn error(span: Span, reason: ValueReason) -> Option<RawValue> {
    Some(RawValue::Error(span, reason))
}

/// `"..."` with escapes.
pub(crate) fn basic_string(c: &mut Cursor<'_>) -> Option<RawValue> {
    if c.peek() != Some(b'"') {
        return None;
    }
    c.advance(1);
    let mut out = String::new();
    loop {
        let at = c.pos();
        match c.peek_char() {
            Some('"') => {
                c.advance(1);
                return Some(RawValue::String(out));
            }
            Some('\\') => match escape(c) {
                Some(Ok(ch)) => out.push(ch),
                Some(Err(span)) => return error(span, ValueReason::InvalidUnicodeSequence),
                None => return error(c.char_span(at), ValueReason::InvalidUnicodeSequence),
            },
            Some(ch) if is_basic_unescaped(ch) => {
                out.push(ch);
                c.advance(ch.len_utf8());
            }
            None | Some('\n') | Some('\r') => {
                return error(c.char_span(at), ValueReason::BasicStringMissingClosing);
            }
            Some(_) => return error(c.char_span(at), ValueReason::InvalidCharacter),
        }
    }
}

/// `'...'`, taken verbatim.
pub(crate) fn literal_string(c: &mut Cursor<'_>) -> Option<RawValue> {
    if c.peek() != Some(b'\'') {
        return None;
    }
    c.advance(1);
    let start = c.pos();
    loop {
        let at = c.pos();
        match c.peek_char() {
            Some('\'') => {
                let text = c.slice(start).to_owned();
                c.advance(1);
                return Some(RawValue::String(text));
            }
            Some(ch) if is_literal_char(ch) => c.advance(ch.len_utf8()),
            None | Some('\n') | Some('\r') => {
                return error(c.char_span(at), ValueReason::LiteralStringMissingClosing);
            }
            Some(_) => return error(c.char_span(at), ValueReason::InvalidCharacter),
        }
    }
}

/// A backslash followed by optional whitespace, a line ending, and any
/// whitespace or blank lines after it.
fn line_continuation(c: &mut Cursor<'_>) -> Option<()> {
    attempt(c, |c| {
        if !c.eat(b'\\') {
            return None;
        }
        whitespace(c);
        newline(c)?;
        loop {
            whitespace(c);
            if newline(c).is_none() {
                return Some(());
            }
        }
    })
}

/// Closing delimiter of a multiline string, with up to two extra quote
/// characters in front of it that belong to the content.
fn multiline_close(c: &mut Cursor<'_>, quote: u8, out: &mut String) -> bool {
    let run = c.rest().bytes().take_while(|&b| b == quote).count();
    if run < 3 {
        return false;
    }
    let extra = (run - 3).min(2);
    for _ in 0..extra {
        out.push(quote as char);
    }
    c.advance(extra + 3);
    true
}

/// `"""..."""` with escapes and line continuations. A newline directly after
/// the opening delimiter is dropped.
pub(crate) fn ml_basic_string(c: &mut Cursor<'_>) -> Option<RawValue> {
    let start = c.pos();
    if !c.eat_str("\"\"\"") {
        return None;
    }
    newline(c);
    let mut out = String::new();
    loop {
        let at = c.pos();
        if multiline_close(c, b'"', &mut out) {
            return Some(RawValue::String(out));
        }
        match c.peek_char() {
            None => {
                return error(
                    c.span_from(start),
                    ValueReason::MultilineBasicStringMissingClosing,
                );
            }
            Some('\\') => {
                if line_continuation(c).is_some() {
                    continue;
                }
                match escape(c) {
                    Some(Ok(ch)) => out.push(ch),
                    Some(Err(span)) => return error(span, ValueReason::InvalidUnicodeSequence),
                    None => return error(c.char_span(at), ValueReason::InvalidUnicodeSequence),
                }
            }
            Some('\n') => {
                out.push('\n');
                c.advance(1);
            }
            Some('\r') => {
                if newline(c).is_none() {
                    return error(c.char_span(at), ValueReason::InvalidCharacter);
                }
                out.push_str("\r\n");
            }
            Some(ch) if ch == '"' || is_basic_unescaped(ch) => {
                out.push(ch);
                c.advance(ch.len_utf8());
            }
            Some(_) => return error(c.char_span(at), ValueReason::InvalidCharacter),
        }
    }
}

/// `'''...'''`, taken verbatim apart from a dropped leading newline.
pub(crate) fn ml_literal_string(c: &mut Cursor<'_>) -> Option<RawValue> {
    let start = c.pos();
    if !c.eat_str("'''") {
        return None;
    }
    newline(c);
    let mut out = String::new();
    loop {
        let at = c.pos();
        if multiline_close(c, b'\'', &mut out) {
            return Some(RawValue::String(out));
        }
        match c.peek_char() {
            None => {
                return error(
                    c.span_from(start),
                    ValueReason::MultilineLiteralStringMissingClosing,
                );
            }
            Some('\n') => {
                out.push('\n');
                c.advance(1);
            }
            Some('\r') => {
                if newline(c).is_none() {
                    return error(c.char_span(at), ValueReason::InvalidCharacter);
                }
                out.push_str("\r\n");
            }
            Some(ch) if ch == '\'' || is_literal_char(ch) => {
                out.push(ch);
                c.advance(ch.len_utf8());
            }
            Some(_) => return error(c.char_span(at), ValueReason::InvalidCharacter),
        }
    }
}
