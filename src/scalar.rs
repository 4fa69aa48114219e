//! Character classes and the smallest matchers of the grammar.

use crate::combinator::{Cursor, attempt, exactly, many, opt, pair, preceded, recognize};
use crate::span::Span;

#[cfg(test)]
#[path = "./scalar_tests.rs"]
mod tests;

#[inline]
pub(crate) fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline]
pub(crate) fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

#[inline]
pub(crate) fn is_oct_digit(b: u8) -> bool {
    matches!(b, b'0'..=b'7')
}

#[inline]
pub(crate) fn is_bin_digit(b: u8) -> bool {
    matches!(b, b'0' | b'1')
}

/// Bytes allowed in a bare key.
#[inline]
pub(crate) fn is_keylike(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Whether `text` can be written as a bare key.
pub(crate) fn is_bare_key(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(is_keylike)
}

#[inline]
pub(crate) fn is_whitespace(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Characters that may appear unescaped in a basic string.
#[inline]
pub(crate) fn is_basic_unescaped(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '!' | '\u{23}'..='\u{5b}' | '\u{5d}'..='\u{7e}') || ch >= '\u{80}'
}

/// Characters that may appear in a literal string.
#[inline]
pub(crate) fn is_literal_char(ch: char) -> bool {
    matches!(ch, '\t' | '\u{20}'..='\u{26}' | '\u{28}'..='\u{7e}') || ch >= '\u{80}'
}

/// Characters that may appear in a comment, every control character except
/// tab is excluded.
#[inline]
pub(crate) fn is_comment_char(ch: char) -> bool {
    matches!(ch, '\t' | '\u{20}'..='\u{7e}') || ch >= '\u{80}'
}

pub(crate) fn byte<'a>(expected: u8) -> impl Fn(&mut Cursor<'a>) -> Option<u8> {
    move |c: &mut Cursor<'a>| if c.eat(expected) { Some(expected) } else { None }
}

pub(crate) fn byte_if<'a>(pred: fn(u8) -> bool) -> impl Fn(&mut Cursor<'a>) -> Option<u8> {
    move |c: &mut Cursor<'a>| match c.peek() {
        Some(b) if pred(b) => {
            c.advance(1);
            Some(b)
        }
        _ => None,
    }
}

pub(crate) fn tag<'a>(text: &'static str) -> impl Fn(&mut Cursor<'a>) -> Option<&'a str> {
    move |c: &mut Cursor<'a>| {
        let start = c.pos();
        if c.eat_str(text) {
            Some(c.slice(start))
        } else {
            None
        }
    }
}

/// One or more digits accepted by `pred`, with single underscores allowed
/// between two digits.
pub(crate) fn digits<'a>(pred: fn(u8) -> bool) -> impl Fn(&mut Cursor<'a>) -> Option<&'a str> {
    recognize(pair(
        byte_if(pred),
        many(preceded(opt(byte(b'_')), byte_if(pred))),
    ))
}

/// Spaces and tabs. Always matches.
pub(crate) fn whitespace(c: &mut Cursor<'_>) -> Option<()> {
    while c.peek().is_some_and(is_whitespace) {
        c.advance(1);
    }
    Some(())
}

/// `\n` or `\r\n`. A lone carriage return is not a line ending.
pub(crate) fn newline(c: &mut Cursor<'_>) -> Option<()> {
    if c.eat(b'\n') || c.eat_str("\r\n") {
        Some(())
    } else {
        None
    }
}

/// A `#` comment up to, but excluding, the end of the line. Stops early at
/// a character comments may not contain, leaving it for the caller to reject.
pub(crate) fn comment<'a>(c: &mut Cursor<'a>) -> Option<&'a str> {
    let start = c.pos();
    if !c.eat(b'#') {
        return None;
    }
    while let Some(ch) = c.peek_char() {
        if !is_comment_char(ch) {
            break;
        }
        c.advance(ch.len_utf8());
    }
    Some(c.slice(start))
}

/// Whitespace, comments and line endings, as found between array elements.
/// Always matches.
pub(crate) fn ws_comment_newline(c: &mut Cursor<'_>) -> Option<()> {
    loop {
        let before = c.pos();
        whitespace(c);
        comment(c);
        newline(c);
        if c.pos() == before {
            return Some(());
        }
    }
}

/// Optional trailing whitespace and comment, then a line ending or the end of
/// input.
pub(crate) fn line_end(c: &mut Cursor<'_>) -> Option<()> {
    attempt(c, |c| {
        whitespace(c);
        comment(c);
        if c.is_eof() { Some(()) } else { newline(c) }
    })
}

/// A backslash escape of a basic string.
///
/// Returns `None` when the cursor is not at a backslash, and the span of the
/// escape when it is malformed or names an invalid code point.
pub(crate) fn escape(c: &mut Cursor<'_>) -> Option<Result<char, Span>> {
    let start = c.pos();
    if !c.eat(b'\\') {
        return None;
    }
    let ch = match c.peek() {
        Some(b'"') => '"',
        Some(b'\\') => '\\',
        Some(b'b') => '\u{8}',
        Some(b'f') => '\u{c}',
        Some(b'n') => '\n',
        Some(b'r') => '\r',
        Some(b't') => '\t',
        Some(b'u') => return Some(unicode_escape(c, start, 4)),
        Some(b'U') => return Some(unicode_escape(c, start, 8)),
        _ => {
            let end = c.char_span(c.pos()).end;
            return Some(Err(Span::new(start as u32, end)));
        }
    };
    c.advance(1);
    Some(Ok(ch))
}

fn unicode_escape(c: &mut Cursor<'_>, start: usize, len: usize) -> Result<char, Span> {
    c.advance(1);
    let hex = recognize(exactly(len, byte_if(is_hex_digit)))(c);
    let code = hex.and_then(|hex| u32::from_str_radix(hex, 16).ok());
    match code.and_then(char::from_u32) {
        Some(ch) => Ok(ch),
        None => Err(c.span_from(start)),
    }
}
