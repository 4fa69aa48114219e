//! Byte cursor and the backtracking combinators the grammar is built from.
//!
//! Every parser is a function `&mut Cursor -> Option<T>`. `None` means "no
//! match" and always leaves the cursor where it was before the call, so
//! alternatives can be tried speculatively without leaking partial input.
//! Malformed input that was positively recognized is not `None`, it is
//! reported as an error value by the grammar.

use crate::span::{Span, Spanned};

#[cfg(test)]
#[path = "./combinator_tests.rs"]
mod tests;

/// Saved cursor state, see [`Cursor::restore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    pos: usize,
    depth: usize,
}

pub(crate) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
    limit: Option<usize>,
    /// Offset of the first array or inline table that exceeded `limit`.
    too_deep: Option<usize>,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(src: &'a str, limit: Option<usize>) -> Cursor<'a> {
        Cursor {
            src,
            pos: 0,
            depth: 0,
            limit,
            too_deep: None,
        }
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    #[inline]
    pub(crate) fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Moves forward `n` bytes. Callers only step over bytes they have
    /// peeked, which keeps the position on a char boundary.
    #[inline]
    pub(crate) fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    #[inline]
    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    #[inline]
    pub(crate) fn eat_str(&mut self, text: &str) -> bool {
        if self.rest().starts_with(text) {
            self.pos += text.len();
            true
        } else {
            false
        }
    }

    #[inline]
    pub(crate) fn rest(&self) -> &'a str {
        self.src.get(self.pos..).unwrap_or("")
    }

    /// Source text from `at` to the end of input.
    #[inline]
    pub(crate) fn text_from(&self, at: usize) -> &'a str {
        self.src.get(at..).unwrap_or("")
    }

    /// Text consumed since `start`.
    #[inline]
    pub(crate) fn slice(&self, start: usize) -> &'a str {
        self.src.get(start..self.pos).unwrap_or("")
    }

    #[inline]
    pub(crate) fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32, self.pos as u32)
    }

    /// Span of the character at `at`, or an empty span at the end of input.
    pub(crate) fn char_span(&self, at: usize) -> Span {
        let len = match self.src.get(at..).and_then(|s| s.chars().next()) {
            Some(ch) => ch.len_utf8(),
            None => 0,
        };
        Span::new(at as u32, (at + len) as u32)
    }

    #[inline]
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            depth: self.depth,
        }
    }

    #[inline]
    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.depth = checkpoint.depth;
    }

    /// Enters one level of array or inline table nesting. Returns `false`
    /// when the configured limit is exceeded.
    pub(crate) fn descend(&mut self) -> bool {
        self.depth += 1;
        match self.limit {
            Some(limit) if self.depth > limit => {
                if self.too_deep.is_none() {
                    self.too_deep = Some(self.pos);
                }
                false
            }
            _ => true,
        }
    }

    pub(crate) fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn nesting_overflowed(&self) -> bool {
        self.too_deep.is_some()
    }

    /// Takes the recorded nesting overflow, as `(offset, limit)`.
    pub(crate) fn take_nesting_overflow(&mut self) -> Option<(usize, usize)> {
        let offset = self.too_deep.take()?;
        Some((offset, self.limit.unwrap_or(0)))
    }
}

/// Runs `f`, restoring the cursor if it does not match.
#[inline]
pub(crate) fn attempt<'a, T>(
    c: &mut Cursor<'a>,
    f: impl FnOnce(&mut Cursor<'a>) -> Option<T>,
) -> Option<T> {
    let checkpoint = c.checkpoint();
    let result = f(c);
    if result.is_none() {
        c.restore(checkpoint);
    }
    result
}

/// `a` then `b`, both or neither.
pub(crate) fn pair<'a, A, B>(
    a: impl Fn(&mut Cursor<'a>) -> Option<A>,
    b: impl Fn(&mut Cursor<'a>) -> Option<B>,
) -> impl Fn(&mut Cursor<'a>) -> Option<(A, B)> {
    move |c: &mut Cursor<'a>| {
        attempt(c, |c| {
            let first = a(c)?;
            let second = b(c)?;
            Some((first, second))
        })
    }
}

/// `a` then `b`, keeping the output of `b`.
pub(crate) fn preceded<'a, A, B>(
    a: impl Fn(&mut Cursor<'a>) -> Option<A>,
    b: impl Fn(&mut Cursor<'a>) -> Option<B>,
) -> impl Fn(&mut Cursor<'a>) -> Option<B> {
    map(pair(a, b), |(_, second)| second)
}

/// `a` then `b`, keeping the output of `a`.
pub(crate) fn terminated<'a, A, B>(
    a: impl Fn(&mut Cursor<'a>) -> Option<A>,
    b: impl Fn(&mut Cursor<'a>) -> Option<B>,
) -> impl Fn(&mut Cursor<'a>) -> Option<A> {
    map(pair(a, b), |(first, _)| first)
}

/// Ordered choice over a tuple of two to four parsers.
pub(crate) trait Alt<'a, T> {
    fn choice(&self, c: &mut Cursor<'a>) -> Option<T>;
}

macro_rules! impl_alt {
    ($($parser:ident $name:ident),+) => {
        impl<'a, T, $($parser),+> Alt<'a, T> for ($($parser,)+)
        where
            $($parser: Fn(&mut Cursor<'a>) -> Option<T>),+
        {
            fn choice(&self, c: &mut Cursor<'a>) -> Option<T> {
                let ($($name,)+) = self;
                $(
                    if let Some(value) = attempt(c, |c| $name(c)) {
                        return Some(value);
                    }
                )+
                None
            }
        }
    };
}

impl_alt!(A a, B b);
impl_alt!(A a, B b, C c3);
impl_alt!(A a, B b, C c3, D d);

/// The first alternative that matches, tried left to right.
pub(crate) fn alt<'a, T>(
    alternatives: impl Alt<'a, T>,
) -> impl Fn(&mut Cursor<'a>) -> Option<T> {
    move |c: &mut Cursor<'a>| alternatives.choice(c)
}

/// Applies `p` as often as it matches, stopping when it consumes nothing.
/// Always matches.
pub(crate) fn many<'a, T>(
    p: impl Fn(&mut Cursor<'a>) -> Option<T>,
) -> impl Fn(&mut Cursor<'a>) -> Option<Vec<T>> {
    move |c: &mut Cursor<'a>| Some(repeat(&p, c, usize::MAX))
}

/// Exactly `n` matches of `p`.
pub(crate) fn exactly<'a, T>(
    n: usize,
    p: impl Fn(&mut Cursor<'a>) -> Option<T>,
) -> impl Fn(&mut Cursor<'a>) -> Option<Vec<T>> {
    move |c: &mut Cursor<'a>| {
        attempt(c, |c| {
            let items = repeat(&p, c, n);
            if items.len() == n { Some(items) } else { None }
        })
    }
}

/// `n` or more matches of `p`.
pub(crate) fn at_least<'a, T>(
    n: usize,
    p: impl Fn(&mut Cursor<'a>) -> Option<T>,
) -> impl Fn(&mut Cursor<'a>) -> Option<Vec<T>> {
    move |c: &mut Cursor<'a>| {
        attempt(c, |c| {
            let items = repeat(&p, c, usize::MAX);
            if items.len() >= n { Some(items) } else { None }
        })
    }
}

fn repeat<'a, T>(
    p: &impl Fn(&mut Cursor<'a>) -> Option<T>,
    c: &mut Cursor<'a>,
    max: usize,
) -> Vec<T> {
    let mut items = Vec::new();
    while items.len() < max {
        let before = c.pos();
        match attempt(c, |c| p(c)) {
            Some(item) => items.push(item),
            None => break,
        }
        if c.pos() == before {
            break;
        }
    }
    items
}

/// Zero or one match of `p`. Always matches.
pub(crate) fn opt<'a, T>(
    p: impl Fn(&mut Cursor<'a>) -> Option<T>,
) -> impl Fn(&mut Cursor<'a>) -> Option<Option<T>> {
    move |c: &mut Cursor<'a>| Some(attempt(c, |c| p(c)))
}

pub(crate) fn map<'a, T, U>(
    p: impl Fn(&mut Cursor<'a>) -> Option<T>,
    f: impl Fn(T) -> U,
) -> impl Fn(&mut Cursor<'a>) -> Option<U> {
    move |c: &mut Cursor<'a>| p(c).map(&f)
}

/// Treats an inner `None` output as no match.
pub(crate) fn flatten<'a, T>(
    p: impl Fn(&mut Cursor<'a>) -> Option<Option<T>>,
) -> impl Fn(&mut Cursor<'a>) -> Option<T> {
    move |c: &mut Cursor<'a>| attempt(c, |c| p(c).flatten())
}

/// Captures the span consumed by `p` alongside its output.
pub(crate) fn traced<'a, T>(
    p: impl Fn(&mut Cursor<'a>) -> Option<T>,
) -> impl Fn(&mut Cursor<'a>) -> Option<Spanned<T>> {
    move |c: &mut Cursor<'a>| {
        let start = c.pos();
        let value = p(c)?;
        Some(Spanned::with_span(value, c.span_from(start)))
    }
}

/// The text consumed by `p`.
pub(crate) fn recognize<'a, T>(
    p: impl Fn(&mut Cursor<'a>) -> Option<T>,
) -> impl Fn(&mut Cursor<'a>) -> Option<&'a str> {
    move |c: &mut Cursor<'a>| {
        let start = c.pos();
        p(c)?;
        Some(c.slice(start))
    }
}
