//! Parse configuration and the text-to-table pipeline.

use tracing::{debug, instrument};

use crate::assemble::Assembler;
use crate::combinator::Cursor;
use crate::error::{Diagnostics, Error, ErrorKind};
use crate::grammar;
use crate::span::{LineIndex, Span};
use crate::table::Table;

#[cfg(test)]
#[path = "./options_tests.rs"]
mod tests;

/// Limits applied while parsing a document.
///
/// ```
/// use toml_tree::ParseOptions;
///
/// let options = ParseOptions::default().with_recursion_limit(2);
/// assert!(options.parse("a = [[1]]").is_ok());
/// assert!(options.parse("a = [[[1]]]").is_err());
/// ```
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct ParseOptions {
    /// Maximum nesting depth of arrays and inline tables.
    /// If set to `None`, nesting is only bounded by the call stack.
    /// Defaults to `Some(128)`.
    pub recursion_limit: Option<usize>,
    /// Inputs longer than this many bytes are rejected up front.
    /// Defaults to (and is capped at) `u32::MAX`, the largest offset a
    /// [`Span`] can hold.
    pub max_input_len: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            recursion_limit: Some(128),
            max_input_len: u32::MAX as usize,
        }
    }
}

impl ParseOptions {
    #[must_use]
    /// Set a maximum nesting depth for arrays and inline tables.
    pub fn with_recursion_limit(mut self, recursion_limit: usize) -> Self {
        self.recursion_limit = Some(recursion_limit);
        self
    }

    #[must_use]
    /// Disable the nesting depth limit.
    pub fn without_recursion_limit(mut self) -> Self {
        self.recursion_limit = None;
        self
    }

    #[must_use]
    /// Set the maximum accepted input size in bytes.
    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = max_input_len.min(u32::MAX as usize);
        self
    }
}

impl ParseOptions {
    /// Parses a TOML document into its root [`Table`].
    ///
    /// On failure every problem found in the document is reported, no
    /// partially built table is returned.
    #[instrument(level = "debug", skip_all, fields(len = text.len()))]
    pub fn parse(&self, text: &str) -> Result<Table, Diagnostics> {
        let limit = self.max_input_len.min(u32::MAX as usize);
        if text.len() > limit {
            debug!(limit, "input rejected, too large");
            let span = Span::point(0);
            let error = Error::from((ErrorKind::FileTooLarge { limit }, span));
            return Err(Diagnostics::locate(vec![error], &LineIndex::new("")));
        }

        let mut cursor = Cursor::new(text, self.recursion_limit);
        let entries = grammar::document(&mut cursor);
        debug!(entries = entries.len(), "parsed top-level expressions");

        let mut assembler = Assembler::new();
        for entry in entries {
            assembler.push(entry);
        }
        match assembler.finish() {
            Ok(table) => Ok(table),
            Err(errors) => {
                debug!(errors = errors.len(), "document rejected");
                Err(Diagnostics::locate(errors, &LineIndex::new(text)))
            }
        }
    }

    /// Parses a TOML document from raw bytes, which must be valid UTF-8.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Table, Diagnostics> {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.parse(text),
            Err(err) => {
                let valid = err.valid_up_to();
                debug!(offset = valid, "input is not valid UTF-8");
                let offset = valid.min(u32::MAX as usize) as u32;
                let error = Error::from((ErrorKind::InvalidUtf8, Span::point(offset)));
                let prefix = match std::str::from_utf8(&bytes[..valid]) {
                    Ok(prefix) => prefix,
                    Err(_) => "",
                };
                Err(Diagnostics::locate(vec![error], &LineIndex::new(prefix)))
            }
        }
    }
}
