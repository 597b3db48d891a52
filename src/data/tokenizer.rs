//! Quote-aware field tokenizer
//!
//! Scans a byte buffer for the next field terminated by the delimiter, a
//! newline or the end of input. A delimiter or newline seen while an odd
//! number of double quotes has been opened since the field start is literal
//! content. Fields are returned as slices of the input; nothing is copied
//! until [`render_token`] is called.

use std::borrow::Cow;

use super::error::ParseErrorKind;

/// What ended a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// The delimiter byte; more fields follow on the same line
    Delimiter,
    /// A newline (`\n` or `\r\n`)
    EndOfLine,
    /// The end of the buffer
    EndOfInput,
}

impl Terminator {
    /// Whether this terminator ends a record
    pub fn ends_record(self) -> bool {
        !matches!(self, Terminator::Delimiter)
    }
}

/// A field produced by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Raw field bytes, quotes included, terminator excluded
    pub field: &'a [u8],
    pub terminator: Terminator,
}

/// Resumable position inside a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenCursor {
    pos: usize,
    /// Set after a delimiter: a (possibly empty) field is still owed
    pending: bool,
}

impl TokenCursor {
    /// Create a cursor at the start of a buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cursor at the given byte offset
    pub fn at(pos: usize) -> Self {
        Self {
            pos,
            pending: false,
        }
    }

    /// Byte offset of the next unread byte
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether another call to [`next_token`] can produce a field
    pub fn has_more(&self, buf: &[u8]) -> bool {
        self.pending || self.pos < buf.len()
    }
}

/// Produce the next field of `buf`, advancing `cursor` past its terminator.
///
/// Returns `Ok(None)` once the buffer is exhausted. An opening quote that is
/// never closed before the end of input is an error; in that case the cursor
/// is left where it was.
pub fn next_token<'a>(
    buf: &'a [u8],
    delimiter: u8,
    cursor: &mut TokenCursor,
) -> Result<Option<Token<'a>>, ParseErrorKind> {
    if !cursor.has_more(buf) {
        return Ok(None);
    }

    let start = cursor.pos.min(buf.len());
    let mut in_quote = false;

    for (i, &byte) in buf[start..].iter().enumerate() {
        let end = start + i;
        match byte {
            b'"' => in_quote = !in_quote,
            b'\n' if !in_quote => {
                let field = strip_cr(&buf[start..end]);
                cursor.pos = end + 1;
                cursor.pending = false;
                return Ok(Some(Token {
                    field,
                    terminator: Terminator::EndOfLine,
                }));
            },
            b if b == delimiter && !in_quote => {
                cursor.pos = end + 1;
                cursor.pending = true;
                return Ok(Some(Token {
                    field: &buf[start..end],
                    terminator: Terminator::Delimiter,
                }));
            },
            _ => {},
        }
    }

    if in_quote {
        return Err(ParseErrorKind::UnterminatedQuote);
    }

    cursor.pos = buf.len();
    cursor.pending = false;
    Ok(Some(Token {
        field: strip_cr(&buf[start..]),
        terminator: Terminator::EndOfInput,
    }))
}

fn strip_cr(field: &[u8]) -> &[u8] {
    field.strip_suffix(b"\r").unwrap_or(field)
}

/// Split one record starting at `cursor`, leaving the cursor at the start of
/// the next record.
///
/// Only the fields in `wanted` are collected, but every field is counted.
/// Returns the collected fields and the total field count.
pub fn split_record<'a>(
    buf: &'a [u8],
    delimiter: u8,
    cursor: &mut TokenCursor,
    wanted: std::ops::Range<usize>,
) -> Result<(Vec<&'a [u8]>, usize), ParseErrorKind> {
    let mut fields = Vec::new();
    let mut count = 0;

    while let Some(token) = next_token(buf, delimiter, cursor)? {
        if wanted.contains(&count) {
            fields.push(token.field);
        }
        count += 1;
        if token.terminator.ends_record() {
            break;
        }
    }

    Ok((fields, count))
}

/// Convert a raw field into display text.
///
/// One enclosing pair of quotes is removed and doubled quotes inside are
/// collapsed. Unquoted UTF-8 fields are borrowed as-is.
pub fn render_token(raw: &[u8]) -> Cow<'_, str> {
    let inner = match raw {
        [b'"', inner @ .., b'"'] => inner,
        _ => return String::from_utf8_lossy(raw),
    };

    let text = String::from_utf8_lossy(inner);
    if text.contains("\"\"") {
        Cow::Owned(text.replace("\"\"", "\""))
    } else {
        text
    }
}
