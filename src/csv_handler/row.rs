//! Row type and the single-line CSV parser/serializer.
//!
//! A [`Row`] is the ordered list of fields found on one line. Parsing follows
//! RFC 4180 strictly:
//!
//! - fields are separated by `,`
//! - a field may be wrapped in `"`; inside it `""` stands for one `"`
//! - a quote may only open a field at its first byte
//! - whitespace is never trimmed
//! - one trailing `\n` or `\r\n` is ignored, and an empty line is a single empty field
//!
//! Serialization goes through the `csv` crate writer, which quotes a field only
//! when it contains a comma, a quote, `\r` or `\n`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::ops::Index;
use thiserror::Error;

use crate::config::LineTerminator;
use crate::error::CsvHelperError;

/// Field separator.
pub const DELIMITER: u8 = b',';

/// Quote character.
pub const QUOTE: u8 = b'"';

/// What made a line unparseable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A quoted field is never closed.
    UnterminatedQuote,
    /// A closing quote is followed by something other than `,` or end of line.
    UnexpectedAfterQuote,
    /// A quote appears inside an unquoted field.
    BareQuote,
    /// A field is not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseErrorKind::UnterminatedQuote => "unterminated quoted field",
            ParseErrorKind::UnexpectedAfterQuote => "unexpected character after closing quote",
            ParseErrorKind::BareQuote => "bare quote in unquoted field",
            ParseErrorKind::InvalidUtf8 => "invalid UTF-8 in field",
        };
        f.write_str(msg)
    }
}

/// A malformed line.
///
/// `column` is the 1-based byte position where the problem was detected. For
/// [`ParseErrorKind::UnterminatedQuote`] it points at the opening quote.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at column {column}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub column: usize,
}

impl ParseError {
    fn at(kind: ParseErrorKind, offset: usize) -> Self {
        Self {
            kind,
            column: offset + 1,
        }
    }
}

/// An ordered sequence of string fields making up one CSV line.
///
/// The header of a file is a `Row` too and is parsed with the same rules.
///
/// # Example
///
/// ```
/// use csv_helper::Row;
///
/// let row = Row::parse(b"name,\"a, b\",\"say \"\"hi\"\"\"").unwrap();
/// assert_eq!(row.as_slice(), &["name", "a, b", "say \"hi\""]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: Vec<String>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a single line of raw bytes.
    pub fn parse(line: &[u8]) -> Result<Self, ParseError> {
        let line = strip_terminator(line);
        let mut fields = Vec::new();
        let mut pos = 0;

        loop {
            let (field, next) = if line.get(pos) == Some(&QUOTE) {
                parse_quoted(line, pos)?
            } else {
                parse_unquoted(line, pos)?
            };
            fields.push(field);

            match next {
                Some(p) => pos = p,
                None => break,
            }
        }

        Ok(Self { fields })
    }

    /// Appends a field.
    pub fn push(&mut self, field: impl Into<String>) {
        self.fields.push(field.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.fields
    }

    pub fn into_inner(self) -> Vec<String> {
        self.fields
    }

    /// Serializes the row followed by the platform line terminator.
    ///
    /// A row with no fields is written as `""`, the same line as a row holding
    /// one empty field, so it parses back as `[""]`. Every row with at least one
    /// field parses back unchanged.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CsvHelperError> {
        self.to_bytes_with(LineTerminator::platform())
    }

    /// Serializes the row followed by `terminator`.
    pub fn to_bytes_with(&self, terminator: LineTerminator) -> Result<Vec<u8>, CsvHelperError> {
        let mut writer = row_writer(Vec::new(), terminator);
        self.write_to(&mut writer)?;
        writer
            .into_inner()
            .map_err(|e| CsvHelperError::Write(e.into_error()))
    }

    /// Writes the row as one record through an existing csv writer.
    fn write_to<W: io::Write>(&self, writer: &mut csv::Writer<W>) -> csv::Result<()> {
        writer.write_record(&self.fields)
    }
}

/// Builds a csv writer with the quoting rules rows are serialized with.
fn row_writer<W: io::Write>(inner: W, terminator: LineTerminator) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(DELIMITER)
        .quote(QUOTE)
        .double_quote(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(terminator.to_csv())
        .from_writer(inner)
}

/// Drops one trailing `\n` or `\r\n`. A lone `\r` is field content.
fn strip_terminator(line: &[u8]) -> &[u8] {
    match line.strip_suffix(b"\n") {
        Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
        None => line,
    }
}

/// Reads a quoted field starting at the opening quote.
///
/// Returns the unescaped field and the offset of the next field, if any.
fn parse_quoted(line: &[u8], start: usize) -> Result<(String, Option<usize>), ParseError> {
    let mut buf = Vec::new();
    let mut i = start + 1;

    loop {
        match line.get(i) {
            None => return Err(ParseError::at(ParseErrorKind::UnterminatedQuote, start)),
            Some(&QUOTE) if line.get(i + 1) == Some(&QUOTE) => {
                // Escaped quote
                buf.push(QUOTE);
                i += 2;
            }
            Some(&QUOTE) => break,
            Some(&b) => {
                buf.push(b);
                i += 1;
            }
        }
    }

    let after = i + 1;
    let next = match line.get(after) {
        None => None,
        Some(&DELIMITER) => Some(after + 1),
        Some(_) => return Err(ParseError::at(ParseErrorKind::UnexpectedAfterQuote, after)),
    };

    let field = String::from_utf8(buf).map_err(|e| {
        let offset = start + 1 + e.utf8_error().valid_up_to();
        ParseError::at(ParseErrorKind::InvalidUtf8, offset)
    })?;

    Ok((field, next))
}

fn parse_unquoted(line: &[u8], start: usize) -> Result<(String, Option<usize>), ParseError> {
    let rest = &line[start..];
    let end = rest
        .iter()
        .position(|&b| b == DELIMITER)
        .unwrap_or(rest.len());
    let raw = &rest[..end];

    if let Some(q) = raw.iter().position(|&b| b == QUOTE) {
        return Err(ParseError::at(ParseErrorKind::BareQuote, start + q));
    }

    let field = std::str::from_utf8(raw)
        .map_err(|e| ParseError::at(ParseErrorKind::InvalidUtf8, start + e.valid_up_to()))?
        .to_string();
    let next = (end < rest.len()).then_some(start + end + 1);

    Ok((field, next))
}

impl fmt::Display for Row {
    /// Formats the serialized line without its terminator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self
            .to_bytes_with(LineTerminator::Lf)
            .map_err(|_| fmt::Error)?;
        let line = strip_terminator(&bytes);
        f.write_str(&String::from_utf8_lossy(line))
    }
}

impl Index<usize> for Row {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.fields[index]
    }
}

impl From<Vec<String>> for Row {
    fn from(fields: Vec<String>) -> Self {
        Self { fields }
    }
}

impl From<&[&str]> for Row {
    fn from(fields: &[&str]) -> Self {
        fields.iter().copied().collect()
    }
}

impl<const N: usize> From<[&str; N]> for Row {
    fn from(fields: [&str; N]) -> Self {
        fields.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
