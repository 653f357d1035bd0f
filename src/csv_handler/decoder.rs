use std::collections::{BTreeMap, HashMap};

use super::lines::LineSource;
use super::row::Row;
use crate::config::CodecConfig;
use crate::error::{BoxError, CsvHelperError};

/// Receives the fields of one decoded row as `(header key, value)` pairs.
///
/// Keys arrive in header order. A row shorter than the header never delivers
/// the trailing keys, so a key that is not called is the signal for an absent
/// optional column.
pub trait Decodee {
    /// Accepts one field. Returning an error stops the current row.
    fn receive_field(&mut self, key: &str, value: &str) -> Result<(), BoxError>;
}

impl<D: Decodee + ?Sized> Decodee for &mut D {
    fn receive_field(&mut self, key: &str, value: &str) -> Result<(), BoxError> {
        (**self).receive_field(key, value)
    }
}

impl Decodee for HashMap<String, String> {
    fn receive_field(&mut self, key: &str, value: &str) -> Result<(), BoxError> {
        self.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl Decodee for BTreeMap<String, String> {
    fn receive_field(&mut self, key: &str, value: &str) -> Result<(), BoxError> {
        self.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Row-at-a-time CSV decoder.
///
/// The first line of the source is captured as the header when the decoder is
/// created. Each [`decode`](Decoder::decode) call then consumes exactly one
/// line and hands its fields to a [`Decodee`].
///
/// Errors are not sticky: after a malformed row or a rejected field the next
/// call continues with the following line. Once the source is exhausted every
/// call returns [`CsvHelperError::EndOfInput`].
///
/// # Example
///
/// ```
/// use csv_helper::{Decoder, LineReader};
/// use std::collections::HashMap;
///
/// let mut decoder = Decoder::new(LineReader::new("name,age\nAlice,30\n".as_bytes())).unwrap();
/// let mut person: HashMap<String, String> = HashMap::new();
/// decoder.decode(&mut person).unwrap();
/// assert_eq!(person["age"], "30");
/// assert!(decoder.decode(&mut person).unwrap_err().is_end_of_input());
/// ```
#[derive(Debug)]
pub struct Decoder<L> {
    /// The line source. Pass `&mut source` to keep ownership with the caller.
    source: L,
    header: Row,
    field_size_limit: Option<usize>,
    /// Number of lines consumed so far (the header is line 1).
    line: u64,
    exhausted: bool,
}

impl<L: LineSource> Decoder<L> {
    /// Creates a decoder, reading the header from the first line.
    pub fn new(source: L) -> Result<Self, CsvHelperError> {
        Self::with_config(source, &CodecConfig::default())
    }

    /// Creates a decoder with explicit configuration.
    pub fn with_config(mut source: L, config: &CodecConfig) -> Result<Self, CsvHelperError> {
        let raw = match source.next_line() {
            Some(line) => line.map_err(CsvHelperError::Read)?,
            None => return Err(CsvHelperError::EndOfInput),
        };

        let header = Row::parse(&raw).map_err(|err| CsvHelperError::Parse {
            line: 1,
            source: err,
        })?;
        tracing::debug!(fields = header.len(), "captured CSV header");

        Ok(Self {
            source,
            header,
            field_size_limit: config.field_size_limit,
            line: 1,
            exhausted: false,
        })
    }

    /// Decodes the next row into `target`.
    ///
    /// Fields already delivered stay delivered when a later field fails.
    pub fn decode<D: Decodee + ?Sized>(&mut self, target: &mut D) -> Result<(), CsvHelperError> {
        let row = self.next_row()?;

        for (key, value) in self.header.iter().zip(row.iter()) {
            target
                .receive_field(key, value)
                .map_err(CsvHelperError::Callback)?;
        }

        Ok(())
    }

    /// Returns the header row.
    pub fn header(&self) -> &Row {
        &self.header
    }

    /// Returns the number of the last line consumed.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Returns the line source.
    pub fn into_inner(self) -> L {
        self.source
    }

    /// Reads and validates one row.
    fn next_row(&mut self) -> Result<Row, CsvHelperError> {
        if self.exhausted {
            return Err(CsvHelperError::EndOfInput);
        }

        let raw = match self.source.next_line() {
            Some(line) => line.map_err(CsvHelperError::Read)?,
            None => {
                self.exhausted = true;
                return Err(CsvHelperError::EndOfInput);
            }
        };

        // Advance before validating so the next call moves past a bad line
        self.line += 1;
        let line = self.line;

        let row = Row::parse(&raw).map_err(|err| CsvHelperError::Parse { line, source: err })?;

        if row.len() > self.header.len() {
            return Err(CsvHelperError::InvalidRow {
                line,
                fields: row.len(),
                header: self.header.len(),
            });
        }

        if let Some(limit) = self.field_size_limit {
            for (field, value) in row.iter().enumerate() {
                if value.len() > limit {
                    return Err(CsvHelperError::FieldTooLarge {
                        line,
                        field,
                        limit,
                        actual: value.len(),
                    });
                }
            }
        }

        tracing::trace!(line, fields = row.len(), "decoded CSV row");
        Ok(row)
    }
}
