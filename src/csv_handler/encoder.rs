use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use super::row::Row;
use crate::config::{CodecConfig, LineTerminator};
use crate::error::{BoxError, CsvHelperError, MissingField};

/// Supplies the value of one field while a row is being encoded.
pub trait Encodee {
    /// Returns the value for `key`. Returning an error abandons the current row.
    fn produce_field(&mut self, key: &str) -> Result<String, BoxError>;
}

impl<E: Encodee + ?Sized> Encodee for &mut E {
    fn produce_field(&mut self, key: &str) -> Result<String, BoxError> {
        (**self).produce_field(key)
    }
}

impl Encodee for HashMap<String, String> {
    fn produce_field(&mut self, key: &str) -> Result<String, BoxError> {
        self.get(key)
            .cloned()
            .ok_or_else(|| MissingField(key.to_string()).into())
    }
}

impl Encodee for BTreeMap<String, String> {
    fn produce_field(&mut self, key: &str) -> Result<String, BoxError> {
        self.get(key)
            .cloned()
            .ok_or_else(|| MissingField(key.to_string()).into())
    }
}

/// Statistics for rows written by an [`Encoder`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EncodeStats {
    /// Number of data rows written (the header is not counted).
    pub rows_written: u64,
    /// Width in bytes of the widest data row, counting field content and separators.
    pub largest_row_bytes: usize,
}

/// Row-at-a-time CSV encoder.
///
/// The header is written to the sink as soon as the encoder is created. Each
/// [`encode`](Encoder::encode) call asks an [`Encodee`] for one value per header
/// key, in header order, and writes the resulting row. A row is serialized in
/// full before any of it reaches the sink, and a row whose write fails is
/// never written again by a later call.
///
/// Every line is flushed to the sink when written. The sink is never closed;
/// pass `&mut sink` to keep ownership with the caller.
///
/// # Example
///
/// ```
/// use csv_helper::{CodecConfig, Encoder, LineTerminator, Row};
/// use std::collections::HashMap;
///
/// let config = CodecConfig::default().terminator(LineTerminator::Lf);
/// let mut out: Vec<u8> = Vec::new();
/// let mut encoder = Encoder::with_config(&mut out, Row::from(["name", "age"]), &config).unwrap();
///
/// let mut person = HashMap::new();
/// person.insert("age".to_string(), "30".to_string());
/// person.insert("name".to_string(), "Alice".to_string());
/// encoder.encode(&mut person).unwrap();
/// drop(encoder);
///
/// assert_eq!(out, b"name,age\nAlice,30\n");
/// ```
pub struct Encoder<W: Write> {
    sink: W,
    terminator: LineTerminator,
    header: Row,
    stats: EncodeStats,
}

impl<W: Write> Encoder<W> {
    /// Creates an encoder and writes `header` to the sink.
    pub fn new(sink: W, header: Row) -> Result<Self, CsvHelperError> {
        Self::with_config(sink, header, &CodecConfig::default())
    }

    /// Creates an encoder with explicit configuration and writes `header` to the sink.
    pub fn with_config(sink: W, header: Row, config: &CodecConfig) -> Result<Self, CsvHelperError> {
        let line = header.to_bytes_with(config.terminator)?;
        let mut encoder = Self {
            sink,
            terminator: config.terminator,
            header,
            stats: EncodeStats::default(),
        };
        encoder.write_line(&line)?;
        tracing::debug!(fields = encoder.header.len(), "wrote CSV header");

        Ok(encoder)
    }

    /// Encodes one row from `source`.
    ///
    /// Nothing is written if `source` fails for any key.
    pub fn encode<E: Encodee + ?Sized>(&mut self, source: &mut E) -> Result<(), CsvHelperError> {
        let mut row = Row::new();
        for key in self.header.iter() {
            let value = source.produce_field(key).map_err(CsvHelperError::Callback)?;
            row.push(value);
        }

        let line = row.to_bytes_with(self.terminator)?;
        self.write_line(&line)?;

        let bytes = row.iter().map(str::len).sum::<usize>() + row.len().saturating_sub(1);
        self.stats.rows_written += 1;
        self.stats.largest_row_bytes = self.stats.largest_row_bytes.max(bytes);
        tracing::trace!(rows = self.stats.rows_written, "encoded CSV row");

        Ok(())
    }

    /// Returns the header row.
    pub fn header(&self) -> &Row {
        &self.header
    }

    /// Returns a reference to the current write statistics.
    pub fn stats(&self) -> &EncodeStats {
        &self.stats
    }

    /// Flushes the sink.
    pub fn flush(&mut self) -> Result<(), CsvHelperError> {
        self.sink.flush().map_err(CsvHelperError::Write)
    }

    /// Flushes and returns the sink.
    pub fn into_inner(mut self) -> Result<W, CsvHelperError> {
        self.flush()?;
        Ok(self.sink)
    }

    /// Pushes one serialized line straight through to the sink.
    ///
    /// Nothing is buffered between calls, so a failed line is not retried later.
    fn write_line(&mut self, line: &[u8]) -> Result<(), CsvHelperError> {
        self.sink.write_all(line).map_err(CsvHelperError::Write)?;
        self.sink.flush().map_err(CsvHelperError::Write)
    }
}
