//! Error module
//!
//! Defines the error types shared by the row parser, the decoder and the encoder.
//! Every failure is returned to the direct caller; nothing here is logged or retried.

use thiserror::Error;

use crate::csv_handler::ParseError;

/// Opaque error produced by a [`Decodee`](crate::Decodee) or [`Encodee`](crate::Encodee).
///
/// The codec never inspects it. Callers can downcast it back to their own type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for CSV Helper.
///
/// # Error Categories
///
/// - **Termination**: [`EndOfInput`](CsvHelperError::EndOfInput) is the normal "no more rows"
///   signal and is not a corruption
/// - **Input errors**: malformed lines, rows wider than the header, oversized fields
/// - **I/O errors**: the line source or the sink failed
/// - **Callback errors**: a decodee or encodee rejected a field
///
/// # Example
///
/// ```rust,ignore
/// loop {
///     match decoder.decode(&mut target) {
///         Ok(()) => {}
///         Err(e) if e.is_end_of_input() => break,
///         Err(e) => return Err(e),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum CsvHelperError {
    /// The line source has no more lines.
    #[error("end of input")]
    EndOfInput,

    /// A line could not be split into fields.
    #[error("line {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: ParseError,
    },

    /// A row has more fields than the header declares.
    #[error("line {line}: invalid row length, {fields} fields but header has {header}")]
    InvalidRow { line: u64, fields: usize, header: usize },

    /// A field exceeds the configured size limit.
    #[error("line {line}: field {field} exceeds size limit of {limit} bytes (actual: {actual} bytes)")]
    FieldTooLarge {
        line: u64,
        field: usize,
        limit: usize,
        actual: usize,
    },

    /// The line source failed while reading.
    #[error("read error: {0}")]
    Read(#[source] std::io::Error),

    /// The sink rejected a write or flush.
    #[error("write error: {0}")]
    Write(#[source] std::io::Error),

    /// The row serializer failed.
    #[error("serialize error: {0}")]
    Serialize(#[from] csv::Error),

    /// A configuration file could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// A decodee or encodee reported a failure.
    ///
    /// The inner error is passed through exactly as the callback returned it.
    #[error("callback error: {0}")]
    Callback(#[source] BoxError),
}

impl CsvHelperError {
    /// Returns true for the end-of-input signal.
    #[must_use]
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, CsvHelperError::EndOfInput)
    }

    /// Returns the line number the error refers to, when it has one.
    #[must_use]
    pub fn line(&self) -> Option<u64> {
        match self {
            CsvHelperError::Parse { line, .. }
            | CsvHelperError::InvalidRow { line, .. }
            | CsvHelperError::FieldTooLarge { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Returned by the map-backed encodees when a header key has no entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing field: {0}")]
pub struct MissingField(pub String);
