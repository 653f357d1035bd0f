//! CSV handler module
//!
//! Header-driven decoding and encoding of CSV rows, one line at a time.

pub mod decoder;
pub mod encoder;
pub mod lines;
pub mod row;

pub use decoder::{Decodee, Decoder};
pub use encoder::{EncodeStats, Encodee, Encoder};
pub use lines::{LineReader, LineSource};
pub use row::{ParseError, ParseErrorKind, Row, DELIMITER, QUOTE};
