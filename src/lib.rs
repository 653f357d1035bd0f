//! CSV Helper Library
//!
//! A small row-oriented CSV codec. A [`Decoder`] reads the header from the first
//! line of a [`LineSource`] and then hands each following line to a [`Decodee`]
//! as `(header key, value)` pairs. An [`Encoder`] writes a fixed header to a sink
//! and then asks an [`Encodee`] for one value per header key for every row.
//!
//! ```
//! use csv_helper::{Decoder, Encoder, LineReader, Row};
//! use std::collections::HashMap;
//!
//! let mut out: Vec<u8> = Vec::new();
//! let mut encoder = Encoder::new(&mut out, Row::from(["name", "age"])).unwrap();
//! let mut alice: HashMap<String, String> = HashMap::new();
//! alice.insert("name".to_string(), "Alice".to_string());
//! alice.insert("age".to_string(), "30".to_string());
//! encoder.encode(&mut alice).unwrap();
//! drop(encoder);
//!
//! let mut decoder = Decoder::new(LineReader::new(out.as_slice())).unwrap();
//! let mut decoded: HashMap<String, String> = HashMap::new();
//! decoder.decode(&mut decoded).unwrap();
//! assert_eq!(decoded, alice);
//! ```

pub mod config;
pub mod csv_handler;
pub mod error;

pub use config::{CodecConfig, LineTerminator};
pub use csv_handler::{
    Decodee, Decoder, EncodeStats, Encodee, Encoder, LineReader, LineSource, ParseError,
    ParseErrorKind, Row,
};
pub use error::{BoxError, CsvHelperError, MissingField};
