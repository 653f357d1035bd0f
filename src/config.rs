//! Codec configuration
//!
//! [`CodecConfig`] carries the few knobs the codec has. The delimiter and quote
//! character are part of the wire format and are not configurable.
//!
//! Configuration can be built in code or loaded from a JSON file:
//!
//! ```json
//! {
//!     "field_size_limit": 4096,
//!     "terminator": "crlf"
//! }
//! ```
//!
//! Both keys are optional.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::CsvHelperError;

/// Line terminator written after each encoded row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineTerminator {
    /// The terminator used by the current platform.
    #[must_use]
    pub fn platform() -> Self {
        if cfg!(windows) {
            LineTerminator::CrLf
        } else {
            LineTerminator::Lf
        }
    }

    pub(crate) fn to_csv(self) -> csv::Terminator {
        match self {
            LineTerminator::Lf => csv::Terminator::Any(b'\n'),
            LineTerminator::CrLf => csv::Terminator::CRLF,
        }
    }
}

impl Default for LineTerminator {
    fn default() -> Self {
        LineTerminator::platform()
    }
}

/// Options shared by [`Decoder`](crate::Decoder) and [`Encoder`](crate::Encoder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Maximum field length in bytes accepted by the decoder.
    pub field_size_limit: Option<usize>,
    /// Terminator appended to every line the encoder writes.
    pub terminator: LineTerminator,
}

impl CodecConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, CsvHelperError> {
        let file = File::open(path).map_err(|e| {
            CsvHelperError::Config(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let reader = BufReader::new(file);

        serde_json::from_reader(reader).map_err(|e| {
            CsvHelperError::Config(format!("Invalid config in {}: {}", path.display(), e))
        })
    }

    /// Sets the decoder field size limit.
    #[must_use]
    pub fn field_size_limit(mut self, limit: usize) -> Self {
        self.field_size_limit = Some(limit);
        self
    }

    /// Sets the encoder line terminator.
    #[must_use]
    pub fn terminator(mut self, terminator: LineTerminator) -> Self {
        self.terminator = terminator;
        self
    }
}
