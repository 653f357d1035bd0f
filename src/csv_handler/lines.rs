//! Line sources feeding the [`Decoder`](super::Decoder).
//!
//! A [`LineSource`] yields one raw line per call, already stripped of its
//! terminator, in forward order. The decoder only borrows the behavior; the
//! caller keeps ownership of whatever sits underneath.

use std::io::{self, BufRead};

use super::row::{DELIMITER, QUOTE};

/// Forward-only provider of raw lines.
pub trait LineSource {
    /// Returns the next line without its terminator, or `None` at end of input.
    fn next_line(&mut self) -> Option<io::Result<Vec<u8>>>;
}

impl<L: LineSource + ?Sized> LineSource for &mut L {
    fn next_line(&mut self) -> Option<io::Result<Vec<u8>>> {
        (**self).next_line()
    }
}

/// [`LineSource`] over any [`BufRead`].
///
/// By default the reader is record-aware: when a physical line leaves a quoted
/// field open, the following physical lines are appended (terminators included)
/// until the quote closes or input runs out. A field only counts as quoted when
/// the quote is its first byte, so a stray quote inside an unquoted field does
/// not pull in the lines after it. Use [`LineReader::physical`] to get
/// exactly one physical line per call.
///
/// # Example
///
/// ```
/// use csv_helper::{LineReader, LineSource};
///
/// let mut lines = LineReader::new("a,\"b\nc\"\nd\n".as_bytes());
/// assert_eq!(lines.next_line().unwrap().unwrap(), b"a,\"b\nc\"");
/// assert_eq!(lines.next_line().unwrap().unwrap(), b"d");
/// assert!(lines.next_line().is_none());
/// ```
#[derive(Debug)]
pub struct LineReader<R> {
    reader: R,
    join_quoted: bool,
}

impl<R: BufRead> LineReader<R> {
    /// Creates a record-aware line reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            join_quoted: true,
        }
    }

    /// Creates a reader that splits on every physical line terminator.
    pub fn physical(reader: R) -> Self {
        Self {
            reader,
            join_quoted: false,
        }
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_physical(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        self.reader.read_until(b'\n', buf)
    }
}

impl<R: BufRead> LineSource for LineReader<R> {
    fn next_line(&mut self) -> Option<io::Result<Vec<u8>>> {
        let mut buf = Vec::new();

        match self.read_physical(&mut buf) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(e) => return Some(Err(e)),
        }

        if self.join_quoted {
            while ends_inside_quotes(&buf) {
                match self.read_physical(&mut buf) {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(e) => return Some(Err(e)),
                }
            }
        }

        strip_terminator(&mut buf);
        Some(Ok(buf))
    }
}

/// Whether `bytes` stop in the middle of a quoted field.
fn ends_inside_quotes(bytes: &[u8]) -> bool {
    let mut quoted = false;
    let mut field_start = true;
    let mut i = 0;

    while i < bytes.len() {
        match (quoted, bytes[i]) {
            (true, QUOTE) if bytes.get(i + 1) == Some(&QUOTE) => i += 1,
            (true, QUOTE) => quoted = false,
            (false, DELIMITER) => {
                field_start = true;
                i += 1;
                continue;
            }
            (false, QUOTE) if field_start => quoted = true,
            _ => {}
        }
        field_start = false;
        i += 1;
    }

    quoted
}

fn strip_terminator(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}
