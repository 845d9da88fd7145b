use std::io::BufRead;

use crate::error::{GoldenError, Result};

/// Line reader over raw bytes that numbers lines from 1.
///
/// Each line is returned without its `\n` or `\r\n` terminator. A line that
/// is not valid UTF-8 is a [`GoldenError::Parse`] at that line, so binary
/// garbage in a dump is located like any other bad record.
pub(crate) struct RecordLines<'a, R> {
    reader: R,
    source: &'a str,
    line: usize,
    buf: Vec<u8>,
}

impl<'a, R: BufRead> RecordLines<'a, R> {
    pub(crate) fn new(reader: R, source: &'a str) -> Self {
        RecordLines {
            reader,
            source,
            line: 0,
            buf: Vec::new(),
        }
    }

    /// The next line and its 1-based number, or `None` at end of input.
    pub(crate) fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        self.buf.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .map_err(|e| GoldenError::io(self.source, e))?;
        if read == 0 {
            return Ok(None);
        }
        self.line += 1;
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        match std::str::from_utf8(&self.buf) {
            Ok(text) => Ok(Some((self.line, text.to_string()))),
            Err(e) => Err(GoldenError::parse(
                self.source,
                self.line,
                &String::from_utf8_lossy(&self.buf),
                format!("invalid UTF-8 at byte {}", e.valid_up_to() + 1),
            )),
        }
    }
}
