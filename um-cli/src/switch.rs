//! Output sink that switches destination after a fixed number of bytes.

use std::io::{self, Write};

/// Sends the first `bytes_before_switch` bytes to `first` and everything
/// after to `second`.
///
/// `first` is flushed as soon as its last byte has been written, so a
/// console can show an introduction while the rest goes to a file.
#[derive(Debug)]
pub struct SwitchSink<A, B> {
    remaining: usize,
    first: A,
    second: B,
}

impl<A: Write, B: Write> SwitchSink<A, B> {
    pub fn new(bytes_before_switch: usize, first: A, second: B) -> Self {
        Self {
            remaining: bytes_before_switch,
            first,
            second,
        }
    }

    /// Bytes still owed to `first`.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: Write, B: Write> Write for SwitchSink<A, B> {
    /// Writes at most up to the switch point in one call; `write_all`
    /// routes the remainder to `second` on its next iteration.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return self.second.write(buf);
        }
        let len = buf.len().min(self.remaining);
        let written = self.first.write(&buf[..len])?;
        self.remaining -= written;
        if self.remaining == 0 {
            self.first.flush()?;
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}
