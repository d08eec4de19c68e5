//! Byte cursor over an arbitrary [`Read`] source, tracking line/column for
//! diagnostics. Unlambda source is a stream of single-byte tokens — there is
//! no need to decode UTF-8 — so this reads raw bytes, matching the
//! reference interpreter's `fgetc`.
//!
//! Deliberately unbuffered: when a program is read from standard input, the
//! same handle is reused afterward for `@`/`|`'s runtime reads, the way the
//! reference interpreter's `parse()` and `getchar()` share one `FILE*`. A
//! `BufReader` here would read ahead past the end of the program and strand
//! those bytes when the parser dropped its buffer, silently eating the
//! input a running program expects to see next.

use std::io::Read;

use crate::error::Result;

pub struct Cursor<R> {
    inner: R,
    line: u32,
    column: u32,
}

impl<R: Read> Cursor<R> {
    pub fn new(reader: R) -> Self {
        Cursor {
            inner: reader,
            line: 1,
            column: 0,
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// Read the next byte, or `None` at end of input. Advances line/column
    /// bookkeeping so error messages can point at the offending byte.
    pub fn next_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        let n = self.inner.read(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        if buf[0] == b'\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Ok(Some(buf[0]))
    }

    /// Skip whitespace and `#`-to-end-of-line comments, returning the next
    /// significant byte (or `None` at end of input).
    pub fn next_significant_byte(&mut self) -> Result<Option<u8>> {
        loop {
            let Some(b) = self.next_byte()? else {
                return Ok(None);
            };
            if b == b'#' {
                loop {
                    match self.next_byte()? {
                        None => return Ok(None),
                        Some(b'\n') => break,
                        Some(_) => continue,
                    }
                }
                continue;
            }
            if (b as char).is_whitespace() {
                continue;
            }
            return Ok(Some(b));
        }
    }
}
