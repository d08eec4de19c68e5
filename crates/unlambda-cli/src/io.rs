//! `CharIo` wiring for real stdio.
//!
//! Kept separate from `unlambda-eval::BufferIo` (which exists purely for
//! in-process tests) because real stdio needs two things a test double
//! never does: a flush discipline under `-u`, and — when the program text
//! itself came from standard input — continuing to read from that exact
//! same handle for `@`/`|` rather than a fresh one.

use std::io::{Read, Write};

use unlambda_eval::CharIo;

/// Reads bytes from `R`, writes bytes to `W`. `unbuffered` controls
/// whether every write is flushed immediately (`-u`) or left to the
/// writer's own buffering.
pub struct StdIo<R, W> {
    reader: R,
    writer: W,
    unbuffered: bool,
}

impl<R: Read, W: Write> StdIo<R, W> {
    pub fn new(reader: R, writer: W, unbuffered: bool) -> Self {
        StdIo {
            reader,
            writer,
            unbuffered,
        }
    }
}

impl<R: Read, W: Write> CharIo for StdIo<R, W> {
    fn read_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.reader.read(&mut buf) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(buf[0]),
        }
    }

    fn write_byte(&mut self, byte: u8) {
        let _ = self.writer.write_all(&[byte]);
        if self.unbuffered {
            let _ = self.writer.flush();
        }
    }
}
