//! Character I/O, injected so the machine can be driven without touching
//! real stdio.
//!
//! `getchar`/`putchar` are external collaborators the evaluator calls
//! into; making that boundary an explicit trait is what lets `@`/`?`/`|`
//! be unit-tested in-process instead of only end-to-end.

/// Byte-oriented input/output, matching the reference interpreter's
/// `getchar`/`putchar` exactly: `read_byte` returns `None` at end of input
/// rather than a sentinel integer, and `write_byte` never fails (output is
/// best-effort, matching `putchar`'s return value being ignored).
pub trait CharIo {
    fn read_byte(&mut self) -> Option<u8>;
    fn write_byte(&mut self, byte: u8);
}

/// An in-memory `CharIo`: reads from a fixed input buffer, writes into a
/// growable output buffer. Used by this crate's own tests and by
/// `unlambda-cli`'s end-to-end tests that want to assert on captured
/// output without spawning a subprocess.
#[derive(Debug, Default, Clone)]
pub struct BufferIo {
    input: std::collections::VecDeque<u8>,
    pub output: Vec<u8>,
}

impl BufferIo {
    pub fn new(input: impl Into<Vec<u8>>) -> Self {
        BufferIo {
            input: input.into().into(),
            output: Vec::new(),
        }
    }

    pub fn output_as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }
}

impl CharIo for BufferIo {
    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }
}
