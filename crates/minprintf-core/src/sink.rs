//! Output sinks.
//!
//! Every formatting call writes through a [`Sink`], which counts the logical
//! length of the output independently of where (or whether) the bytes land.
//!
//! - [`BoundedWriter`]: `snprintf` semantics over a caller-owned byte slice.
//! - [`CountingSink`]: length only, the `snprintf(NULL, 0, ...)` idiom.
//! - [`StreamSink`]: forwards to a [`Stream`] transport (console, UART, file).
//!
//! Invariant shared by all sinks: `total()` equals the number of bytes the
//! output would occupy in an unbounded destination.

/// Destination for formatted bytes.
pub trait Sink {
    /// Accept a run of bytes. Bytes that do not fit are dropped, never an error.
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Accept `count` copies of `byte` (padding).
    fn write_repeated(&mut self, byte: u8, count: usize) {
        let chunk = [byte; 32];
        let mut left = count;
        while left > 0 {
            let n = left.min(chunk.len());
            self.write_bytes(&chunk[..n]);
            left -= n;
        }
    }

    /// Logical length accepted so far.
    fn total(&self) -> usize;
}

// ---------------------------------------------------------------------------
// Bounded writer
// ---------------------------------------------------------------------------

/// Bounded writer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Room remains before the terminator slot.
    Writing,
    /// The cursor reached `capacity - 1` (or capacity is 0); further bytes
    /// are counted but not stored. Sticky for the rest of the call.
    Saturated,
}

/// `snprintf`-style writer over a fixed-capacity byte slice.
///
/// Invariants:
/// - `pos <= capacity.saturating_sub(1)`: the last slot is reserved for NUL.
/// - `pos <= total`.
/// - The slice is never touched when its capacity is 0.
/// - [`BoundedWriter::finish`] writes exactly one NUL at `pos`.
#[derive(Debug)]
pub struct BoundedWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
    total: usize,
}

impl<'a> BoundedWriter<'a> {
    /// Wrap `buf`; its length is the capacity, terminator included.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            total: 0,
        }
    }

    /// Capacity of the destination, terminator included.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes stored so far (excluding the terminator).
    #[must_use]
    pub fn written(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn state(&self) -> WriterState {
        if self.pos >= self.limit() {
            WriterState::Saturated
        } else {
            WriterState::Writing
        }
    }

    /// Terminate the output and return the logical length.
    pub fn finish(self) -> usize {
        if let Some(slot) = self.buf.get_mut(self.pos) {
            *slot = 0;
        }
        self.total
    }

    fn limit(&self) -> usize {
        self.buf.len().saturating_sub(1)
    }

    fn room(&self) -> usize {
        self.limit() - self.pos
    }
}

impl Sink for BoundedWriter<'_> {
    fn write_bytes(&mut self, bytes: &[u8]) {
        let n = bytes.len().min(self.room());
        if n > 0 {
            self.buf[self.pos..self.pos + n].copy_from_slice(&bytes[..n]);
            self.pos += n;
        }
        self.total = self.total.saturating_add(bytes.len());
    }

    fn write_repeated(&mut self, byte: u8, count: usize) {
        let n = count.min(self.room());
        if n > 0 {
            self.buf[self.pos..self.pos + n].fill(byte);
            self.pos += n;
        }
        self.total = self.total.saturating_add(count);
    }

    fn total(&self) -> usize {
        self.total
    }
}

// ---------------------------------------------------------------------------
// Counting sink
// ---------------------------------------------------------------------------

/// Sink that only measures.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingSink {
    total: usize,
}

impl CountingSink {
    #[must_use]
    pub const fn new() -> Self {
        Self { total: 0 }
    }
}

impl Sink for CountingSink {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.total = self.total.saturating_add(bytes.len());
    }

    fn write_repeated(&mut self, _byte: u8, count: usize) {
        self.total = self.total.saturating_add(count);
    }

    fn total(&self) -> usize {
        self.total
    }
}

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

/// Byte transport behind [`crate::format_to_stream`].
pub trait Stream {
    type Error;

    /// Write all of `bytes` or fail.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<S: Stream + ?Sized> Stream for &mut S {
    type Error = S::Error;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write_all(bytes)
    }
}

/// Unbounded sink over a [`Stream`].
///
/// The first transport error is kept and stops further writes; counting
/// continues so the logical length stays meaningful.
#[derive(Debug)]
pub struct StreamSink<S: Stream> {
    stream: S,
    total: usize,
    error: Option<S::Error>,
}

impl<S: Stream> StreamSink<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            total: 0,
            error: None,
        }
    }

    /// Logical length, or the first transport error.
    pub fn finish(self) -> Result<usize, S::Error> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.total),
        }
    }
}

impl<S: Stream> Sink for StreamSink<S> {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.total = self.total.saturating_add(bytes.len());
        if self.error.is_none() && !bytes.is_empty() {
            if let Err(err) = self.stream.write_all(bytes) {
                self.error = Some(err);
            }
        }
    }

    fn write_repeated(&mut self, byte: u8, count: usize) {
        let chunk = [byte; 32];
        let mut left = count;
        while left > 0 && self.error.is_none() {
            let n = left.min(chunk.len());
            self.write_bytes(&chunk[..n]);
            left -= n;
        }
        // Nothing more reaches the stream once it has failed.
        self.total = self.total.saturating_add(left);
    }

    fn total(&self) -> usize {
        self.total
    }
}

/// [`Stream`] adapter for any `std::io::Write`.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoStream<W: std::io::Write>(pub W);

#[cfg(feature = "std")]
impl<W: std::io::Write> Stream for IoStream<W> {
    type Error = std::io::Error;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.0.write_all(bytes)
    }
}
