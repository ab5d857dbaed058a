//! Processing writer wrapper for single-pass write-and-observe operations
//!
//! Reconstruction streams its output through this wrapper so a caller can
//! hash or inspect the emitted bytes without re-reading them.

use std::io::{Result, Write};

/// A writer wrapper that hands every accepted byte to a callback
///
/// Only the bytes the inner writer actually accepted are processed, so a
/// short `write` never double-counts.
///
/// # Example
///
/// ```rust
/// use std::io::Write;
/// use png_chunk_io::processing_writer::ProcessingWriter;
///
/// let mut output = Vec::new();
/// let mut crc = crc32fast::Hasher::new();
///
/// let mut writer = ProcessingWriter::new(&mut output, |data| crc.update(data));
/// writer.write_all(b"IEND")?;
/// assert_eq!(writer.bytes_written(), 4);
/// drop(writer);
///
/// assert_eq!(crc.finalize(), 0xAE42_6082);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct ProcessingWriter<W: Write, F: FnMut(&[u8])> {
    writer: W,
    processor: F,
    written: u64,
}

impl<W: Write, F: FnMut(&[u8])> ProcessingWriter<W, F> {
    /// Create a new processing writer
    ///
    /// # Arguments
    ///
    /// * `writer` - The underlying writer to forward data to
    /// * `processor` - Callback that observes each accepted run of bytes
    pub fn new(writer: W, processor: F) -> Self {
        Self {
            writer,
            processor,
            written: 0,
        }
    }

    /// Total bytes forwarded so far
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Consume the wrapper and return the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Get a reference to the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}

impl<W: Write, F: FnMut(&[u8])> Write for ProcessingWriter<W, F> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let n = self.writer.write(buf)?;
        (self.processor)(&buf[..n]);
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }
}
