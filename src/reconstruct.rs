//! Structural reconstruction
//!
//! Emits the signature followed by the verbatim bytes of every retained,
//! validated chunk. Nothing is re-encoded from decoded fields, so retained
//! chunks come out bit-exact.

use crate::{
    chunk::{ChunkKind, ChunkType},
    error::{Error, Result},
    processing_writer::ProcessingWriter,
    segment::ByteRange,
    signature::PNG_SIGNATURE,
    store::ChunkStore,
};
use std::collections::HashSet;
use std::io::Write;
use tracing::info;

/// Chunk kinds to keep when reconstructing
///
/// The default is [`RetainSet::critical`].
///
/// # Example
///
/// ```
/// use png_chunk_io::{ChunkKind, RetainSet};
///
/// let keep = RetainSet::critical().with(ChunkKind::Gamma);
/// assert!(keep.contains(&ChunkKind::Gamma));
/// assert!(!keep.contains(&ChunkKind::Unknown(png_chunk_io::ChunkType(*b"tEXt"))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetainSet {
    kinds: HashSet<ChunkKind>,
    all_unknown: bool,
    dropped_unknown: HashSet<ChunkType>,
}

impl RetainSet {
    /// Keep nothing but the signature
    pub fn empty() -> Self {
        Self {
            kinds: HashSet::new(),
            all_unknown: false,
            dropped_unknown: HashSet::new(),
        }
    }

    /// Header, palette, image data and terminator
    pub fn critical() -> Self {
        Self::empty()
            .with(ChunkKind::Header)
            .with(ChunkKind::Palette)
            .with(ChunkKind::ImageData)
            .with(ChunkKind::Terminator)
    }

    /// Every kind, unknown tags included
    pub fn all() -> Self {
        Self::critical().with(ChunkKind::Gamma).with_all_unknown()
    }

    /// Also keep `kind`
    pub fn with(mut self, kind: ChunkKind) -> Self {
        if let ChunkKind::Unknown(tag) = kind {
            self.dropped_unknown.remove(&tag);
        }
        self.kinds.insert(kind);
        self
    }

    /// Stop keeping `kind`
    pub fn without(mut self, kind: ChunkKind) -> Self {
        if let ChunkKind::Unknown(tag) = kind {
            self.dropped_unknown.insert(tag);
        }
        self.kinds.remove(&kind);
        self
    }

    /// Keep every unknown tag not explicitly dropped
    pub fn with_all_unknown(mut self) -> Self {
        self.all_unknown = true;
        self
    }

    pub fn contains(&self, kind: &ChunkKind) -> bool {
        match kind {
            ChunkKind::Unknown(tag) if self.all_unknown => !self.dropped_unknown.contains(tag),
            kind => self.kinds.contains(kind),
        }
    }
}

impl Default for RetainSet {
    fn default() -> Self {
        Self::critical()
    }
}

/// Re-emits a filtered copy of a parsed stream
///
/// Borrows the original buffer and the store built from it. Chunks that
/// failed validation are never emitted.
#[derive(Debug, Clone, Copy)]
pub struct Reconstructor<'a> {
    source: &'a [u8],
    store: &'a ChunkStore,
}

impl<'a> Reconstructor<'a> {
    /// Pair a buffer with the store parsed from it
    pub fn new(source: &'a [u8], store: &'a ChunkStore) -> Result<Self> {
        if source.len() as u64 != store.total_size {
            return Err(Error::SourceMismatch {
                expected: store.total_size,
                actual: source.len() as u64,
            });
        }
        Ok(Self { source, store })
    }

    /// Byte ranges that `retain` selects, in stream order
    pub fn ranges(&self, retain: &RetainSet) -> Vec<ByteRange> {
        self.store.valid_ranges(|kind| retain.contains(kind))
    }

    /// Size of the reconstructed stream
    pub fn output_len(&self, retain: &RetainSet) -> u64 {
        PNG_SIGNATURE.len() as u64 + self.ranges(retain).iter().map(|r| r.size).sum::<u64>()
    }

    /// Write the reconstructed stream, returning the number of bytes written
    pub fn write_to<W: Write>(&self, writer: &mut W, retain: &RetainSet) -> Result<u64> {
        let ranges = self.ranges(retain);
        writer.write_all(&PNG_SIGNATURE)?;
        let mut written = PNG_SIGNATURE.len() as u64;

        for range in &ranges {
            let bytes = range.slice(self.source).ok_or(Error::SourceMismatch {
                expected: range.end_offset(),
                actual: self.source.len() as u64,
            })?;
            writer.write_all(bytes)?;
            written += range.size;
        }
        writer.flush()?;

        info!(
            chunks = ranges.len(),
            dropped = self.store.entries().len() - ranges.len(),
            bytes = written,
            "reconstructed PNG stream"
        );
        Ok(written)
    }

    /// Reconstruct into a new buffer
    pub fn to_vec(&self, retain: &RetainSet) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.output_len(retain) as usize);
        self.write_to(&mut out, retain)?;
        Ok(out)
    }

    /// Write the reconstructed stream while handing every emitted byte to
    /// `processor` (for example a hasher)
    pub fn write_with_processing<W: Write, F: FnMut(&[u8])>(
        &self,
        writer: W,
        retain: &RetainSet,
        processor: F,
    ) -> Result<u64> {
        let mut pw = ProcessingWriter::new(writer, processor);
        self.write_to(&mut pw, retain)?;
        Ok(pw.bytes_written())
    }
}

/// Reconstruct `source` keeping only chunks in `retain`
pub fn reconstruct(source: &[u8], store: &ChunkStore, retain: &RetainSet) -> Result<Vec<u8>> {
    Reconstructor::new(source, store)?.to_vec(retain)
}
