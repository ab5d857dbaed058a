//! Byte ranges and the per-chunk walk ledger

use crate::{
    chunk::{ChunkKind, ChunkType, RawChunk},
    error::ErrorKind,
};
use std::fmt;

/// A byte range in the input buffer (offset and size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    /// Offset from start of buffer
    pub offset: u64,
    /// Size in bytes
    pub size: u64,
}

impl ByteRange {
    /// Create a new byte range
    pub fn new(offset: u64, size: u64) -> Self {
        Self { offset, size }
    }

    /// Get the end offset of this range
    pub fn end_offset(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }

    /// Check if this range is immediately followed by another (contiguous)
    pub fn is_contiguous_with(&self, other: &ByteRange) -> bool {
        self.end_offset() == other.offset
    }

    /// Borrow this range out of `buf`, or `None` if it does not fit
    ///
    /// Never panics, including on offset overflow.
    pub fn slice<'a>(&self, buf: &'a [u8]) -> Option<&'a [u8]> {
        let start = usize::try_from(self.offset).ok()?;
        let end = start.checked_add(usize::try_from(self.size).ok()?)?;
        buf.get(start..end)
    }
}

/// Outcome of validating one walked chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkStatus {
    /// CRC matched and the chunk decoded
    Valid,
    /// CRC mismatch recorded in lenient mode; not decoded, never reconstructed
    Invalid { expected: u32, actual: u32 },
    /// CRC matched but a semantic rule rejected the chunk (lenient mode)
    Rejected(ErrorKind),
}

impl ChunkStatus {
    /// Only valid chunks take part in reconstruction
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// One chunk as recorded by the walk, in stream order
///
/// The store keeps one entry per chunk regardless of kind; reconstruction
/// works exclusively from these ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkEntry {
    /// Type tag
    pub chunk_type: ChunkType,
    /// Logical kind
    pub kind: ChunkKind,
    /// Declared payload length
    pub length: u32,
    /// Stored CRC
    pub crc: u32,
    /// Whole chunk on the wire, length field through CRC
    pub range: ByteRange,
    /// Validation outcome
    pub status: ChunkStatus,
}

impl ChunkEntry {
    pub(crate) fn from_raw(raw: &RawChunk<'_>, status: ChunkStatus) -> Self {
        Self {
            chunk_type: raw.chunk_type,
            kind: raw.kind(),
            length: raw.length,
            crc: raw.crc,
            range: raw.range(),
            status,
        }
    }

    /// Range of the payload alone
    pub fn payload_range(&self) -> ByteRange {
        ByteRange::new(self.range.offset + 8, self.length as u64)
    }
}

impl fmt::Display for ChunkEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}: {} bytes, crc 0x{:08x}",
            self.chunk_type, self.range.offset, self.length, self.crc
        )?;
        match self.status {
            ChunkStatus::Valid => f.write_str(" [ok]"),
            ChunkStatus::Invalid { actual, .. } => {
                write!(f, " [crc mismatch, computed 0x{:08x}]", actual)
            }
            ChunkStatus::Rejected(kind) => write!(f, " [rejected: {:?}]", kind),
        }
    }
}
