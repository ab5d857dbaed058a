//! CRC-32 verification of chunk type + payload

use crate::{chunk::RawChunk, error::FormatError};
use tracing::trace;

/// Calculate the PNG CRC-32 over `chunk_type ++ data`
pub fn chunk_crc(chunk_type: &[u8; 4], data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    hasher.finalize()
}

/// Result of checking one chunk's stored CRC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrcCheck {
    Valid,
    /// `expected` is the stored value, `actual` the computed one
    Invalid { expected: u32, actual: u32 },
}

impl CrcCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Recompute and compare the CRC of a raw chunk
pub fn verify(chunk: &RawChunk<'_>) -> CrcCheck {
    let actual = chunk_crc(&chunk.chunk_type.0, chunk.payload);
    trace!(
        tag = %chunk.chunk_type,
        offset = chunk.offset,
        stored = chunk.crc,
        computed = actual,
        "crc check"
    );
    if actual == chunk.crc {
        CrcCheck::Valid
    } else {
        CrcCheck::Invalid {
            expected: chunk.crc,
            actual,
        }
    }
}

/// Like [`verify`], but as a `ChecksumMismatch` error
pub fn verify_strict(chunk: &RawChunk<'_>) -> Result<(), FormatError> {
    match verify(chunk) {
        CrcCheck::Valid => Ok(()),
        CrcCheck::Invalid { expected, actual } => Err(FormatError::ChecksumMismatch {
            tag: chunk.chunk_type,
            offset: chunk.offset,
            expected,
            actual,
        }),
    }
}
