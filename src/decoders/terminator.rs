//! IEND: end of stream

use crate::{chunk::RawChunk, error::FormatError};

/// Decoded IEND chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminatorMarker {
    pub offset: u64,
}

impl TerminatorMarker {
    pub fn decode(raw: &RawChunk<'_>) -> Result<Self, FormatError> {
        if raw.length != 0 {
            return Err(FormatError::NonEmptyTerminator {
                offset: raw.offset,
                len: raw.length,
            });
        }
        Ok(Self { offset: raw.offset })
    }
}
