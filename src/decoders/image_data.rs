//! IDAT: one fragment of the compressed image stream

use crate::chunk::RawChunk;

/// Verbatim IDAT payload; no decompression happens here
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDataChunk {
    pub data: Vec<u8>,
    /// Offset of the chunk's length field
    pub offset: u64,
}

impl ImageDataChunk {
    pub fn decode(raw: &RawChunk<'_>) -> Self {
        Self {
            data: raw.payload.to_vec(),
            offset: raw.offset,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
