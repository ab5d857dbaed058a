//! Test utilities for building PNG fixtures in memory.
//!
//! Fixtures are assembled chunk by chunk with correct lengths and CRCs,
//! then optionally damaged to exercise error paths.
//!
//! # Usage
//!
//! ```
//! use png_chunk_io::test_utils::PngBuilder;
//!
//! let data = PngBuilder::new()
//!     .ihdr(1, 1, 8, 0)
//!     .idat(&[0x78, 0x9c])
//!     .iend()
//!     .build();
//! assert!(png_chunk_io::parse(&data).is_ok());
//! ```

use crate::{crc::chunk_crc, signature::PNG_SIGNATURE};

/// Frame one chunk: length, tag, payload, CRC
pub fn chunk_bytes(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 12);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);
    out.extend_from_slice(&chunk_crc(tag, payload).to_be_bytes());
    out
}

/// Payload of an IHDR chunk with default methods
pub fn ihdr_payload(width: u32, height: u32, bit_depth: u8, color_type: u8) -> [u8; 13] {
    let mut p = [0u8; 13];
    p[0..4].copy_from_slice(&width.to_be_bytes());
    p[4..8].copy_from_slice(&height.to_be_bytes());
    p[8] = bit_depth;
    p[9] = color_type;
    p
}

/// Builder for in-memory PNG streams
#[derive(Debug, Clone)]
pub struct PngBuilder {
    data: Vec<u8>,
    /// Start offset of the most recently appended chunk
    last_chunk: Option<usize>,
}

impl PngBuilder {
    /// Start with the PNG signature
    pub fn new() -> Self {
        Self {
            data: PNG_SIGNATURE.to_vec(),
            last_chunk: None,
        }
    }

    /// Start with no signature at all
    pub fn without_signature() -> Self {
        Self {
            data: Vec::new(),
            last_chunk: None,
        }
    }

    /// Append a well-formed chunk
    pub fn chunk(mut self, tag: &[u8; 4], payload: &[u8]) -> Self {
        self.last_chunk = Some(self.data.len());
        self.data.extend(chunk_bytes(tag, payload));
        self
    }

    pub fn ihdr(self, width: u32, height: u32, bit_depth: u8, color_type: u8) -> Self {
        self.chunk(b"IHDR", &ihdr_payload(width, height, bit_depth, color_type))
    }

    /// Append a PLTE chunk with the given RGB triples
    pub fn plte(self, entries: &[[u8; 3]]) -> Self {
        let payload: Vec<u8> = entries.iter().flatten().copied().collect();
        self.chunk(b"PLTE", &payload)
    }

    pub fn gama(self, gamma: u32) -> Self {
        self.chunk(b"gAMA", &gamma.to_be_bytes())
    }

    pub fn idat(self, data: &[u8]) -> Self {
        self.chunk(b"IDAT", data)
    }

    pub fn iend(self) -> Self {
        self.chunk(b"IEND", &[])
    }

    /// Append bytes verbatim, with no framing
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    /// Flip the low bit of the last chunk's stored CRC
    pub fn corrupt_crc(mut self) -> Self {
        if let Some(start) = self.last_chunk {
            let len = u32::from_be_bytes([
                self.data[start],
                self.data[start + 1],
                self.data[start + 2],
                self.data[start + 3],
            ]) as usize;
            let crc_pos = start + 8 + len + 3;
            self.data[crc_pos] ^= 0x01;
        }
        self
    }

    /// Current length of the stream
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

impl Default for PngBuilder {
    fn default() -> Self {
        Self::new()
    }
}
