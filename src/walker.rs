//! Length-driven chunk walker
//!
//! Chunk boundaries come only from each chunk's declared length. Payload
//! bytes are never scanned for tags, so a payload that happens to contain
//! `IEND` or `IDAT` cannot split a chunk.

use crate::{
    chunk::{ChunkType, RawChunk},
    error::FormatError,
    signature::{validate_signature, PNG_SIGNATURE},
};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use tracing::debug;

/// Largest chunk length the PNG format allows (2^31 - 1)
pub const MAX_CHUNK_LENGTH: u32 = 0x7FFF_FFFF;

/// Iterator over the framed chunks of a resident PNG buffer
///
/// Yields `Err` at most once and then stops. The walker borrows the buffer
/// immutably, so a clone or [`restart`](Self::restart) replays the same
/// sequence.
#[derive(Debug, Clone)]
pub struct ChunkWalker<'a> {
    buf: &'a [u8],
    pos: usize,
    seen_terminator: bool,
    done: bool,
}

impl<'a> ChunkWalker<'a> {
    /// Validate the signature and position the walker at the first chunk
    pub fn new(buf: &'a [u8]) -> Result<Self, FormatError> {
        validate_signature(buf)?;
        Ok(Self {
            buf,
            pos: PNG_SIGNATURE.len(),
            seen_terminator: false,
            done: false,
        })
    }

    /// Rewind to the first chunk
    pub fn restart(&mut self) {
        self.pos = PNG_SIGNATURE.len();
        self.seen_terminator = false;
        self.done = false;
    }

    /// Offset of the next chunk to be read
    pub fn position(&self) -> u64 {
        self.pos as u64
    }

    fn read_chunk(&self) -> Result<RawChunk<'a>, FormatError> {
        let rest = &self.buf[self.pos..];
        let offset = self.pos as u64;
        let available = rest.len() as u64;

        // Not even room for length + type
        if rest.len() < 8 {
            return Err(FormatError::TrailingBytes {
                offset,
                count: available,
            });
        }

        let truncated = |needed: u64| FormatError::Truncated {
            offset,
            needed,
            available,
        };

        let mut cursor = Cursor::new(rest);
        let length = cursor.read_u32::<BigEndian>().map_err(|_| truncated(4))?;
        let mut tag = [0u8; 4];
        cursor.read_exact(&mut tag).map_err(|_| truncated(8))?;

        if length > MAX_CHUNK_LENGTH {
            return Err(FormatError::LengthOutOfRange { offset, length });
        }

        let needed = length as u64 + 12;
        if available < needed {
            return Err(truncated(needed));
        }

        let payload = &rest[8..8 + length as usize];
        cursor.set_position(8 + length as u64);
        let crc = cursor.read_u32::<BigEndian>().map_err(|_| truncated(needed))?;

        Ok(RawChunk {
            length,
            chunk_type: ChunkType(tag),
            payload,
            crc,
            offset,
        })
    }
}

impl<'a> Iterator for ChunkWalker<'a> {
    type Item = Result<RawChunk<'a>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let remaining = (self.buf.len() - self.pos) as u64;

        if self.seen_terminator {
            self.done = true;
            if remaining == 0 {
                return None;
            }
            return Some(Err(FormatError::TrailingBytes {
                offset: self.pos as u64,
                count: remaining,
            }));
        }

        // Clean end of buffer without a terminator
        if remaining == 0 {
            self.done = true;
            return Some(Err(FormatError::Truncated {
                offset: self.pos as u64,
                needed: 12,
                available: 0,
            }));
        }

        match self.read_chunk() {
            Ok(chunk) => {
                debug!(
                    tag = %chunk.chunk_type,
                    offset = chunk.offset,
                    length = chunk.length,
                    "walked chunk"
                );
                self.pos += chunk.wire_size() as usize;
                if chunk.chunk_type == ChunkType::IEND {
                    self.seen_terminator = true;
                }
                Some(Ok(chunk))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Walk the whole buffer, stopping at the first structural error
pub fn walk(buf: &[u8]) -> Result<Vec<RawChunk<'_>>, FormatError> {
    ChunkWalker::new(buf)?.collect()
}
