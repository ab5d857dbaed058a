//! Chunk tags, kinds and raw chunk records

use crate::segment::ByteRange;
use std::fmt;

/// A 4-byte PNG chunk type tag
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkType(pub [u8; 4]);

#[allow(non_upper_case_globals)]
impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const PLTE: Self = Self(*b"PLTE");
    pub const gAMA: Self = Self(*b"gAMA");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");

    /// Raw tag bytes
    pub fn bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Uppercase first letter: the chunk is critical to display the image
    pub fn is_critical(&self) -> bool {
        self.0[0] & 0x20 == 0
    }

    /// Uppercase second letter: the chunk is part of the public PNG spec
    pub fn is_public(&self) -> bool {
        self.0[1] & 0x20 == 0
    }

    /// Third letter must be uppercase in conforming streams
    pub fn is_reserved_bit_valid(&self) -> bool {
        self.0[2] & 0x20 == 0
    }

    /// Lowercase fourth letter: editors may copy the chunk without understanding it
    pub fn is_safe_to_copy(&self) -> bool {
        self.0[3] & 0x20 != 0
    }
}

impl From<[u8; 4]> for ChunkType {
    fn from(tag: [u8; 4]) -> Self {
        Self(tag)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType(\"{}\")", self)
    }
}

/// Logical classification of a chunk, determined solely by its tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    /// `IHDR`
    Header,
    /// `PLTE`
    Palette,
    /// `gAMA`
    Gamma,
    /// `IDAT`
    ImageData,
    /// `IEND`
    Terminator,
    /// Any tag this crate does not interpret
    Unknown(ChunkType),
}

impl ChunkKind {
    /// Classify a tag
    pub fn from_type(tag: ChunkType) -> Self {
        match &tag.0 {
            b"IHDR" => Self::Header,
            b"PLTE" => Self::Palette,
            b"gAMA" => Self::Gamma,
            b"IDAT" => Self::ImageData,
            b"IEND" => Self::Terminator,
            _ => Self::Unknown(tag),
        }
    }

    /// Tag that produces this kind
    pub fn chunk_type(&self) -> ChunkType {
        match *self {
            Self::Header => ChunkType::IHDR,
            Self::Palette => ChunkType::PLTE,
            Self::Gamma => ChunkType::gAMA,
            Self::ImageData => ChunkType::IDAT,
            Self::Terminator => ChunkType::IEND,
            Self::Unknown(tag) => tag,
        }
    }

    /// Kinds that may legally appear more than once
    pub fn repeats(&self) -> bool {
        matches!(self, Self::ImageData | Self::Unknown(_))
    }

    /// Kinds needed for basic image reconstruction
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::Header | Self::Palette | Self::ImageData | Self::Terminator
        )
    }
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => f.write_str("header"),
            Self::Palette => f.write_str("palette"),
            Self::Gamma => f.write_str("gamma"),
            Self::ImageData => f.write_str("image_data"),
            Self::Terminator => f.write_str("terminator"),
            Self::Unknown(tag) => write!(f, "unknown({})", tag),
        }
    }
}

/// One framed chunk as it sits in the input buffer
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawChunk<'a> {
    /// Declared payload length
    pub length: u32,
    /// Type tag
    pub chunk_type: ChunkType,
    /// `length` payload bytes
    pub payload: &'a [u8],
    /// Stored CRC
    pub crc: u32,
    /// Offset of the length field in the input buffer
    pub offset: u64,
}

impl<'a> RawChunk<'a> {
    /// Kind of this chunk
    pub fn kind(&self) -> ChunkKind {
        ChunkKind::from_type(self.chunk_type)
    }

    /// Bytes this chunk occupies on the wire: `length + 12`
    pub fn wire_size(&self) -> u64 {
        self.length as u64 + 12
    }

    /// Whole-chunk byte range (length field through CRC)
    pub fn range(&self) -> ByteRange {
        ByteRange::new(self.offset, self.wire_size())
    }

    /// Offset of the first payload byte
    pub fn payload_offset(&self) -> u64 {
        self.offset + 8
    }
}

impl fmt::Debug for RawChunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawChunk")
            .field("chunk_type", &self.chunk_type)
            .field("length", &self.length)
            .field("payload", &&self.payload[..self.payload.len().min(12)])
            .field("crc", &format_args!("0x{:08x}", self.crc))
            .field("offset", &self.offset)
            .finish()
    }
}
