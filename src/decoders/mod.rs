//! Chunk registry and typed decoders
//!
//! The recognized tags map to decoder functions through a fixed lookup
//! table. Any other tag decodes to an [`UnknownChunk`] holding the payload
//! unchanged.

mod gamma;
mod header;
mod image_data;
mod palette;
mod terminator;

pub use gamma::GammaValue;
pub use header::{ColorType, CompressionMethod, FilterMethod, HeaderInfo, InterlaceMethod};
pub use image_data::ImageDataChunk;
pub use palette::{Palette, PaletteEntry, MAX_PALETTE_ENTRIES};
pub use terminator::TerminatorMarker;

use crate::{
    chunk::{ChunkKind, ChunkType, RawChunk},
    error::FormatError,
};

/// State from earlier chunks that a decoder may depend on
#[derive(Debug, Default, Clone, Copy)]
pub struct DecodeContext<'s> {
    /// The already-decoded header, if one has been seen
    pub header: Option<&'s HeaderInfo>,
}

/// A chunk whose tag this crate does not interpret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChunk {
    pub chunk_type: ChunkType,
    pub data: Vec<u8>,
    pub offset: u64,
}

/// A decoded chunk
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkRecord {
    Header(HeaderInfo),
    Palette(Palette),
    Gamma(GammaValue),
    ImageData(ImageDataChunk),
    Terminator(TerminatorMarker),
    Unknown(UnknownChunk),
}

impl ChunkRecord {
    /// Kind of the decoded chunk
    pub fn kind(&self) -> ChunkKind {
        match self {
            Self::Header(_) => ChunkKind::Header,
            Self::Palette(_) => ChunkKind::Palette,
            Self::Gamma(_) => ChunkKind::Gamma,
            Self::ImageData(_) => ChunkKind::ImageData,
            Self::Terminator(_) => ChunkKind::Terminator,
            Self::Unknown(u) => ChunkKind::Unknown(u.chunk_type),
        }
    }
}

/// Signature shared by every typed decoder
pub type Decoder = fn(&RawChunk<'_>, DecodeContext<'_>) -> Result<ChunkRecord, FormatError>;

fn decode_header(raw: &RawChunk<'_>, _: DecodeContext<'_>) -> Result<ChunkRecord, FormatError> {
    HeaderInfo::decode(raw).map(ChunkRecord::Header)
}

fn decode_palette(raw: &RawChunk<'_>, ctx: DecodeContext<'_>) -> Result<ChunkRecord, FormatError> {
    Palette::decode(raw, ctx.header).map(ChunkRecord::Palette)
}

fn decode_gamma(raw: &RawChunk<'_>, _: DecodeContext<'_>) -> Result<ChunkRecord, FormatError> {
    GammaValue::decode(raw).map(ChunkRecord::Gamma)
}

fn decode_image_data(raw: &RawChunk<'_>, _: DecodeContext<'_>) -> Result<ChunkRecord, FormatError> {
    Ok(ChunkRecord::ImageData(ImageDataChunk::decode(raw)))
}

fn decode_terminator(raw: &RawChunk<'_>, _: DecodeContext<'_>) -> Result<ChunkRecord, FormatError> {
    TerminatorMarker::decode(raw).map(ChunkRecord::Terminator)
}

static REGISTRY: [(ChunkType, Decoder); 5] = [
    (ChunkType::IHDR, decode_header),
    (ChunkType::PLTE, decode_palette),
    (ChunkType::gAMA, decode_gamma),
    (ChunkType::IDAT, decode_image_data),
    (ChunkType::IEND, decode_terminator),
];

/// Look up the decoder registered for a tag
pub fn decoder_for(chunk_type: ChunkType) -> Option<Decoder> {
    REGISTRY
        .iter()
        .find(|(tag, _)| *tag == chunk_type)
        .map(|(_, decoder)| *decoder)
}

/// Decode one chunk, passing unknown tags through as opaque records
pub fn decode(raw: &RawChunk<'_>, ctx: DecodeContext<'_>) -> Result<ChunkRecord, FormatError> {
    match decoder_for(raw.chunk_type) {
        Some(decoder) => decoder(raw, ctx),
        None => Ok(ChunkRecord::Unknown(UnknownChunk {
            chunk_type: raw.chunk_type,
            data: raw.payload.to_vec(),
            offset: raw.offset,
        })),
    }
}

/// Payload-length check shared by the fixed-size decoders
pub(crate) fn expect_length(raw: &RawChunk<'_>, expected: u32) -> Result<(), FormatError> {
    if raw.length != expected {
        return Err(FormatError::InvalidLength {
            tag: raw.chunk_type,
            offset: raw.offset,
            expected,
            actual: raw.length,
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn raw<'a>(tag: &[u8; 4], payload: &'a [u8]) -> RawChunk<'a> {
    RawChunk {
        length: payload.len() as u32,
        chunk_type: ChunkType(*tag),
        payload,
        crc: crate::crc::chunk_crc(tag, payload),
        offset: 8,
    }
}
