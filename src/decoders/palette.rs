//! PLTE: color palette

use super::header::HeaderInfo;
use crate::{chunk::RawChunk, error::FormatError};

/// Most entries a palette may hold
pub const MAX_PALETTE_ENTRIES: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// Decoded PLTE chunk, entries in stream order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Decode a PLTE payload against the already-decoded header
    ///
    /// The header dependency is checked first: a palette without a header,
    /// or under a color type that has no use for one, is `UnexpectedChunk`
    /// whatever its length.
    pub fn decode(raw: &RawChunk<'_>, header: Option<&HeaderInfo>) -> Result<Self, FormatError> {
        let header = header.ok_or(FormatError::UnexpectedChunk {
            tag: raw.chunk_type,
            offset: raw.offset,
            reason: "palette before header",
        })?;
        if !header.color_type.permits_palette() {
            return Err(FormatError::UnexpectedChunk {
                tag: raw.chunk_type,
                offset: raw.offset,
                reason: "color type does not permit a palette",
            });
        }

        let len = raw.payload.len();
        if len == 0 || len % 3 != 0 || len / 3 > MAX_PALETTE_ENTRIES {
            return Err(FormatError::MalformedPalette {
                offset: raw.offset,
                len: raw.length,
            });
        }

        let entries = raw
            .payload
            .chunks_exact(3)
            .map(|rgb| PaletteEntry {
                red: rgb[0],
                green: rgb[1],
                blue: rgb[2],
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for a palette index
    pub fn get(&self, index: u8) -> Option<PaletteEntry> {
        self.entries.get(index as usize).copied()
    }
}
