//! IHDR: image header

use super::expect_length;
use crate::{chunk::RawChunk, error::FormatError};
use byteorder::{BigEndian, ByteOrder};
use std::fmt;

/// Largest width or height the format allows (2^31 - 1)
const MAX_DIMENSION: u32 = 0x7FFF_FFFF;

/// Pixel color model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorType {
    Grayscale,
    Rgb,
    Palette,
    GrayscaleAlpha,
    Rgba,
}

impl ColorType {
    /// Parse the IHDR color type byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Grayscale),
            2 => Some(Self::Rgb),
            3 => Some(Self::Palette),
            4 => Some(Self::GrayscaleAlpha),
            6 => Some(Self::Rgba),
            _ => None,
        }
    }

    /// IHDR byte for this color type
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Grayscale => 0,
            Self::Rgb => 2,
            Self::Palette => 3,
            Self::GrayscaleAlpha => 4,
            Self::Rgba => 6,
        }
    }

    /// Bit depths the format permits for this color type
    pub fn allowed_bit_depths(self) -> &'static [u8] {
        match self {
            Self::Grayscale => &[1, 2, 4, 8, 16],
            Self::Palette => &[1, 2, 4, 8],
            Self::Rgb | Self::GrayscaleAlpha | Self::Rgba => &[8, 16],
        }
    }

    /// Samples per pixel
    pub fn channels(self) -> u8 {
        match self {
            Self::Grayscale | Self::Palette => 1,
            Self::GrayscaleAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Whether a PLTE chunk may accompany this color type
    pub fn permits_palette(self) -> bool {
        matches!(self, Self::Palette | Self::Rgb | Self::Rgba)
    }
}

impl fmt::Display for ColorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Grayscale => "Grayscale",
            Self::Rgb => "RGB",
            Self::Palette => "Palette",
            Self::GrayscaleAlpha => "GrayscaleAlpha",
            Self::Rgba => "RGBA",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionMethod {
    /// zlib deflate, the only method defined
    Deflate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMethod {
    /// Per-scanline adaptive filtering, the only method defined
    Adaptive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterlaceMethod {
    None,
    Adam7,
}

/// Decoded IHDR chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderInfo {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: ColorType,
    pub compression_method: CompressionMethod,
    pub filter_method: FilterMethod,
    pub interlace_method: InterlaceMethod,
}

impl HeaderInfo {
    /// Decode and validate a 13-byte IHDR payload
    ///
    /// Error offsets point at the offending field inside the payload.
    pub fn decode(raw: &RawChunk<'_>) -> Result<Self, FormatError> {
        expect_length(raw, 13)?;
        let base = raw.payload_offset();

        let width = BigEndian::read_u32(&raw.payload[0..4]);
        let height = BigEndian::read_u32(&raw.payload[4..8]);
        let [bit_depth, color_byte, compression, filter, interlace] = [
            raw.payload[8],
            raw.payload[9],
            raw.payload[10],
            raw.payload[11],
            raw.payload[12],
        ];

        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(FormatError::InvalidDimensions {
                offset: base,
                width,
                height,
            });
        }

        let color_type = ColorType::from_u8(color_byte)
            .filter(|ct| ct.allowed_bit_depths().contains(&bit_depth))
            .ok_or(FormatError::InvalidColorDepth {
                offset: base + 8,
                bit_depth,
                color_type: color_byte,
            })?;

        let compression_method = match compression {
            0 => CompressionMethod::Deflate,
            value => return Err(unsupported(base + 10, "compression", value)),
        };
        let filter_method = match filter {
            0 => FilterMethod::Adaptive,
            value => return Err(unsupported(base + 11, "filter", value)),
        };
        let interlace_method = match interlace {
            0 => InterlaceMethod::None,
            1 => InterlaceMethod::Adam7,
            value => return Err(unsupported(base + 12, "interlace", value)),
        };

        Ok(Self {
            width,
            height,
            bit_depth,
            color_type,
            compression_method,
            filter_method,
            interlace_method,
        })
    }

    /// Samples per pixel
    pub fn channels(&self) -> u8 {
        self.color_type.channels()
    }

    /// Bits occupied by one pixel
    pub fn bits_per_pixel(&self) -> u32 {
        self.channels() as u32 * self.bit_depth as u32
    }

    pub fn is_interlaced(&self) -> bool {
        self.interlace_method == InterlaceMethod::Adam7
    }

    /// Bytes in one unfiltered scanline, excluding the filter-type byte
    pub fn bytes_per_row(&self) -> Option<u64> {
        let bits = (self.width as u64).checked_mul(self.bits_per_pixel() as u64)?;
        Some(bits.div_ceil(8))
    }
}

fn unsupported(offset: u64, field: &'static str, value: u8) -> FormatError {
    FormatError::UnsupportedMethod {
        offset,
        field,
        value,
    }
}
