//! gAMA: image gamma

use super::expect_length;
use crate::{chunk::RawChunk, error::FormatError};
use byteorder::{BigEndian, ByteOrder};

/// Gamma times 100000, exactly as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GammaValue(pub u32);

impl GammaValue {
    pub fn decode(raw: &RawChunk<'_>) -> Result<Self, FormatError> {
        expect_length(raw, 4)?;
        Ok(Self(BigEndian::read_u32(raw.payload)))
    }

    /// Stored integer
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Gamma as a float (`raw / 100000`)
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100_000.0
    }
}
