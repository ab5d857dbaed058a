//! Error types for png-chunk-io

use crate::chunk::ChunkType;
use std::io;

/// Result type for png-chunk-io operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or reconstructing a PNG stream
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The byte stream violates the PNG chunk format
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Reconstruction was given a buffer other than the one that was parsed
    #[error("Source buffer is {actual} bytes, parsed stream was {expected}")]
    SourceMismatch { expected: u64, actual: u64 },
}

impl Error {
    /// The format violation behind this error, if it is one
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            Self::Format(e) => Some(e),
            Self::Io(_) | Self::SourceMismatch { .. } => None,
        }
    }

    /// Shorthand for `as_format().map(FormatError::kind)`
    pub fn kind(&self) -> Option<ErrorKind> {
        self.as_format().map(FormatError::kind)
    }
}

/// A specific violation of the PNG chunk format
///
/// Every variant records the byte offset (from the start of the input,
/// signature included) at which the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The first 8 bytes are not the PNG signature
    #[error("Bad PNG signature at offset {offset}")]
    BadSignature { offset: u64 },

    /// A chunk declares more bytes than remain in the buffer, or the stream
    /// ends before its terminator chunk
    #[error("Truncated chunk at offset {offset}: needs {needed} bytes, {available} available")]
    Truncated {
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// Bytes that cannot form a chunk, or bytes after the terminator
    #[error("{count} trailing bytes at offset {offset}")]
    TrailingBytes { offset: u64, count: u64 },

    /// Stored CRC does not match the CRC of type + payload
    #[error("CRC mismatch in {tag} chunk at offset {offset}: stored 0x{expected:08x}, computed 0x{actual:08x}")]
    ChecksumMismatch {
        tag: ChunkType,
        offset: u64,
        expected: u32,
        actual: u32,
    },

    /// Zero (or out of range) image width or height
    #[error("Invalid dimensions {width}x{height} at offset {offset}")]
    InvalidDimensions {
        offset: u64,
        width: u32,
        height: u32,
    },

    /// Bit depth not permitted for the color type, or unknown color type
    #[error("Invalid bit depth {bit_depth} for color type {color_type} at offset {offset}")]
    InvalidColorDepth {
        offset: u64,
        bit_depth: u8,
        color_type: u8,
    },

    /// Palette length not a multiple of 3, empty, or more than 256 entries
    #[error("Malformed palette at offset {offset}: {len} bytes")]
    MalformedPalette { offset: u64, len: u32 },

    /// A chunk appears where the format does not allow it
    #[error("Unexpected {tag} chunk at offset {offset}: {reason}")]
    UnexpectedChunk {
        tag: ChunkType,
        offset: u64,
        reason: &'static str,
    },

    /// The terminator chunk carries a payload
    #[error("IEND chunk at offset {offset} has {len} payload bytes")]
    NonEmptyTerminator { offset: u64, len: u32 },

    /// A singleton chunk kind appeared twice
    #[error("Duplicate {tag} chunk at offset {offset}")]
    DuplicateChunk { tag: ChunkType, offset: u64 },

    /// Informational: a chunk type this crate does not interpret was kept opaque
    #[error("Unknown {tag} chunk at offset {offset} kept as opaque payload")]
    UnknownChunkIgnored {
        tag: ChunkType,
        offset: u64,
        critical: bool,
    },

    /// A fixed-size chunk has the wrong payload length
    #[error("{tag} chunk at offset {offset} has {actual} payload bytes, expected {expected}")]
    InvalidLength {
        tag: ChunkType,
        offset: u64,
        expected: u32,
        actual: u32,
    },

    /// Declared chunk length exceeds 2^31 - 1
    #[error("Chunk length too large at offset {offset}: {length}")]
    LengthOutOfRange { offset: u64, length: u32 },

    /// Compression, filter or interlace method outside the PNG table
    #[error("Unsupported {field} method {value} at offset {offset}")]
    UnsupportedMethod {
        offset: u64,
        field: &'static str,
        value: u8,
    },
}

/// Discriminant of a [`FormatError`], for matching without the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadSignature,
    Truncated,
    TrailingBytes,
    ChecksumMismatch,
    InvalidDimensions,
    InvalidColorDepth,
    MalformedPalette,
    UnexpectedChunk,
    NonEmptyTerminator,
    DuplicateChunk,
    UnknownChunkIgnored,
    InvalidLength,
    LengthOutOfRange,
    UnsupportedMethod,
}

impl FormatError {
    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadSignature { .. } => ErrorKind::BadSignature,
            Self::Truncated { .. } => ErrorKind::Truncated,
            Self::TrailingBytes { .. } => ErrorKind::TrailingBytes,
            Self::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
            Self::InvalidDimensions { .. } => ErrorKind::InvalidDimensions,
            Self::InvalidColorDepth { .. } => ErrorKind::InvalidColorDepth,
            Self::MalformedPalette { .. } => ErrorKind::MalformedPalette,
            Self::UnexpectedChunk { .. } => ErrorKind::UnexpectedChunk,
            Self::NonEmptyTerminator { .. } => ErrorKind::NonEmptyTerminator,
            Self::DuplicateChunk { .. } => ErrorKind::DuplicateChunk,
            Self::UnknownChunkIgnored { .. } => ErrorKind::UnknownChunkIgnored,
            Self::InvalidLength { .. } => ErrorKind::InvalidLength,
            Self::LengthOutOfRange { .. } => ErrorKind::LengthOutOfRange,
            Self::UnsupportedMethod { .. } => ErrorKind::UnsupportedMethod,
        }
    }

    /// Byte offset at which the violation was detected
    pub fn offset(&self) -> u64 {
        match *self {
            Self::BadSignature { offset }
            | Self::Truncated { offset, .. }
            | Self::TrailingBytes { offset, .. }
            | Self::ChecksumMismatch { offset, .. }
            | Self::InvalidDimensions { offset, .. }
            | Self::InvalidColorDepth { offset, .. }
            | Self::MalformedPalette { offset, .. }
            | Self::UnexpectedChunk { offset, .. }
            | Self::NonEmptyTerminator { offset, .. }
            | Self::DuplicateChunk { offset, .. }
            | Self::UnknownChunkIgnored { offset, .. }
            | Self::InvalidLength { offset, .. }
            | Self::LengthOutOfRange { offset, .. }
            | Self::UnsupportedMethod { offset, .. } => offset,
        }
    }

    /// Structural errors abort a parse in every mode; the rest are scoped to
    /// one chunk and can be recorded in lenient mode
    pub fn is_structural(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::BadSignature
                | ErrorKind::Truncated
                | ErrorKind::TrailingBytes
                | ErrorKind::LengthOutOfRange
        )
    }

    /// True only for notices that are never returned as errors
    pub fn is_informational(&self) -> bool {
        self.kind() == ErrorKind::UnknownChunkIgnored
    }
}
