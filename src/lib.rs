//! Structural parsing of PNG chunk streams.
//!
//! This crate validates the PNG signature, walks the length-prefixed chunk
//! sequence, verifies each chunk's CRC-32, and decodes the critical chunks
//! (IHDR, PLTE, IDAT, IEND) plus gAMA into typed records. Everything else is
//! kept as opaque bytes. A parsed stream can be re-emitted bit-exact with
//! any subset of its chunks.
//!
//! # Design Principles
//!
//! - **Length-driven**: chunk boundaries come only from declared lengths,
//!   never from scanning for tag bytes
//! - **Offsets everywhere**: every error and entry records where it sits in
//!   the input
//! - **Verbatim output**: reconstruction copies byte ranges, nothing is
//!   re-encoded
//!
//! # Quick Start
//!
//! ```
//! use png_chunk_io::{parse, reconstruct, RetainSet};
//! # use png_chunk_io::test_utils::PngBuilder;
//!
//! # fn main() -> png_chunk_io::Result<()> {
//! # let data = PngBuilder::new().ihdr(16, 16, 8, 6).chunk(b"tEXt", b"k\0v").idat(b"..").iend().build();
//! let store = parse(&data)?;
//! let header = store.header().expect("IHDR is always first");
//! println!("{}x{} {}", header.width, header.height, header.color_type);
//!
//! for entry in store.entries() {
//!     println!("{entry}");
//! }
//!
//! // Drop ancillary and unknown chunks
//! let stripped = reconstruct(&data, &store, &RetainSet::critical())?;
//! assert!(stripped.len() < data.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Lenient Parsing
//!
//! By default any violation aborts the parse. With lenient options, CRC
//! mismatches and chunk-level violations are recorded on the store instead
//! and the offending chunk is excluded from reconstruction. Structural
//! damage (bad signature, truncation, trailing bytes) always aborts.
//!
//! ```
//! use png_chunk_io::{parse_with, ParseOptions};
//! # use png_chunk_io::test_utils::PngBuilder;
//!
//! # let data = PngBuilder::new().ihdr(1, 1, 8, 0).idat(b"x").corrupt_crc().iend().build();
//! let store = parse_with(&data, ParseOptions::new().lenient()).unwrap();
//! for issue in store.issues() {
//!     eprintln!("{issue}");
//! }
//! assert!(!store.is_clean());
//! ```

mod chunk;
pub mod crc;
pub mod decoders;
mod error;
mod file;
mod parser;
pub mod processing_writer;
mod reconstruct;
mod segment;
mod signature;
mod store;
pub mod walker;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use chunk::{ChunkKind, ChunkType, RawChunk};
pub use crc::{chunk_crc, CrcCheck};
pub use decoders::{
    ChunkRecord, ColorType, DecodeContext, GammaValue, HeaderInfo, ImageDataChunk,
    InterlaceMethod, Palette, PaletteEntry, TerminatorMarker, UnknownChunk, MAX_PALETTE_ENTRIES,
};
pub use error::{Error, ErrorKind, FormatError, Result};
pub use file::PngFile;
pub use parser::{parse, parse_with, ParseOptions, Parser, Policy};
pub use processing_writer::ProcessingWriter;
pub use reconstruct::{reconstruct, Reconstructor, RetainSet};
pub use segment::{ByteRange, ChunkEntry, ChunkStatus};
pub use signature::{detect, validate_signature, PNG_SIGNATURE};
pub use store::ChunkStore;
pub use walker::{walk, ChunkWalker, MAX_CHUNK_LENGTH};
