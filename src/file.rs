//! File-level convenience API
//!
//! [`PngFile`] owns the bytes of one PNG stream together with the
//! [`ChunkStore`] parsed from them, so callers don't juggle the buffer and
//! the store separately.

use crate::{
    error::Result,
    parser::{ParseOptions, Parser},
    reconstruct::{Reconstructor, RetainSet},
    store::ChunkStore,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Backing storage for a parsed stream
enum Source {
    Owned(Vec<u8>),
    #[cfg(feature = "memory-mapped")]
    Mapped(memmap2::Mmap),
}

impl Source {
    fn as_slice(&self) -> &[u8] {
        match self {
            Source::Owned(v) => v.as_slice(),
            #[cfg(feature = "memory-mapped")]
            Source::Mapped(m) => &m[..],
        }
    }
}

/// A parsed PNG stream and its bytes
///
/// # Example
///
/// ```no_run
/// use png_chunk_io::{PngFile, RetainSet};
///
/// # fn main() -> png_chunk_io::Result<()> {
/// let png = PngFile::open("photo.png")?;
/// for entry in png.store().entries() {
///     println!("{entry}");
/// }
///
/// // Keep only the chunks needed to display the image
/// let out = png.anonymized_file_name();
/// png.write_retained(&out, &RetainSet::critical())?;
/// # Ok(())
/// # }
/// ```
pub struct PngFile {
    name: String,
    source: Source,
    store: ChunkStore,
}

impl PngFile {
    /// Read and parse a file with strict options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, ParseOptions::default())
    }

    /// Read and parse a file with explicit options
    pub fn open_with<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "read PNG file");
        Self::parse_source(stem_of(path), Source::Owned(bytes), options)
    }

    /// Memory-map and parse a file
    ///
    /// The file must not be modified while the returned value is alive.
    #[cfg(feature = "memory-mapped")]
    pub fn open_mmap<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        // SAFETY: the map is read-only and owned by the returned value
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        debug!(path = %path.display(), bytes = mmap.len(), "mapped PNG file");
        Self::parse_source(stem_of(path), Source::Mapped(mmap), options)
    }

    /// Parse an in-memory stream
    ///
    /// `name` is used to derive output file names.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>, options: ParseOptions) -> Result<Self> {
        Self::parse_source(name.into(), Source::Owned(bytes), options)
    }

    fn parse_source(name: String, source: Source, options: ParseOptions) -> Result<Self> {
        let store = Parser::new(options).parse(source.as_slice())?;
        Ok(Self {
            name,
            source,
            store,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        self.source.as_slice()
    }

    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Reconstructor over this file's bytes
    pub fn reconstructor(&self) -> Result<Reconstructor<'_>> {
        Reconstructor::new(self.bytes(), &self.store)
    }

    /// `<name>_anonymized.png`
    pub fn anonymized_file_name(&self) -> String {
        format!("{}_anonymized.png", self.name)
    }

    /// Write a copy holding only the chunks in `retain`
    pub fn write_retained<P: AsRef<Path>>(&self, path: P, retain: &RetainSet) -> Result<u64> {
        let reconstructor = self.reconstructor()?;
        let written = {
            let mut out = BufWriter::new(File::create(path.as_ref())?);
            let n = reconstructor.write_to(&mut out, retain)?;
            out.flush()?;
            n
        };
        debug!(path = %path.as_ref().display(), bytes = written, "wrote retained copy");
        Ok(written)
    }

    /// Write a copy holding only the critical chunks
    pub fn write_anonymized<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        self.write_retained(path, &RetainSet::critical())
    }
}

impl std::fmt::Debug for PngFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PngFile")
            .field("name", &self.name)
            .field("bytes", &self.bytes().len())
            .field("chunks", &self.store.entries().len())
            .finish()
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}
