//! Single-pass parse pipeline
//!
//! Signature check, then for each walked chunk: positional rules, CRC,
//! typed decode, store insertion. Structural failures always abort; the
//! configured [`Policy`] decides whether chunk-scoped failures abort or are
//! recorded on the store.

use crate::{
    chunk::{ChunkKind, ChunkType, RawChunk},
    crc::{self, CrcCheck},
    decoders,
    error::{FormatError, Result},
    segment::{ChunkEntry, ChunkStatus},
    store::ChunkStore,
    walker::ChunkWalker,
};
use tracing::{debug, info, warn};

/// What to do with a chunk-scoped violation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Abort the parse with the error (default)
    #[default]
    Strict,
    /// Record the error on the store, mark the chunk and keep going
    Lenient,
}

/// Parse configuration
///
/// The default is strict for both CRC mismatches and semantic violations.
///
/// # Example
///
/// ```
/// use png_chunk_io::{ParseOptions, Policy};
///
/// let opts = ParseOptions::new().lenient();
/// assert_eq!(opts.crc_policy, Policy::Lenient);
///
/// // Tolerate bad CRCs but still reject malformed chunks
/// let opts = ParseOptions::new().crc_policy(Policy::Lenient);
/// assert_eq!(opts.semantic_policy, Policy::Strict);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Handling of CRC mismatches
    pub crc_policy: Policy,
    /// Handling of semantic violations scoped to one chunk
    pub semantic_policy: Policy,
}

impl ParseOptions {
    /// Strict options (same as `ParseOptions::default()`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort on every violation
    pub fn strict(mut self) -> Self {
        self.crc_policy = Policy::Strict;
        self.semantic_policy = Policy::Strict;
        self
    }

    /// Record chunk-scoped violations instead of aborting
    ///
    /// A stream whose first chunk is not IHDR has that chunk rejected; an
    /// IHDR found later is still decoded and used as the header, so the
    /// chunks after it can be checked against it.
    pub fn lenient(mut self) -> Self {
        self.crc_policy = Policy::Lenient;
        self.semantic_policy = Policy::Lenient;
        self
    }

    /// Handling of CRC mismatches only
    pub fn crc_policy(mut self, policy: Policy) -> Self {
        self.crc_policy = policy;
        self
    }

    /// Handling of positional, duplicate and decoder violations only
    pub fn semantic_policy(mut self, policy: Policy) -> Self {
        self.semantic_policy = policy;
        self
    }
}

/// PNG chunk parser
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    /// Create a parser with the given options
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a complete, resident PNG buffer into a [`ChunkStore`]
    ///
    /// No partial store is returned on failure.
    pub fn parse(&self, buf: &[u8]) -> Result<ChunkStore> {
        Ok(self.parse_impl(buf)?)
    }

    fn parse_impl(&self, buf: &[u8]) -> std::result::Result<ChunkStore, FormatError> {
        let walker = ChunkWalker::new(buf)?;
        let mut store = ChunkStore::new(buf.len() as u64);

        for (index, item) in walker.enumerate() {
            let raw = item?;

            if let Err(e) = check_position(index, &raw) {
                self.reject(&mut store, &raw, e)?;
                continue;
            }

            if let CrcCheck::Invalid { expected, actual } = crc::verify(&raw) {
                let err = FormatError::ChecksumMismatch {
                    tag: raw.chunk_type,
                    offset: raw.offset,
                    expected,
                    actual,
                };
                if self.options.crc_policy == Policy::Strict {
                    return Err(err);
                }
                warn!(%err, "keeping chunk marked invalid");
                store.push_entry(ChunkEntry::from_raw(
                    &raw,
                    ChunkStatus::Invalid { expected, actual },
                ));
                store.record_issue(err);
                continue;
            }

            let kind = raw.kind();
            if store.has_singleton(kind) {
                let err = FormatError::DuplicateChunk {
                    tag: raw.chunk_type,
                    offset: raw.offset,
                };
                self.reject(&mut store, &raw, err)?;
                continue;
            }

            let decoded = decoders::decode(&raw, store.decode_context());
            match decoded.and_then(|record| store.insert(record, raw.chunk_type, raw.offset)) {
                Ok(()) => {
                    store.push_entry(ChunkEntry::from_raw(&raw, ChunkStatus::Valid));
                    if let ChunkKind::Unknown(tag) = kind {
                        debug!(%tag, offset = raw.offset, "unknown chunk kept opaque");
                        store.record_notice(FormatError::UnknownChunkIgnored {
                            tag,
                            offset: raw.offset,
                            critical: tag.is_critical(),
                        });
                    }
                }
                Err(e) => self.reject(&mut store, &raw, e)?,
            }
        }

        info!(
            chunks = store.entries().len(),
            image_data = store.image_data().len(),
            issues = store.issues().len(),
            "parsed PNG stream"
        );
        Ok(store)
    }

    /// Abort in strict mode, otherwise record the violation against the chunk
    fn reject(
        &self,
        store: &mut ChunkStore,
        raw: &RawChunk<'_>,
        err: FormatError,
    ) -> std::result::Result<(), FormatError> {
        if self.options.semantic_policy == Policy::Strict {
            return Err(err);
        }
        warn!(%err, "chunk rejected");
        store.push_entry(ChunkEntry::from_raw(raw, ChunkStatus::Rejected(err.kind())));
        store.record_issue(err);
        Ok(())
    }
}

/// Rules that depend only on where a chunk sits in the stream
fn check_position(index: usize, raw: &RawChunk<'_>) -> std::result::Result<(), FormatError> {
    if index == 0 && raw.chunk_type != ChunkType::IHDR {
        return Err(FormatError::UnexpectedChunk {
            tag: raw.chunk_type,
            offset: raw.offset,
            reason: "first chunk must be IHDR",
        });
    }
    Ok(())
}

/// Parse with default (strict) options
pub fn parse(buf: &[u8]) -> Result<ChunkStore> {
    Parser::default().parse(buf)
}

/// Parse with explicit options
pub fn parse_with(buf: &[u8], options: ParseOptions) -> Result<ChunkStore> {
    Parser::new(options).parse(buf)
}
