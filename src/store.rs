//! Chunk store: the result of a parse

use crate::{
    chunk::{ChunkKind, ChunkType},
    decoders::{
        ChunkRecord, DecodeContext, GammaValue, HeaderInfo, ImageDataChunk, Palette,
        TerminatorMarker, UnknownChunk,
    },
    error::FormatError,
    segment::{ByteRange, ChunkEntry},
};

/// Decoded chunks of one PNG stream, in stream order
///
/// Singleton kinds (header, palette, gamma, terminator) hold at most one
/// record; image data and unknown chunks accumulate as ordered sequences.
/// Built once by the parser and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ChunkStore {
    /// Every walked chunk, valid or not
    entries: Vec<ChunkEntry>,

    header: Option<HeaderInfo>,
    palette: Option<Palette>,
    gamma: Option<GammaValue>,
    image_data: Vec<ImageDataChunk>,
    terminator: Option<TerminatorMarker>,
    unknown: Vec<UnknownChunk>,

    /// Violations recorded instead of aborting (lenient mode)
    issues: Vec<FormatError>,

    /// Informational notices
    notices: Vec<FormatError>,

    /// Size of the buffer the store was parsed from
    pub total_size: u64,
}

impl ChunkStore {
    pub(crate) fn new(total_size: u64) -> Self {
        Self {
            total_size,
            ..Self::default()
        }
    }

    /// Add a decoded record, enforcing singleton cardinality
    pub(crate) fn insert(
        &mut self,
        record: ChunkRecord,
        chunk_type: ChunkType,
        offset: u64,
    ) -> Result<(), FormatError> {
        let duplicate = FormatError::DuplicateChunk {
            tag: chunk_type,
            offset,
        };

        match record {
            ChunkRecord::Header(h) => set_once(&mut self.header, h, duplicate),
            ChunkRecord::Palette(p) => set_once(&mut self.palette, p, duplicate),
            ChunkRecord::Gamma(g) => set_once(&mut self.gamma, g, duplicate),
            ChunkRecord::Terminator(t) => set_once(&mut self.terminator, t, duplicate),
            ChunkRecord::ImageData(d) => {
                self.image_data.push(d);
                Ok(())
            }
            ChunkRecord::Unknown(u) => {
                self.unknown.push(u);
                Ok(())
            }
        }
    }

    /// Whether a singleton kind already holds a record
    pub(crate) fn has_singleton(&self, kind: ChunkKind) -> bool {
        match kind {
            ChunkKind::Header => self.header.is_some(),
            ChunkKind::Palette => self.palette.is_some(),
            ChunkKind::Gamma => self.gamma.is_some(),
            ChunkKind::Terminator => self.terminator.is_some(),
            ChunkKind::ImageData | ChunkKind::Unknown(_) => false,
        }
    }

    pub(crate) fn push_entry(&mut self, entry: ChunkEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn record_issue(&mut self, issue: FormatError) {
        self.issues.push(issue);
    }

    pub(crate) fn record_notice(&mut self, notice: FormatError) {
        self.notices.push(notice);
    }

    /// Context handed to decoders that depend on earlier chunks
    pub(crate) fn decode_context(&self) -> DecodeContext<'_> {
        DecodeContext {
            header: self.header.as_ref(),
        }
    }

    /// Every walked chunk in stream order
    pub fn entries(&self) -> &[ChunkEntry] {
        &self.entries
    }

    /// Entries of one kind, in stream order
    pub fn entries_of(&self, kind: ChunkKind) -> impl Iterator<Item = &ChunkEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Decoded IHDR
    pub fn header(&self) -> Option<&HeaderInfo> {
        self.header.as_ref()
    }

    /// Decoded PLTE, if the stream has one
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Decoded gAMA, if the stream has one
    pub fn gamma(&self) -> Option<GammaValue> {
        self.gamma
    }

    /// Image data fragments in stream order
    pub fn image_data(&self) -> &[ImageDataChunk] {
        &self.image_data
    }

    /// The complete compressed image stream: all IDAT payloads concatenated
    /// in stream order
    pub fn compressed_image_data(&self) -> Vec<u8> {
        let total = self.image_data.iter().map(ImageDataChunk::len).sum();
        let mut out = Vec::with_capacity(total);
        for fragment in &self.image_data {
            out.extend_from_slice(&fragment.data);
        }
        out
    }

    /// Decoded IEND
    pub fn terminator(&self) -> Option<&TerminatorMarker> {
        self.terminator.as_ref()
    }

    /// Chunks with tags this crate does not interpret, in stream order
    pub fn unknown(&self) -> &[UnknownChunk] {
        &self.unknown
    }

    /// Violations recorded in lenient mode
    pub fn issues(&self) -> &[FormatError] {
        &self.issues
    }

    /// Informational notices such as unknown chunks kept opaque
    pub fn notices(&self) -> &[FormatError] {
        &self.notices
    }

    /// No violations were recorded
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Byte ranges of all chunks whose kind satisfies `keep`, skipping
    /// anything that failed validation
    pub fn valid_ranges<F: Fn(&ChunkKind) -> bool>(&self, keep: F) -> Vec<ByteRange> {
        self.entries
            .iter()
            .filter(|e| e.status.is_valid() && keep(&e.kind))
            .map(|e| e.range)
            .collect()
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, duplicate: FormatError) -> Result<(), FormatError> {
    if slot.is_some() {
        return Err(duplicate);
    }
    *slot = Some(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idat(data: &[u8], offset: u64) -> ChunkRecord {
        ChunkRecord::ImageData(ImageDataChunk {
            data: data.to_vec(),
            offset,
        })
    }

    #[test]
    fn test_singletons_reject_duplicates() {
        let mut store = ChunkStore::new(0);
        store
            .insert(ChunkRecord::Gamma(GammaValue(1)), ChunkType::gAMA, 33)
            .unwrap();
        assert!(store.has_singleton(ChunkKind::Gamma));
        let err = store
            .insert(ChunkRecord::Gamma(GammaValue(2)), ChunkType::gAMA, 49)
            .unwrap_err();
        assert_eq!(
            err,
            FormatError::DuplicateChunk {
                tag: ChunkType::gAMA,
                offset: 49
            }
        );
        assert_eq!(store.gamma(), Some(GammaValue(1)));
    }

    #[test]
    fn test_image_data_keeps_order() {
        let mut store = ChunkStore::new(0);
        store.insert(idat(b"first", 33), ChunkType::IDAT, 33).unwrap();
        store.insert(idat(b"IEND", 50), ChunkType::IDAT, 50).unwrap();
        store.insert(idat(b"", 66), ChunkType::IDAT, 66).unwrap();

        let fragments: Vec<&[u8]> = store.image_data().iter().map(|c| c.data.as_slice()).collect();
        assert_eq!(fragments, vec![&b"first"[..], &b"IEND"[..], &b""[..]]);
        assert_eq!(store.compressed_image_data(), b"firstIEND");
        assert!(!store.has_singleton(ChunkKind::ImageData));
    }

    #[test]
    fn test_unknown_accumulates() {
        let mut store = ChunkStore::new(0);
        let text = ChunkType(*b"tEXt");
        for i in 0..3u8 {
            let record = ChunkRecord::Unknown(UnknownChunk {
                chunk_type: text,
                data: vec![i],
                offset: i as u64,
            });
            store.insert(record, text, i as u64).unwrap();
        }
        assert_eq!(store.unknown().len(), 3);
        assert_eq!(store.unknown()[2].data, vec![2]);
    }
}
