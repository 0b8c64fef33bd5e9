//! Talk table loader
//!
//! Loading is a fixed sequence of stages over an in-memory copy of the
//! file. Any error aborts the whole load; there is no partial table.

use super::bits::BitBuffer;
use super::decoder::{build_catalogue, StringTableDecoder};
use super::entry::{resolve_entries, EntryRecord, StringRef};
use super::header::TalkTableHeader;
use super::huffman::HuffmanTree;
use crate::stream::ByteStream;
use crate::{LoadOptions, LoadStats, Result, TlkError, HEADER_SIZE, NODE_SIZE};
use std::io::Read;
use std::path::Path;

/// Progress of a load
///
/// The stage only labels log lines. When a load fails, the last stage
/// reached is logged with the error so the failing section can be told
/// apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    /// Nothing read yet
    Unloaded,
    /// Header parsed and magic validated
    HeaderRead,
    /// Huffman tree read
    TreeRead,
    /// Compressed blob read
    BlobRead,
    /// Catalogue scan finished
    CatalogueBuilt,
    /// Every entry bound to its text
    EntriesResolved,
}

/// A fully decoded talk table
#[derive(Debug, Clone)]
pub struct TalkTableFile {
    header: TalkTableHeader,
    tree: HuffmanTree,
    bits: BitBuffer,
    string_refs: Vec<StringRef>,
    stats: LoadStats,
}

impl TalkTableFile {
    /// Decode a talk table held in memory
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, &LoadOptions::default())
    }

    /// Decode a talk table held in memory with explicit options
    pub fn from_bytes_with_options(data: &[u8], options: &LoadOptions) -> Result<Self> {
        let mut stage = LoadStage::Unloaded;
        Self::load(data, options, &mut stage).map_err(|e| {
            log::debug!("Load failed after {:?}: {}", stage, e);
            e
        })
    }

    fn load(data: &[u8], options: &LoadOptions, stage: &mut LoadStage) -> Result<Self> {
        let mut stream = ByteStream::new(data);
        let mut stats = LoadStats::default();
        log::trace!("{:?}: {} bytes", stage, data.len());

        let header = TalkTableHeader::read(&mut stream)?;
        *stage = LoadStage::HeaderRead;
        log::debug!(
            "{:?}: version {}, {} + {} entries, {} nodes, {} data bytes",
            stage,
            header.version,
            header.entry1_count,
            header.entry2_count,
            header.tree_node_count,
            header.data_length
        );

        // The entry table sits between header and tree; it is read last
        let tree_start = header.tree_offset().ok_or(TlkError::TruncatedStream {
            position: HEADER_SIZE,
            requested: usize::MAX,
            available: stream.remaining(),
        })?;
        stream.seek(tree_start)?;
        let mut pairs =
            Vec::with_capacity(header.node_count().min(stream.remaining() / NODE_SIZE));
        for _ in 0..header.node_count() {
            pairs.push(stream.read_i32_pair()?);
        }
        let tree = HuffmanTree::from_pairs(pairs)?;
        *stage = LoadStage::TreeRead;
        log::trace!("{:?}: {} nodes ending at byte {}", stage, tree.len(), stream.position());

        let bits = BitBuffer::new(stream.read_bytes(header.data_len())?.to_vec());
        *stage = LoadStage::BlobRead;
        log::trace!("{:?}: {} bits", stage, bits.len_bits());

        let decoder = StringTableDecoder::new(&tree, &bits);
        let catalogue = build_catalogue(&decoder, &mut stats)?;
        *stage = LoadStage::CatalogueBuilt;
        log::trace!("{:?}: {} strings", stage, catalogue.len());

        stream.seek(HEADER_SIZE)?;
        let records = (0..header.total_entries())
            .map(|_| EntryRecord::read(&mut stream))
            .collect::<Result<Vec<_>>>()?;
        let string_refs =
            resolve_entries(&decoder, &catalogue, &records, options.unterminated, &mut stats)?;
        *stage = LoadStage::EntriesResolved;
        log::debug!(
            "{:?}: {} entries, {} cache hits, {} fallback decodes, {} empty",
            stage,
            string_refs.len(),
            stats.cache_hits,
            stats.fallback_decodes,
            stats.empty_entries
        );

        Ok(Self {
            header,
            tree,
            bits,
            string_refs,
            stats,
        })
    }

    /// Read a whole talk table from `reader` and decode it
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, &LoadOptions::default())
    }

    /// Read a whole talk table from `reader` and decode it with explicit options
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: &LoadOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Load and decode a talk table file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, &LoadOptions::default())
    }

    /// Load and decode a talk table file with explicit options
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parsed header
    pub fn header(&self) -> &TalkTableHeader {
        &self.header
    }

    /// Huffman tree used for decoding
    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    /// Compressed blob
    pub fn bits(&self) -> &BitBuffer {
        &self.bits
    }

    /// Resolved entries in file order
    pub fn string_refs(&self) -> &[StringRef] {
        &self.string_refs
    }

    /// Take the resolved entries, dropping the rest of the table
    pub fn into_string_refs(self) -> Vec<StringRef> {
        self.string_refs
    }

    /// Position where the second entry group starts
    pub fn male_end(&self) -> usize {
        self.header.male_count()
    }

    /// Position one past the last entry of the second group
    pub fn female_end(&self) -> usize {
        self.header.total_entries()
    }

    /// Entries of the first group
    pub fn male_refs(&self) -> &[StringRef] {
        &self.string_refs[..self.male_end()]
    }

    /// Entries of the second group
    pub fn female_refs(&self) -> &[StringRef] {
        &self.string_refs[self.male_end()..]
    }

    /// Look up an entry by string id (first match in file order)
    pub fn find(&self, string_id: i32) -> Option<&StringRef> {
        self.string_refs.iter().find(|r| r.string_id == string_id)
    }

    /// Statistics gathered while loading
    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }
}
