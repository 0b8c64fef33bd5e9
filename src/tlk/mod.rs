//! Talk table (TLK) decoding
//!
//! A talk table is laid out as a 28-byte header, the entry table, the
//! Huffman tree and finally the compressed string blob. All integers are
//! little-endian i32 values.

mod bits;
mod decoder;
mod entry;
mod file;
mod header;
mod huffman;

pub use bits::BitBuffer;
pub use decoder::{
    build_catalogue, CatalogueEntry, DecodeStrings, DecodedString, StringCatalogue,
    StringTableDecoder,
};
pub use entry::{resolve_entries, resolve_uncatalogued, EntryRecord, StringRef};
pub use file::{LoadStage, TalkTableFile};
pub use header::TalkTableHeader;
pub use huffman::{leaf_sentinel, Branch, HuffmanNode, HuffmanTree};

use crate::Result;

/// Convenience function to decode a talk table in memory
pub fn decode_bytes(data: &[u8]) -> Result<Vec<StringRef>> {
    Ok(TalkTableFile::from_bytes(data)?.into_string_refs())
}
