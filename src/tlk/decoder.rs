//! Huffman string decoding and the catalogue scan
//!
//! Strings in the blob are null-terminated and packed back to back. A full
//! forward scan from bit 0 yields every string boundary the encoder
//! produced; that scan is the catalogue entries are resolved against.

use super::bits::BitBuffer;
use super::huffman::{Branch, HuffmanTree};
use crate::{LoadStats, Result, TlkError, UnterminatedPolicy};
use std::collections::HashMap;

/// One string recovered from the blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedString {
    /// Decoded characters, without the terminator
    pub text: String,
    /// Bit offset immediately after the terminator
    pub next_offset: usize,
    /// False if the blob ran out before a terminator was seen
    pub terminated: bool,
}

impl DecodedString {
    /// Apply the unterminated string policy and take the text
    pub fn into_text(self, start: usize, policy: UnterminatedPolicy) -> Result<String> {
        if !self.terminated {
            if policy == UnterminatedPolicy::Reject {
                return Err(TlkError::UnterminatedString { offset: start });
            }
            log::debug!(
                "String at bit offset {} has no terminator, keeping {} decoded chars",
                start,
                self.text.chars().count()
            );
        }
        Ok(self.text)
    }
}

/// Source of decoded strings addressed by bit offset
pub trait DecodeStrings {
    /// Number of bits in the compressed blob
    fn total_bits(&self) -> usize;

    /// Decode the string starting at `offset`
    fn decode_from(&self, offset: usize) -> Result<DecodedString>;
}

/// Walks the bit buffer through the Huffman tree
#[derive(Debug, Clone, Copy)]
pub struct StringTableDecoder<'a> {
    tree: &'a HuffmanTree,
    bits: &'a BitBuffer,
}

impl<'a> StringTableDecoder<'a> {
    /// Create a decoder borrowing a loaded tree and blob
    pub fn new(tree: &'a HuffmanTree, bits: &'a BitBuffer) -> Self {
        Self { tree, bits }
    }
}

impl DecodeStrings for StringTableDecoder<'_> {
    fn total_bits(&self) -> usize {
        self.bits.len_bits()
    }

    fn decode_from(&self, start: usize) -> Result<DecodedString> {
        let total_bits = self.bits.len_bits();
        let mut node = 0;
        let mut offset = start;
        let mut text = String::new();

        while offset < total_bits {
            let bit = self.bits.bit(offset);
            offset += 1;

            match self.tree.step(node, bit)? {
                Branch::Interior(next) => node = next,
                Branch::Leaf(0) => {
                    return Ok(DecodedString {
                        text,
                        next_offset: offset,
                        terminated: true,
                    });
                }
                Branch::Leaf(byte) => {
                    text.push(char::from(byte));
                    node = 0;
                }
            }
        }

        // Ran off the end: step one past it and hand back what we have
        Ok(DecodedString {
            text,
            next_offset: offset + 1,
            terminated: false,
        })
    }
}

/// A catalogued string and the bit offset it starts at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEntry {
    /// Bit offset of the first code of the string
    pub offset: usize,
    /// Decoded text
    pub text: String,
    /// False for the trailing string that ran off the end of the blob
    pub terminated: bool,
}

/// Strings discovered by one forward scan, keyed by start offset
#[derive(Debug, Clone, Default)]
pub struct StringCatalogue {
    entries: Vec<CatalogueEntry>,
    index: HashMap<usize, usize>,
}

impl StringCatalogue {
    /// Number of catalogued strings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the scan found nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// String starting exactly at `offset`
    pub fn get(&self, offset: usize) -> Option<&CatalogueEntry> {
        self.index.get(&offset).map(|&i| &self.entries[i])
    }

    /// Whether a string starts at `offset`
    pub fn contains(&self, offset: usize) -> bool {
        self.index.contains_key(&offset)
    }

    /// Start offsets in ascending order
    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|e| e.offset)
    }

    fn push(&mut self, offset: usize, decoded: DecodedString) {
        debug_assert!(self
            .entries
            .last()
            .map_or(true, |last| last.offset < offset));
        self.index.insert(offset, self.entries.len());
        self.entries.push(CatalogueEntry {
            offset,
            text: decoded.text,
            terminated: decoded.terminated,
        });
    }
}

/// Scan the whole blob once from bit 0 and record every string
///
/// The padding after the last terminator usually decodes into one partial
/// string. It is recorded like any other; the unterminated policy is only
/// applied when an entry actually resolves to it.
pub fn build_catalogue<D>(decoder: &D, stats: &mut LoadStats) -> Result<StringCatalogue>
where
    D: DecodeStrings + ?Sized,
{
    let total_bits = decoder.total_bits();
    let mut catalogue = StringCatalogue::default();
    let mut offset = 0;

    while offset < total_bits {
        let decoded = decoder.decode_from(offset)?;
        let next_offset = decoded.next_offset;
        if !decoded.terminated {
            stats.unterminated_strings += 1;
        }
        catalogue.push(offset, decoded);
        offset = next_offset;
    }

    stats.catalogue_strings = catalogue.len();
    log::debug!(
        "Catalogued {} strings from {} bits",
        catalogue.len(),
        total_bits
    );
    Ok(catalogue)
}
