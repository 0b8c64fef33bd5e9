//! Helpers for building talk table images in tests

#![allow(dead_code)]

use std::collections::HashMap;
use tlkdecode::tlk::leaf_sentinel;
use tlkdecode::TLK_MAGIC;

/// Balanced Huffman-style tree over a fixed symbol set plus an encoder for it
pub struct TestCodec {
    pub nodes: Vec<(i32, i32)>,
    codes: HashMap<u8, Vec<bool>>,
}

impl TestCodec {
    /// Build a tree over every byte used by `strings` and the terminator
    pub fn for_strings(strings: &[&str]) -> Self {
        let mut symbols: Vec<u8> = strings.iter().flat_map(|s| s.bytes()).collect();
        symbols.push(0);
        symbols.sort_unstable();
        symbols.dedup();
        Self::for_symbols(&symbols)
    }

    /// Build a tree over `symbols` (sorted, unique, non-empty)
    pub fn for_symbols(symbols: &[u8]) -> Self {
        let mut codec = Self {
            nodes: Vec::new(),
            codes: HashMap::new(),
        };
        if symbols.len() == 1 {
            let leaf = leaf_sentinel(symbols[0]);
            codec.nodes.push((leaf, leaf));
            codec.codes.insert(symbols[0], vec![false]);
        } else {
            codec.build(symbols, Vec::new());
        }
        codec
    }

    fn build(&mut self, symbols: &[u8], prefix: Vec<bool>) -> i32 {
        if symbols.len() == 1 {
            self.codes.insert(symbols[0], prefix);
            return leaf_sentinel(symbols[0]);
        }
        let index = self.nodes.len();
        self.nodes.push((0, 0));
        let (left, right) = symbols.split_at(symbols.len() / 2);

        let mut left_prefix = prefix.clone();
        left_prefix.push(false);
        let left_branch = self.build(left, left_prefix);

        let mut right_prefix = prefix;
        right_prefix.push(true);
        let right_branch = self.build(right, right_prefix);

        self.nodes[index] = (left_branch, right_branch);
        index as i32
    }

    /// Code for one byte
    pub fn code(&self, byte: u8) -> &[bool] {
        &self.codes[&byte]
    }

    /// Encode null-terminated strings back to back.
    /// Returns the packed blob and the bit offset of each string.
    pub fn encode(&self, strings: &[&str]) -> (Vec<u8>, Vec<i32>) {
        let mut bits = Vec::new();
        let mut offsets = Vec::new();
        for s in strings {
            offsets.push(bits.len() as i32);
            for b in s.bytes().chain(std::iter::once(0)) {
                bits.extend_from_slice(self.code(b));
            }
        }
        (pack_bits(&bits), offsets)
    }
}

/// Pack bits MSB first, zero padding the last byte
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << (7 - i)))
        })
        .collect()
}

/// Assemble a complete talk table image
pub fn build_tlk(
    male: &[(i32, i32)],
    female: &[(i32, i32)],
    nodes: &[(i32, i32)],
    blob: &[u8],
) -> Vec<u8> {
    build_tlk_with_magic(TLK_MAGIC, male, female, nodes, blob)
}

/// Assemble a talk table image with an arbitrary magic value
pub fn build_tlk_with_magic(
    magic: i32,
    male: &[(i32, i32)],
    female: &[(i32, i32)],
    nodes: &[(i32, i32)],
    blob: &[u8],
) -> Vec<u8> {
    let mut out = Vec::new();
    for v in [
        magic,
        3,
        2,
        male.len() as i32,
        female.len() as i32,
        nodes.len() as i32,
        blob.len() as i32,
    ] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    for &(a, b) in male.iter().chain(female).chain(nodes) {
        out.extend_from_slice(&a.to_le_bytes());
        out.extend_from_slice(&b.to_le_bytes());
    }
    out.extend_from_slice(blob);
    out
}
