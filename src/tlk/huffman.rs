//! Huffman tree used to decode the string blob
//!
//! On disk every node is a pair of i32 values. A non-negative value is the
//! index of a child node, a negative value is a leaf sentinel carrying the
//! literal byte `(0xFFFF - value) & 0xFF`. Sentinels are converted into
//! [`Branch`] values once, while the tree is loaded.

use crate::{Result, TlkError};

/// Outcome of following one branch of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// Continue at the node with this index
    Interior(usize),
    /// Emit this literal byte and restart from the root
    Leaf(u8),
}

impl Branch {
    /// Convert a raw on-disk branch value
    pub fn from_raw(value: i32) -> Result<Self> {
        if value >= 0 {
            return Ok(Branch::Interior(value as usize));
        }
        let literal = 0xFFFF_i32
            .checked_sub(value)
            .ok_or(TlkError::InvalidLeafValue { value })?;
        Ok(Branch::Leaf((literal & 0xFF) as u8))
    }
}

/// Raw on-disk sentinel encoding `byte` as a leaf
pub const fn leaf_sentinel(byte: u8) -> i32 {
    -1 - byte as i32
}

/// A single tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanNode {
    /// Branch taken on a 0 bit
    pub left: Branch,
    /// Branch taken on a 1 bit
    pub right: Branch,
}

/// Indexed node array; node 0 is the decode root
#[derive(Debug, Clone, Default)]
pub struct HuffmanTree {
    nodes: Vec<HuffmanNode>,
}

impl HuffmanTree {
    /// Build a tree from `(left, right)` pairs in file order
    ///
    /// Fails if a sentinel cannot be converted or a child index points
    /// outside the node array.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let nodes = pairs
            .into_iter()
            .map(|(left, right)| {
                Ok(HuffmanNode {
                    left: Branch::from_raw(left)?,
                    right: Branch::from_raw(right)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let len = nodes.len();
        for node in &nodes {
            for branch in [node.left, node.right] {
                if let Branch::Interior(index) = branch {
                    if index >= len {
                        return Err(TlkError::TreeIndexOutOfRange { index, len });
                    }
                }
            }
        }

        Ok(Self { nodes })
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes (and therefore no root)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Follow the branch selected by `bit` (false = left, true = right)
    #[inline]
    pub fn step(&self, node: usize, bit: bool) -> Result<Branch> {
        let node = self.nodes.get(node).ok_or(TlkError::TreeIndexOutOfRange {
            index: node,
            len: self.nodes.len(),
        })?;
        Ok(if bit { node.right } else { node.left })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_decoding() {
        assert_eq!(Branch::from_raw(0).unwrap(), Branch::Interior(0));
        assert_eq!(Branch::from_raw(7).unwrap(), Branch::Interior(7));
        assert_eq!(Branch::from_raw(-1).unwrap(), Branch::Leaf(0));
        assert_eq!(Branch::from_raw(-66).unwrap(), Branch::Leaf(b'A'));
        // Only the low byte of 0xFFFF - value is kept
        assert_eq!(Branch::from_raw(-257).unwrap(), Branch::Leaf(0));
    }

    #[test]
    fn test_leaf_sentinel_inverse() {
        for byte in 0..=u8::MAX {
            assert_eq!(
                Branch::from_raw(leaf_sentinel(byte)).unwrap(),
                Branch::Leaf(byte)
            );
        }
    }

    #[test]
    fn test_unconvertible_leaf() {
        match Branch::from_raw(i32::MIN) {
            Err(TlkError::InvalidLeafValue { value }) => assert_eq!(value, i32::MIN),
            other => panic!("expected InvalidLeafValue, got {other:?}"),
        }
        // Largest magnitude that still converts
        assert!(Branch::from_raw(0xFFFF - i32::MAX).is_ok());
    }

    #[test]
    fn test_child_index_out_of_range() {
        let result = HuffmanTree::from_pairs([(1, leaf_sentinel(0)), (2, leaf_sentinel(b'x'))]);
        match result {
            Err(TlkError::TreeIndexOutOfRange { index, len }) => {
                assert_eq!(index, 2);
                assert_eq!(len, 2);
            }
            other => panic!("expected TreeIndexOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_step() {
        let tree =
            HuffmanTree::from_pairs([(1, leaf_sentinel(0)), (leaf_sentinel(b'a'), leaf_sentinel(b'b'))])
                .unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.step(0, false).unwrap(), Branch::Interior(1));
        assert_eq!(tree.step(0, true).unwrap(), Branch::Leaf(0));
        assert_eq!(tree.step(1, false).unwrap(), Branch::Leaf(b'a'));
        assert_eq!(tree.step(1, true).unwrap(), Branch::Leaf(b'b'));
    }

    #[test]
    fn test_empty_tree_has_no_root() {
        let tree = HuffmanTree::from_pairs(Vec::new()).unwrap();
        assert!(tree.is_empty());
        assert!(matches!(
            tree.step(0, false),
            Err(TlkError::TreeIndexOutOfRange { index: 0, len: 0 })
        ));
    }
}
