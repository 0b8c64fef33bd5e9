//! Fixed 28-byte talk table header

use crate::stream::ByteStream;
use crate::{Result, TlkError, ENTRY_SIZE, HEADER_SIZE, TLK_MAGIC, TLK_MAGIC_SWAPPED};

/// Talk table header: seven little-endian i32 fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TalkTableHeader {
    /// Format identifier, always [`TLK_MAGIC`] once parsed
    pub magic: i32,
    /// Format version
    pub version: i32,
    /// Minimum compatible version
    pub min_version: i32,
    /// Entries in the first group (male strings)
    pub entry1_count: i32,
    /// Entries in the second group (female strings)
    pub entry2_count: i32,
    /// Number of Huffman tree nodes
    pub tree_node_count: i32,
    /// Length of the compressed blob in bytes
    pub data_length: i32,
}

impl TalkTableHeader {
    /// Read and validate the header from the current stream position
    ///
    /// The magic is checked before any other field is looked at.
    pub fn read(stream: &mut ByteStream<'_>) -> Result<Self> {
        let magic = stream.read_i32_le()?;
        Self::check_magic(magic)?;

        let header = Self {
            magic,
            version: stream.read_i32_le()?,
            min_version: stream.read_i32_le()?,
            entry1_count: stream.read_i32_le()?,
            entry2_count: stream.read_i32_le()?,
            tree_node_count: stream.read_i32_le()?,
            data_length: stream.read_i32_le()?,
        };
        header.validate_counts()?;
        Ok(header)
    }

    /// Classify a magic value
    pub fn check_magic(magic: i32) -> Result<()> {
        match magic {
            TLK_MAGIC => Ok(()),
            TLK_MAGIC_SWAPPED => Err(TlkError::WrongPlatformFormat { magic }),
            _ => Err(TlkError::NotThisFormat { magic }),
        }
    }

    fn validate_counts(&self) -> Result<()> {
        for (field, value) in [
            ("entry1_count", self.entry1_count),
            ("entry2_count", self.entry2_count),
            ("tree_node_count", self.tree_node_count),
            ("data_length", self.data_length),
        ] {
            if value < 0 {
                return Err(TlkError::InvalidHeaderField { field, value });
            }
        }
        Ok(())
    }

    /// Number of entries in the first group
    pub fn male_count(&self) -> usize {
        self.entry1_count as usize
    }

    /// Number of entries in both groups together
    pub fn total_entries(&self) -> usize {
        self.entry1_count as usize + self.entry2_count as usize
    }

    /// Number of tree nodes
    pub fn node_count(&self) -> usize {
        self.tree_node_count as usize
    }

    /// Blob length in bytes
    pub fn data_len(&self) -> usize {
        self.data_length as usize
    }

    /// Size of the entry table in bytes, `None` if it does not fit in `usize`
    pub fn entries_size(&self) -> Option<usize> {
        self.total_entries().checked_mul(ENTRY_SIZE)
    }

    /// Byte offset of the Huffman tree, right after the entry table
    pub fn tree_offset(&self) -> Option<usize> {
        self.entries_size()?.checked_add(HEADER_SIZE)
    }
}
