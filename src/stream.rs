//! Seekable little-endian byte stream over an in-memory buffer
//!
//! Talk tables are read front to back except for one rewind to the entry
//! table, so the whole file is held in memory and read through this cursor.

use crate::{Result, TlkError};

/// Cursor over a byte slice with bounds-checked reads and seeks
#[derive(Debug, Clone)]
pub struct ByteStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteStream<'a> {
    /// Create a stream positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the current position and the end
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Move to an absolute position; seeking exactly to the end is allowed
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(TlkError::TruncatedStream {
                position: self.pos,
                requested: pos - self.pos,
                available: self.remaining(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Read `n` bytes and advance past them
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(TlkError::TruncatedStream {
                position: self.pos,
                requested: n,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Read a little-endian i32
    pub fn read_i32_le(&mut self) -> Result<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a pair of little-endian i32 values
    pub fn read_i32_pair(&mut self) -> Result<(i32, i32)> {
        let first = self.read_i32_le()?;
        let second = self.read_i32_le()?;
        Ok((first, second))
    }
}
