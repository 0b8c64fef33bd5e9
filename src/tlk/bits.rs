//! Bit-addressable view over the compressed string blob
//!
//! Bits are numbered from the most significant bit of each byte: bit `i`
//! lives in byte `i / 8` at bit position `7 - (i % 8)`.

/// Read-only buffer addressed by absolute bit index
#[derive(Debug, Clone, Default)]
pub struct BitBuffer {
    data: Vec<u8>,
}

impl BitBuffer {
    /// Wrap raw blob bytes
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Total number of addressable bits
    pub fn len_bits(&self) -> usize {
        self.data.len() * 8
    }

    /// Whether the buffer holds no bits
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bit at absolute index `i`, MSB first within each byte
    ///
    /// # Panics
    ///
    /// Panics if `i >= len_bits()`. Callers bound their loops by `len_bits`.
    #[inline]
    pub fn bit(&self, i: usize) -> bool {
        (self.data[i / 8] >> (7 - (i % 8))) & 1 != 0
    }
}

impl From<Vec<u8>> for BitBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_order() {
        let bits = BitBuffer::new(vec![0b0100_0000, 0b0000_0001]);
        assert_eq!(bits.len_bits(), 16);
        assert!(!bits.bit(0));
        assert!(bits.bit(1));
        for i in 2..15 {
            assert!(!bits.bit(i), "bit {i} should be clear");
        }
        assert!(bits.bit(15));
    }

    #[test]
    fn test_all_bits_of_byte() {
        let bits = BitBuffer::new(vec![0xA5]);
        let read: Vec<bool> = (0..8).map(|i| bits.bit(i)).collect();
        assert_eq!(
            read,
            vec![true, false, true, false, false, true, false, true]
        );
    }

    #[test]
    #[should_panic]
    fn test_read_past_end_panics() {
        let bits = BitBuffer::new(vec![0xFF]);
        bits.bit(8);
    }
}
