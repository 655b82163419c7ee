//! Font storage access
//!
//! Font blobs may live in RAM, memory-mapped flash or a separate program
//! address space. The decoder only ever asks for bytes at an offset, so a
//! platform needs one [`FontSource`] implementation and nothing else.

/// Random-access, read-only font storage
///
/// Multi-byte values are big-endian. Reads past the end return zero so a
/// truncated or corrupt table renders garbage instead of panicking.
pub trait FontSource {
    /// Total size in bytes
    fn len(&self) -> usize;

    /// Read one byte
    fn read_u8(&self, offset: usize) -> u8;

    /// True if the source holds no bytes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read a big-endian 16-bit value
    fn read_u16(&self, offset: usize) -> u16 {
        (self.read_u8(offset) as u16) << 8 | self.read_u8(offset + 1) as u16
    }

    /// Read a big-endian 24-bit value
    fn read_u24(&self, offset: usize) -> u32 {
        (self.read_u8(offset) as u32) << 16
            | (self.read_u8(offset + 1) as u32) << 8
            | self.read_u8(offset + 2) as u32
    }
}

impl FontSource for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn read_u8(&self, offset: usize) -> u8 {
        self.get(offset).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_reads() {
        let data: &[u8] = &[0x12, 0x34, 0x56, 0x78];
        assert_eq!(data.read_u8(0), 0x12);
        assert_eq!(data.read_u16(1), 0x3456);
        assert_eq!(data.read_u24(1), 0x34_5678);
    }

    #[test]
    fn test_reads_past_end_are_zero() {
        let data: &[u8] = &[0xAB];
        assert_eq!(data.read_u8(1), 0);
        assert_eq!(data.read_u16(0), 0xAB00);
        assert_eq!(data.read_u24(5), 0);
        assert!(!FontSource::is_empty(data));
    }
}
