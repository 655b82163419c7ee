//! Byte-at-a-time UTF-8 reassembly
//!
//! Text arrives one byte per write call, so multi-byte sequences have to
//! be collected across calls before a glyph can be looked up.

/// Maximum bytes in one UTF-8 sequence
pub const UTF8_MAX_LEN: usize = 4;

/// Result of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Utf8Step {
    /// Sequence started or extended, more bytes expected
    NeedMore,
    /// Sequence complete, decoded codepoint attached
    Complete(u32),
    /// Malformed sequence, accumulator reset
    Invalid,
}

/// Stateful UTF-8 sequence reassembler
///
/// Each instance is an independent decode stream.
#[derive(Debug, Clone, Default)]
pub struct Utf8Accumulator {
    buffer: [u8; UTF8_MAX_LEN],
    count: usize,
}

impl Utf8Accumulator {
    /// Create an empty accumulator
    pub const fn new() -> Self {
        Self {
            buffer: [0; UTF8_MAX_LEN],
            count: 0,
        }
    }

    /// Drop any partial sequence
    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// True while a sequence has been started but not completed
    pub fn is_pending(&self) -> bool {
        self.count > 0
    }

    /// Feed one byte with the high bit set
    ///
    /// A lead byte (`>= 0xC0`) always restarts the sequence, so a lead
    /// byte arriving mid-sequence silently discards the earlier bytes.
    pub fn feed(&mut self, byte: u8) -> Utf8Step {
        if byte >= 0xC0 {
            self.buffer[0] = byte;
            self.count = 1;
            return Utf8Step::NeedMore;
        }

        if self.count == 0 || self.count >= UTF8_MAX_LEN {
            self.count = 0;
            return Utf8Step::Invalid;
        }

        self.buffer[self.count] = byte;
        self.count += 1;

        let lead = self.buffer[0];
        let complete = match self.count {
            2 => lead < 0xE0,
            3 => lead < 0xF0,
            _ => {
                // Fourth byte only completes a 4-byte sequence
                if lead < 0xF0 {
                    self.count = 0;
                    return Utf8Step::Invalid;
                }
                true
            }
        };

        if complete {
            let codepoint = self.codepoint();
            self.count = 0;
            Utf8Step::Complete(codepoint)
        } else {
            Utf8Step::NeedMore
        }
    }

    /// Decode the buffered sequence
    ///
    /// The lead byte's length class selects how many payload bits it
    /// carries, continuation bytes contribute 6 bits each, most
    /// significant first.
    pub fn codepoint(&self) -> u32 {
        let lead = self.buffer[0];
        let (mut value, len) = if lead >= 0xF0 {
            ((lead & 0b0000_0111) as u32, 4)
        } else if lead >= 0xE0 {
            ((lead & 0b0000_1111) as u32, 3)
        } else if lead >= 0xC0 {
            ((lead & 0b0001_1111) as u32, 2)
        } else {
            return 0;
        };
        for &byte in &self.buffer[1..len] {
            value = (value << 6) | (byte & 0b0011_1111) as u32;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed_all(acc: &mut Utf8Accumulator, bytes: &[u8]) -> Utf8Step {
        let mut last = Utf8Step::Invalid;
        for &b in bytes {
            last = acc.feed(b);
        }
        last
    }

    #[test]
    fn test_three_byte_sequence() {
        let mut acc = Utf8Accumulator::new();
        assert_eq!(acc.feed(0xE4), Utf8Step::NeedMore);
        assert_eq!(acc.feed(0xB8), Utf8Step::NeedMore);
        assert_eq!(acc.feed(0xAD), Utf8Step::Complete(0x4E2D));
        assert!(!acc.is_pending());
    }

    #[test]
    fn test_two_and_four_byte_sequences() {
        let mut acc = Utf8Accumulator::new();
        assert_eq!(feed_all(&mut acc, &[0xC3, 0xA9]), Utf8Step::Complete(0xE9));
        assert_eq!(
            feed_all(&mut acc, &[0xF0, 0x9F, 0x98, 0x80]),
            Utf8Step::Complete(0x1F600)
        );
    }

    #[test]
    fn test_lead_byte_restarts_sequence() {
        let mut acc = Utf8Accumulator::new();
        assert_eq!(acc.feed(0xE4), Utf8Step::NeedMore);
        assert_eq!(acc.feed(0xC3), Utf8Step::NeedMore);
        assert_eq!(acc.feed(0xA9), Utf8Step::Complete(0xE9));
    }

    #[test]
    fn test_orphan_continuation_is_invalid() {
        let mut acc = Utf8Accumulator::new();
        assert_eq!(acc.feed(0x80), Utf8Step::Invalid);
        assert!(!acc.is_pending());
    }

    #[test]
    fn test_continuation_after_complete_is_invalid() {
        let mut acc = Utf8Accumulator::new();
        assert_eq!(feed_all(&mut acc, &[0xC3, 0xA9]), Utf8Step::Complete(0xE9));
        assert_eq!(acc.feed(0xA9), Utf8Step::Invalid);
    }

    #[test]
    fn test_recovers_after_invalid() {
        let mut acc = Utf8Accumulator::new();
        assert_eq!(acc.feed(0xBF), Utf8Step::Invalid);
        assert_eq!(
            feed_all(&mut acc, &[0xE4, 0xB8, 0xAD]),
            Utf8Step::Complete(0x4E2D)
        );
    }

    #[test]
    fn test_reset_drops_partial_sequence() {
        let mut acc = Utf8Accumulator::new();
        acc.feed(0xE4);
        assert!(acc.is_pending());
        acc.reset();
        assert_eq!(acc.feed(0xB8), Utf8Step::Invalid);
    }

    proptest! {
        #[test]
        fn prop_decodes_like_core_str(c in any::<char>().prop_filter("multi-byte", |c| !c.is_ascii())) {
            let mut buf = [0u8; 4];
            let encoded = c.encode_utf8(&mut buf);
            let mut acc = Utf8Accumulator::new();
            let bytes = encoded.as_bytes();
            for &b in &bytes[..bytes.len() - 1] {
                prop_assert_eq!(acc.feed(b), Utf8Step::NeedMore);
            }
            prop_assert_eq!(acc.feed(bytes[bytes.len() - 1]), Utf8Step::Complete(c as u32));
        }
    }
}
