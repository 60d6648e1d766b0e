//! Sequential bit reader over a byte buffer
//!
//! Mode S replies are dense bit-packed records, so the field extractors walk
//! the frame with a single MSB-first cursor rather than juggling shifts and
//! masks per byte.

/// A cursor over a byte slice that consumes bits MSB-first.
///
/// The cursor can be rewound with a negative [`skip`](BitStream::skip), which
/// the translator uses to reclassify DF24 frames and to re-read Comm-B
/// payloads. All cursor arithmetic is checked: reading or skipping outside
/// the buffer panics, since that indicates a framing bug in the caller rather
/// than noisy input.
#[derive(Debug)]
pub struct BitStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitStream<'a> {
    /// Create a cursor at bit offset 0 over `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current bit offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bits left before the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    /// Move the cursor by `bits`, which may be negative to rewind.
    ///
    /// # Panics
    /// Panics if the new position would fall outside the buffer.
    pub fn skip(&mut self, bits: isize) {
        let new_pos = self
            .pos
            .checked_add_signed(bits)
            .expect("bit stream rewound past start of buffer");
        assert!(
            new_pos <= self.data.len() * 8,
            "bit stream skipped past end of buffer"
        );
        self.pos = new_pos;
    }

    /// Consume and return a single bit.
    pub fn read_bit(&mut self) -> bool {
        assert!(self.pos < self.data.len() * 8, "bit stream overrun");
        let byte = self.data[self.pos / 8];
        let bit = (byte >> (7 - (self.pos % 8))) & 1;
        self.pos += 1;
        bit != 0
    }

    /// Consume `bits` bits (1..=32) MSB-first, zero-extended into a u32.
    ///
    /// # Panics
    /// Panics if `bits` is outside 1..=32 or the read runs past the buffer.
    pub fn read_u32(&mut self, bits: u32) -> u32 {
        assert!((1..=32).contains(&bits), "read width must be 1..=32 bits");
        assert!(
            self.pos + bits as usize <= self.data.len() * 8,
            "bit stream overrun"
        );
        let mut value = 0u32;
        for _ in 0..bits {
            let byte = self.data[self.pos / 8];
            let bit = (byte >> (7 - (self.pos % 8))) & 1;
            value = (value << 1) | bit as u32;
            self.pos += 1;
        }
        value
    }

    /// Consume `bits` bits (1..=16) MSB-first into a u16.
    pub fn read_u16(&mut self, bits: u32) -> u16 {
        assert!(bits <= 16, "read width must be 1..=16 bits");
        self.read_u32(bits) as u16
    }

    /// Consume `bits` bits (1..=8) MSB-first into a u8.
    pub fn read_u8(&mut self, bits: u32) -> u8 {
        assert!(bits <= 8, "read width must be 1..=8 bits");
        self.read_u32(bits) as u8
    }

    /// Consume `N` whole bytes, which need not be byte-aligned in the stream.
    pub fn read_bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        for slot in out.iter_mut() {
            *slot = self.read_u8(8);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bits_msb_first() {
        let data = [0b1010_1100, 0b0101_0011];
        let mut bits = BitStream::new(&data);
        assert!(bits.read_bit());
        assert!(!bits.read_bit());
        assert_eq!(bits.read_u8(3), 0b101);
        assert_eq!(bits.position(), 5);
        // Crosses the byte boundary
        assert_eq!(bits.read_u16(6), 0b100_010);
        assert_eq!(bits.remaining(), 5);
    }

    #[test]
    fn test_read_u32_full_width() {
        let data = [0xDE, 0xAD, 0xBE, 0xEF];
        let mut bits = BitStream::new(&data);
        assert_eq!(bits.read_u32(32), 0xDEADBEEF);
    }

    #[test]
    fn test_skip_and_rewind() {
        let data = [0xF0, 0x0F];
        let mut bits = BitStream::new(&data);
        bits.skip(8);
        assert_eq!(bits.read_u8(4), 0x0);
        bits.skip(-12);
        assert_eq!(bits.read_u8(4), 0xF);
    }

    #[test]
    fn test_read_bytes_unaligned() {
        let data = [0x0F, 0xF0, 0x0F];
        let mut bits = BitStream::new(&data);
        bits.skip(4);
        assert_eq!(bits.read_bytes::<2>(), [0xFF, 0x00]);
    }

    #[test]
    #[should_panic(expected = "bit stream overrun")]
    fn test_read_past_end_panics() {
        let data = [0xFF];
        let mut bits = BitStream::new(&data);
        bits.read_u16(9);
    }

    #[test]
    #[should_panic(expected = "rewound past start")]
    fn test_rewind_past_start_panics() {
        let data = [0xFF];
        let mut bits = BitStream::new(&data);
        bits.skip(4);
        bits.skip(-5);
    }
}
