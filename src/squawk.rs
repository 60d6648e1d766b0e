//! Mode A identity (squawk) decoding
//!
//! DF5 and DF21 carry the transponder identity as 13 interleaved bits in the
//! order laid down by ICAO Annex 10 vol 4 3.1.2.6.7.1:
//!
//! ```plain
//! C1 A1 C2 A2 C4 A4 X B1 D1 B2 D2 B4 D4
//! ```
//!
//! Each of the four squawk digits A, B, C, D is rebuilt from its three
//! component bits and the result is packed decimally, so squawk 1200 comes
//! back as the integer 1200 rather than an octal conversion.

/// Decode a 13-bit Mode A identity field into a packed-decimal squawk.
///
/// The spare X bit (historically the IDENT/SPI pulse position) is ignored.
/// This mapping is the wire contract: a deviation produces a wrong squawk
/// with nothing to signal the error, so the bit positions below are fixed.
pub fn decode_id13(id13: u16) -> u16 {
    let a = ((id13 >> 11) & 1) | ((id13 >> 8) & 2) | ((id13 >> 5) & 4);
    let b = ((id13 >> 5) & 1) | ((id13 >> 2) & 2) | ((id13 << 1) & 4);
    let c = ((id13 >> 12) & 1) | ((id13 >> 9) & 2) | ((id13 >> 6) & 4);
    let d = ((id13 >> 4) & 1) | ((id13 >> 1) & 2) | ((id13 << 2) & 4);
    a * 1000 + b * 100 + c * 10 + d
}
