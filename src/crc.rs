//! Mode S CRC-24 and the parity overlay
//!
//! Every Mode S reply carries a 24-bit CRC in its final three bytes, XORed
//! with either the transmitter address (AP) or the interrogator identifier
//! (PI). The generator polynomial is 0xFFF409 per ICAO Annex 10.

/// Generator polynomial for the Mode S CRC-24.
const MODES_GENERATOR_POLY: u32 = 0xFFF409;

/// Byte-wise CRC lookup table, built at compile time.
const CRC_TABLE: [u32; 256] = generate_crc_table();

const fn generate_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut c = (i as u32) << 16;
        let mut j = 0;
        while j < 8 {
            if c & 0x800000 != 0 {
                c = (c << 1) ^ MODES_GENERATOR_POLY;
            } else {
                c <<= 1;
            }
            j += 1;
        }
        table[i] = c & 0xFFFFFF;
        i += 1;
    }
    table
}

/// Compute the Mode S CRC-24 over `data`.
///
/// For a well-formed reply the checksum over everything except the final
/// three bytes equals those three bytes XOR the AP/PI overlay; for extended
/// squitters the overlay is zero, so the checksum matches the trailing bytes
/// exactly.
pub fn checksum(data: &[u8]) -> u32 {
    let mut rem = 0u32;
    for &byte in data {
        rem = ((rem << 8) & 0xFFFFFF) ^ CRC_TABLE[(byte ^ (rem >> 16) as u8) as usize];
    }
    rem
}

/// XOR the CRC-24 of the message body onto its final three bytes, in place.
///
/// Messages of six bytes or fewer have no separable parity field and are left
/// untouched. The CRC is computed over `bytes[offset .. offset + length - 3]`,
/// which excludes the parity bytes themselves, so this is a pure XOR toggle:
/// applying it a second time restores the original buffer. Feed simulators
/// use the same call to inject parity that they use to remove it.
///
/// # Panics
/// Panics if `offset`/`length` are inconsistent with `bytes.len()`.
pub fn strip_parity(bytes: &mut [u8], offset: usize, length: usize) {
    if length <= 6 {
        return;
    }
    let crc = checksum(&bytes[offset..offset + length - 3]);
    bytes[offset + length - 3] ^= (crc >> 16) as u8;
    bytes[offset + length - 2] ^= (crc >> 8) as u8;
    bytes[offset + length - 1] ^= crc as u8;
}
