//! ICAO Annex 10 6-bit character set
//!
//! Aircraft identification fields (extended squitter identification messages
//! and Comm-B BDS 2,0 registers) pack eight characters at six bits each.

use crate::bits::BitStream;

/// The Annex 10 alphabet, indexed by the 6-bit character code. Codes with no
/// assigned character map to '?'.
const MODE_S_CHARSET: &[u8; 64] =
    b"?ABCDEFGHIJKLMNOPQRSTUVWXYZ????? ???????????????0123456789??????";

/// Consume eight 6-bit characters from the stream and return the callsign
/// with trailing padding removed.
pub fn extract_callsign(bits: &mut BitStream<'_>) -> String {
    let mut callsign = String::with_capacity(8);
    for _ in 0..8 {
        callsign.push(MODE_S_CHARSET[bits.read_u8(6) as usize] as char);
    }
    callsign.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_known_callsign() {
        // The identification payload of the well-known KLM1023 squitter.
        let data = [0x2C, 0xC3, 0x71, 0xC3, 0x2C, 0xE0];
        let mut bits = BitStream::new(&data);
        assert_eq!(extract_callsign(&mut bits), "KLM1023");
    }

    #[test]
    fn test_unassigned_codes_become_question_marks() {
        let data = [0xFF; 6];
        let mut bits = BitStream::new(&data);
        assert_eq!(extract_callsign(&mut bits), "????????");
    }

    #[test]
    fn test_all_padding_is_empty() {
        // Eight space characters (code 32).
        let data = [0x82, 0x08, 0x20, 0x82, 0x08, 0x20];
        let mut bits = BitStream::new(&data);
        assert_eq!(extract_callsign(&mut bits), "");
    }
}
