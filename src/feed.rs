//! AVR feed frame parsing
//!
//! Raw feeds deliver one frame per line in the AVR text format: `*` followed
//! by the frame hex and a terminating `;`. Timestamped variants prefix the
//! hex with a 48-bit MLAT counter: `@` for receiver frames, `%` for frames
//! derived by multilateration. The parser strips the wrapper and hands the
//! bare frame bytes to the translator.

/// Longest Mode S frame in bytes (112 bits).
pub const MODES_LONG_FRAME_BYTES: usize = 14;

/// One de-framed AVR line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvrFrame {
    /// The bare frame bytes, wrapper and timestamp removed.
    pub bytes: Vec<u8>,
    /// 48-bit MLAT counter for `@`/`%` frames.
    pub timestamp: Option<u64>,
    /// Whether the frame came from a multilateration source.
    pub is_mlat: bool,
}

/// Parse one AVR line. Returns `None` for anything that is not a
/// well-formed frame; feeds routinely interleave keep-alives and garbage,
/// so rejects are silent.
pub fn parse_avr_frame(line: &str) -> Option<AvrFrame> {
    let line = line.trim();
    if line.len() < 3 || !line.ends_with(';') {
        return None;
    }

    let (timestamped, is_mlat) = match line.as_bytes()[0] {
        b'*' => (false, false),
        b'@' => (true, false),
        b'%' => (true, true),
        _ => return None,
    };

    let mut hex = &line[1..line.len() - 1];
    let mut timestamp = None;
    if timestamped {
        // Validate the prefix byte-wise before slicing; the line is
        // arbitrary feed input and may not even be ASCII.
        if hex.len() < 12 {
            return None;
        }
        let mut counter = 0u64;
        for &c in &hex.as_bytes()[..12] {
            counter = (counter << 4) | u64::from(hex_digit_val(c)?);
        }
        timestamp = Some(counter);
        hex = &hex[12..];
    }

    if hex.is_empty() || hex.len() % 2 != 0 || hex.len() > MODES_LONG_FRAME_BYTES * 2 {
        return None;
    }

    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for chunk in hex.as_bytes().chunks(2) {
        let high = hex_digit_val(chunk[0])?;
        let low = hex_digit_val(chunk[1])?;
        bytes.push((high << 4) | low);
    }

    Some(AvrFrame {
        bytes,
        timestamp,
        is_mlat,
    })
}

fn hex_digit_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_frame() {
        let frame = parse_avr_frame("*8D4840D6202CC371C32CE0576098;").unwrap();
        assert_eq!(frame.bytes.len(), 14);
        assert_eq!(frame.bytes[0], 0x8D);
        assert_eq!(frame.timestamp, None);
        assert!(!frame.is_mlat);
    }

    #[test]
    fn test_parse_timestamped_frame() {
        let frame = parse_avr_frame("@0000000012342004F9C81F20D3;").unwrap();
        assert_eq!(frame.timestamp, Some(0x1234));
        assert_eq!(frame.bytes, vec![0x20, 0x04, 0xF9, 0xC8, 0x1F, 0x20, 0xD3]);
        assert!(!frame.is_mlat);
    }

    #[test]
    fn test_parse_mlat_frame() {
        let frame = parse_avr_frame("%0000000000FF2004F9C81F20D3;").unwrap();
        assert!(frame.is_mlat);
        assert_eq!(frame.timestamp, Some(0xFF));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_avr_frame(""), None);
        assert_eq!(parse_avr_frame("8D4840D6;"), None); // no marker
        assert_eq!(parse_avr_frame("*8D4840D6"), None); // no terminator
        assert_eq!(parse_avr_frame("*8D4840D;"), None); // odd digit count
        assert_eq!(parse_avr_frame("*8D48G0D6;"), None); // bad digit
        assert_eq!(parse_avr_frame("*;"), None); // empty payload
        assert_eq!(parse_avr_frame("@1234*;"), None); // truncated timestamp
    }

    #[test]
    fn test_rejects_multibyte_text_without_panicking() {
        // A multibyte character straddling the timestamp boundary must be a
        // silent reject, not a slice panic.
        assert_eq!(parse_avr_frame("@aaaaaaaaaaa\u{e9};"), None);
        assert_eq!(parse_avr_frame("@\u{30c4}aaaaaaaaaa12345678;"), None);
        assert_eq!(parse_avr_frame("*8D48\u{e9}0D6;"), None);
    }

    #[test]
    fn test_rejects_oversized_frame() {
        let line = format!("*{};", "AB".repeat(MODES_LONG_FRAME_BYTES + 1));
        assert_eq!(parse_avr_frame(&line), None);
    }

    #[test]
    fn test_tolerates_surrounding_whitespace() {
        assert!(parse_avr_frame("  *02E197B00179C3;\r\n").is_some());
    }
}
