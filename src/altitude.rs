//! 13-bit altitude code decoding
//!
//! DF0, DF4, DF16 and DF20 carry a 13-bit AC field. Bit 0x40 (the M bit)
//! selects metric encoding, which is stored raw and unconverted. Otherwise
//! the field is reassembled into an 11-bit value and bit 0x10 (the Q bit)
//! selects between 25 ft binary encoding and the legacy Gillham Gray code.

use serde::Serialize;

/// Conversion from the reassembled 11-bit altitude value to feet.
///
/// Split out as a trait so the translator's tests can inject deterministic
/// stand-ins and verify the routing between the two encodings.
pub trait AltitudeConversion {
    /// Q-bit set: `value` is altitude in 25 ft increments, offset -1000 ft.
    fn binary_altitude(&self, value: u16) -> Option<i32>;

    /// Q-bit clear: `code` is a Gillham Gray code. `None` for the code
    /// patterns the encoding never produces.
    fn gillham_altitude(&self, code: u16) -> Option<i32>;
}

/// The ICAO Annex 10 conversions.
#[derive(Debug, Default)]
pub struct StandardAltitude;

impl AltitudeConversion for StandardAltitude {
    fn binary_altitude(&self, value: u16) -> Option<i32> {
        Some(value as i32 * 25 - 1000)
    }

    fn gillham_altitude(&self, code: u16) -> Option<i32> {
        decode_gillham(code)
    }
}

/// Decode the reassembled 11-bit Gillham code.
///
/// Bit layout, MSB first: C1 A1 C2 A2 C4 A4 B1 B2 D2 B4 D4. The C pulses are
/// a reflected Gray code for the 100 ft increment within a 500 ft band; the
/// D/A/B pulses are a Gray code for the band itself. D1 is never transmitted.
fn decode_gillham(code: u16) -> Option<i32> {
    let c1 = code & 0x400 != 0;
    let a1 = code & 0x200 != 0;
    let c2 = code & 0x100 != 0;
    let a2 = code & 0x080 != 0;
    let c4 = code & 0x040 != 0;
    let a4 = code & 0x020 != 0;
    let b1 = code & 0x010 != 0;
    let b2 = code & 0x008 != 0;
    let d2 = code & 0x004 != 0;
    let b4 = code & 0x002 != 0;
    let d4 = code & 0x001 != 0;

    // Gray to binary for the 100 ft digit. Setting gray bit k toggles all
    // lower result bits, so each pulse XORs a mask.
    let mut one_hundreds: i32 = 0;
    if c1 {
        one_hundreds ^= 0x7;
    }
    if c2 {
        one_hundreds ^= 0x3;
    }
    if c4 {
        one_hundreds ^= 0x1;
    }
    // The digit cycles 1..5; a raw 7 stands for 5, and 0, 5, 6 never occur.
    if one_hundreds & 5 == 5 {
        one_hundreds ^= 2;
    }
    if one_hundreds == 0 || one_hundreds > 5 {
        return None;
    }

    let mut five_hundreds: i32 = 0;
    if d2 {
        five_hundreds ^= 0xFF;
    }
    if d4 {
        five_hundreds ^= 0x7F;
    }
    if a1 {
        five_hundreds ^= 0x3F;
    }
    if a2 {
        five_hundreds ^= 0x1F;
    }
    if a4 {
        five_hundreds ^= 0x0F;
    }
    if b1 {
        five_hundreds ^= 0x07;
    }
    if b2 {
        five_hundreds ^= 0x03;
    }
    if b4 {
        five_hundreds ^= 0x01;
    }

    // The 100 ft digit runs backwards in odd 500 ft bands.
    if five_hundreds & 1 != 0 {
        one_hundreds = 6 - one_hundreds;
    }

    Some(five_hundreds * 500 + one_hundreds * 100 - 1300)
}

/// A decoded 13-bit altitude code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AltitudeCode {
    /// The 13 bits exactly as they appeared on the wire.
    pub raw: u16,
    /// M bit: the raw value is a metric altitude, left unconverted.
    pub is_metric: bool,
    /// Altitude in feet. `None` when metric or when the Gillham code was
    /// not a valid altitude.
    pub feet: Option<i32>,
}

impl AltitudeCode {
    /// Decode a raw 13-bit AC field.
    pub fn decode(raw: u16, conversion: &dyn AltitudeConversion) -> Self {
        if raw & 0x40 != 0 {
            return Self {
                raw,
                is_metric: true,
                feet: None,
            };
        }
        // Drop the M and Q bits, closing the gaps they leave.
        let value = ((raw & 0x1F80) >> 2) | ((raw & 0x20) >> 1) | (raw & 0x0F);
        let feet = if raw & 0x10 != 0 {
            conversion.binary_altitude(value)
        } else {
            conversion.gillham_altitude(value)
        };
        Self {
            raw,
            is_metric: false,
            feet,
        }
    }
}
