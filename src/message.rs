//! Decoded Mode S messages
//!
//! A reply is represented as the handful of fields every frame carries plus
//! a tagged union with one variant per downlink format, so the fields that
//! are valid for a given format are a property of the type rather than a
//! convention over a flat record.

use std::fmt;

use serde::Serialize;

use crate::altitude::AltitudeCode;

/// The 5-bit downlink format code. Raw values of 24 and above use only two
/// format bits on the wire and are clamped to 24 by the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DownlinkFormat {
    /// DF0
    ShortAirToAirSurveillance,
    /// DF4
    SurveillanceAltitudeReply,
    /// DF5
    SurveillanceIdentityReply,
    /// DF11
    AllCallReply,
    /// DF16
    LongAirToAirSurveillance,
    /// DF17
    ExtendedSquitter,
    /// DF18
    ExtendedSquitterNonTransponder,
    /// DF19
    MilitaryExtendedSquitter,
    /// DF20
    CommBAltitudeReply,
    /// DF21
    CommBIdentityReply,
    /// DF24
    CommD,
    /// A format code with no documented field layout.
    Unassigned(u8),
}

impl DownlinkFormat {
    /// Map an already-clamped format number (0..=24) to its variant.
    pub fn from_number(number: u8) -> Self {
        match number {
            0 => Self::ShortAirToAirSurveillance,
            4 => Self::SurveillanceAltitudeReply,
            5 => Self::SurveillanceIdentityReply,
            11 => Self::AllCallReply,
            16 => Self::LongAirToAirSurveillance,
            17 => Self::ExtendedSquitter,
            18 => Self::ExtendedSquitterNonTransponder,
            19 => Self::MilitaryExtendedSquitter,
            20 => Self::CommBAltitudeReply,
            21 => Self::CommBIdentityReply,
            24 => Self::CommD,
            other => Self::Unassigned(other),
        }
    }

    /// The numeric format code, 0..=24.
    pub fn number(&self) -> u8 {
        match self {
            Self::ShortAirToAirSurveillance => 0,
            Self::SurveillanceAltitudeReply => 4,
            Self::SurveillanceIdentityReply => 5,
            Self::AllCallReply => 11,
            Self::LongAirToAirSurveillance => 16,
            Self::ExtendedSquitter => 17,
            Self::ExtendedSquitterNonTransponder => 18,
            Self::MilitaryExtendedSquitter => 19,
            Self::CommBAltitudeReply => 20,
            Self::CommBIdentityReply => 21,
            Self::CommD => 24,
            Self::Unassigned(n) => *n,
        }
    }

    /// Whether the format occupies a 112-bit frame.
    pub fn is_long_frame(&self) -> bool {
        matches!(self.number(), 16..=21 | 24)
    }
}

/// VS field of the air-to-air surveillance formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerticalStatus {
    Airborne,
    OnGround,
}

impl VerticalStatus {
    pub fn from_bit(on_ground: bool) -> Self {
        if on_ground {
            Self::OnGround
        } else {
            Self::Airborne
        }
    }
}

/// Address portion of a DF18 non-transponder extended squitter, selected by
/// the control field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NonTransponderAddress {
    /// CF 0 and 6: the 24-bit field is a real ICAO address.
    Icao24 { icao24: u32, message: [u8; 7] },
    /// CF 1, 2 and 3: anonymous or TIS-B track file addresses.
    NonIcao { address: u32, message: [u8; 7] },
    /// Any other control field: a 10-byte supplementary payload instead.
    Supplementary { message: [u8; 10] },
}

/// Payload of a DF19 military extended squitter, selected by the application
/// field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MilitaryApplication {
    /// AF 0 carries a standard ADS-B squitter.
    AdsB {
        icao24: u32,
        message: [u8; 7],
        parity_interrogator: u32,
    },
    /// Everything else is opaque; the remainder of the frame is kept raw.
    Supplementary { message: [u8; 13] },
}

/// Format-specific fields of a decoded reply. Field order within each
/// variant follows the wire layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DownlinkFields {
    /// DF0
    ShortAirToAirSurveillance {
        vertical_status: VerticalStatus,
        cross_link_capability: bool,
        sensitivity_level: u8,
        reply_information: u8,
        altitude: AltitudeCode,
        address_parity: u32,
    },
    /// DF4
    SurveillanceAltitudeReply {
        flight_status: u8,
        downlink_request: u8,
        utility_message: u8,
        altitude: AltitudeCode,
        parity_identifier: u32,
    },
    /// DF5
    SurveillanceIdentityReply {
        flight_status: u8,
        downlink_request: u8,
        utility_message: u8,
        identity: u16,
        parity_identifier: u32,
    },
    /// DF11
    AllCallReply {
        capability: u8,
        icao24: u32,
        parity_interrogator: u32,
    },
    /// DF16
    LongAirToAirSurveillance {
        vertical_status: VerticalStatus,
        sensitivity_level: u8,
        reply_information: u8,
        altitude: AltitudeCode,
        acas_message: [u8; 7],
        parity_identifier: u32,
    },
    /// DF17
    ExtendedSquitter {
        capability: u8,
        icao24: u32,
        message: [u8; 7],
        parity_interrogator: u32,
    },
    /// DF18
    ExtendedSquitterNonTransponder {
        control_field: u8,
        address: NonTransponderAddress,
        parity_interrogator: u32,
    },
    /// DF19
    MilitaryExtendedSquitter {
        application_field: u8,
        application: MilitaryApplication,
    },
    /// DF20
    CommBAltitudeReply {
        flight_status: u8,
        downlink_request: u8,
        utility_message: u8,
        altitude: AltitudeCode,
        comm_b_message: [u8; 7],
        possible_callsign: Option<String>,
        parity_identifier: u32,
    },
    /// DF21
    CommBIdentityReply {
        flight_status: u8,
        downlink_request: u8,
        utility_message: u8,
        identity: u16,
        comm_b_message: [u8; 7],
        possible_callsign: Option<String>,
        parity_identifier: u32,
    },
    /// DF24
    CommD {
        elm_control: bool,
        d_segment_number: u8,
        comm_d_message: [u8; 10],
        parity_identifier: u32,
    },
    /// A downlink format the decoder has no layout for. Tolerated rather
    /// than rejected so future format assignments pass through.
    Unsupported,
}

/// A single decoded Mode S reply, created fresh per decode call and owned by
/// the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeSMessage {
    pub downlink_format: DownlinkFormat,
    /// Signal strength reported by the feed layer, passed through untouched.
    pub signal_level: Option<i32>,
    /// Whether the frame was derived by multilateration rather than received.
    pub is_mlat: bool,
    pub fields: DownlinkFields,
}

impl ModeSMessage {
    /// The ICAO 24-bit address, for the formats that transmit one in clear.
    pub fn icao24(&self) -> Option<u32> {
        match &self.fields {
            DownlinkFields::AllCallReply { icao24, .. }
            | DownlinkFields::ExtendedSquitter { icao24, .. } => Some(*icao24),
            DownlinkFields::ExtendedSquitterNonTransponder {
                address: NonTransponderAddress::Icao24 { icao24, .. },
                ..
            } => Some(*icao24),
            DownlinkFields::MilitaryExtendedSquitter {
                application: MilitaryApplication::AdsB { icao24, .. },
                ..
            } => Some(*icao24),
            _ => None,
        }
    }

    /// The Mode A squawk, for the identity reply formats.
    pub fn squawk(&self) -> Option<u16> {
        match &self.fields {
            DownlinkFields::SurveillanceIdentityReply { identity, .. }
            | DownlinkFields::CommBIdentityReply { identity, .. } => Some(*identity),
            _ => None,
        }
    }

    /// The altitude code, for the altitude reply formats.
    pub fn altitude(&self) -> Option<&AltitudeCode> {
        match &self.fields {
            DownlinkFields::ShortAirToAirSurveillance { altitude, .. }
            | DownlinkFields::SurveillanceAltitudeReply { altitude, .. }
            | DownlinkFields::LongAirToAirSurveillance { altitude, .. }
            | DownlinkFields::CommBAltitudeReply { altitude, .. } => Some(altitude),
            _ => None,
        }
    }

    /// The callsign recovered from a Comm-B BDS 2,0 register, if any.
    pub fn possible_callsign(&self) -> Option<&str> {
        match &self.fields {
            DownlinkFields::CommBAltitudeReply {
                possible_callsign, ..
            }
            | DownlinkFields::CommBIdentityReply {
                possible_callsign, ..
            } => possible_callsign.as_deref(),
            _ => None,
        }
    }
}

fn flight_status_str(fs: u8) -> &'static str {
    match fs {
        0 => "Normal, Airborne",
        1 => "Normal, On the ground",
        2 => "ALERT, Airborne",
        3 => "ALERT, On the ground",
        4 => "ALERT & Special Position Identification",
        5 => "Special Position Identification",
        _ => "Unassigned",
    }
}

fn capability_str(ca: u8) -> &'static str {
    match ca {
        0 => "Level 1 (Surveillance Only)",
        4 => "Level 2+, on ground",
        5 => "Level 2+, airborne",
        6 => "Level 2+",
        7 => "CA=7",
        _ => "Reserved",
    }
}

fn write_altitude(f: &mut fmt::Formatter<'_>, altitude: &AltitudeCode) -> fmt::Result {
    if altitude.is_metric {
        writeln!(f, "  Altitude      : {} (metric, raw)", altitude.raw)
    } else {
        match altitude.feet {
            Some(feet) => writeln!(f, "  Altitude      : {} feet", feet),
            None => writeln!(f, "  Altitude      : invalid code {:#06x}", altitude.raw),
        }
    }
}

fn write_surveillance_common(
    f: &mut fmt::Formatter<'_>,
    fs: u8,
    dr: u8,
    um: u8,
) -> fmt::Result {
    writeln!(f, "  Flight Status : {}", flight_status_str(fs))?;
    writeln!(f, "  DR            : {}", dr)?;
    writeln!(f, "  UM            : {}", um)
}

fn write_hex_bytes(f: &mut fmt::Formatter<'_>, label: &str, bytes: &[u8]) -> fmt::Result {
    write!(f, "  {:<14}: ", label)?;
    for b in bytes {
        write!(f, "{:02X}", b)?;
    }
    writeln!(f)
}

impl fmt::Display for ModeSMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let df = self.downlink_format.number();
        if let Some(level) = self.signal_level {
            writeln!(f, "Signal level    : {}", level)?;
        }
        if self.is_mlat {
            writeln!(f, "Source          : MLAT")?;
        }
        match &self.fields {
            DownlinkFields::ShortAirToAirSurveillance {
                vertical_status,
                cross_link_capability,
                sensitivity_level,
                reply_information,
                altitude,
                address_parity,
            } => {
                writeln!(f, "DF 0: Short Air-Air Surveillance.")?;
                writeln!(f, "  VS            : {:?}", vertical_status)?;
                writeln!(f, "  Cross-link    : {}", cross_link_capability)?;
                writeln!(f, "  SL            : {}", sensitivity_level)?;
                writeln!(f, "  RI            : {}", reply_information)?;
                write_altitude(f, altitude)?;
                writeln!(f, "  AP            : {:06x}", address_parity)?;
            }
            DownlinkFields::SurveillanceAltitudeReply {
                flight_status,
                downlink_request,
                utility_message,
                altitude,
                parity_identifier,
            } => {
                writeln!(f, "DF 4: Surveillance, Altitude Reply.")?;
                write_surveillance_common(f, *flight_status, *downlink_request, *utility_message)?;
                write_altitude(f, altitude)?;
                writeln!(f, "  AP            : {:06x}", parity_identifier)?;
            }
            DownlinkFields::SurveillanceIdentityReply {
                flight_status,
                downlink_request,
                utility_message,
                identity,
                parity_identifier,
            } => {
                writeln!(f, "DF 5: Surveillance, Identity Reply.")?;
                write_surveillance_common(f, *flight_status, *downlink_request, *utility_message)?;
                writeln!(f, "  Squawk        : {:04}", identity)?;
                writeln!(f, "  AP            : {:06x}", parity_identifier)?;
            }
            DownlinkFields::AllCallReply {
                capability,
                icao24,
                parity_interrogator,
            } => {
                writeln!(f, "DF 11: All Call Reply.")?;
                writeln!(f, "  Capability    : {}", capability_str(*capability))?;
                writeln!(f, "  ICAO Address  : {:06x}", icao24)?;
                writeln!(f, "  PI            : {:06x}", parity_interrogator)?;
            }
            DownlinkFields::LongAirToAirSurveillance {
                vertical_status,
                sensitivity_level,
                reply_information,
                altitude,
                acas_message,
                parity_identifier,
            } => {
                writeln!(f, "DF 16: Long Air-Air Surveillance.")?;
                writeln!(f, "  VS            : {:?}", vertical_status)?;
                writeln!(f, "  SL            : {}", sensitivity_level)?;
                writeln!(f, "  RI            : {}", reply_information)?;
                write_altitude(f, altitude)?;
                write_hex_bytes(f, "MV", acas_message)?;
                writeln!(f, "  AP            : {:06x}", parity_identifier)?;
            }
            DownlinkFields::ExtendedSquitter {
                capability,
                icao24,
                message,
                parity_interrogator,
            } => {
                writeln!(f, "DF 17: Extended Squitter.")?;
                writeln!(
                    f,
                    "  Capability    : {} ({})",
                    capability,
                    capability_str(*capability)
                )?;
                writeln!(f, "  ICAO Address  : {:06x}", icao24)?;
                write_hex_bytes(f, "ME", message)?;
                writeln!(f, "  PI            : {:06x}", parity_interrogator)?;
            }
            DownlinkFields::ExtendedSquitterNonTransponder {
                control_field,
                address,
                parity_interrogator,
            } => {
                writeln!(f, "DF 18: Extended Squitter (Non-Transponder).")?;
                writeln!(f, "  Control Field : {}", control_field)?;
                match address {
                    NonTransponderAddress::Icao24 { icao24, message } => {
                        writeln!(f, "  ICAO Address  : {:06x}", icao24)?;
                        write_hex_bytes(f, "ME", message)?;
                    }
                    NonTransponderAddress::NonIcao { address, message } => {
                        writeln!(f, "  Address       : {:06x} (non-ICAO)", address)?;
                        write_hex_bytes(f, "ME", message)?;
                    }
                    NonTransponderAddress::Supplementary { message } => {
                        write_hex_bytes(f, "Supplementary", message)?;
                    }
                }
                writeln!(f, "  PI            : {:06x}", parity_interrogator)?;
            }
            DownlinkFields::MilitaryExtendedSquitter {
                application_field,
                application,
            } => {
                writeln!(f, "DF 19: Military Extended Squitter.")?;
                writeln!(f, "  AF            : {}", application_field)?;
                match application {
                    MilitaryApplication::AdsB {
                        icao24,
                        message,
                        parity_interrogator,
                    } => {
                        writeln!(f, "  ICAO Address  : {:06x}", icao24)?;
                        write_hex_bytes(f, "ME", message)?;
                        writeln!(f, "  PI            : {:06x}", parity_interrogator)?;
                    }
                    MilitaryApplication::Supplementary { message } => {
                        write_hex_bytes(f, "Supplementary", message)?;
                    }
                }
            }
            DownlinkFields::CommBAltitudeReply {
                flight_status,
                downlink_request,
                utility_message,
                altitude,
                comm_b_message,
                possible_callsign,
                parity_identifier,
            } => {
                writeln!(f, "DF 20: Comm-B, Altitude Reply.")?;
                write_surveillance_common(f, *flight_status, *downlink_request, *utility_message)?;
                write_altitude(f, altitude)?;
                write_hex_bytes(f, "MB", comm_b_message)?;
                if let Some(callsign) = possible_callsign {
                    writeln!(f, "  BDS 2,0 Ident : {}", callsign)?;
                }
                writeln!(f, "  AP            : {:06x}", parity_identifier)?;
            }
            DownlinkFields::CommBIdentityReply {
                flight_status,
                downlink_request,
                utility_message,
                identity,
                comm_b_message,
                possible_callsign,
                parity_identifier,
            } => {
                writeln!(f, "DF 21: Comm-B, Identity Reply.")?;
                write_surveillance_common(f, *flight_status, *downlink_request, *utility_message)?;
                writeln!(f, "  Squawk        : {:04}", identity)?;
                write_hex_bytes(f, "MB", comm_b_message)?;
                if let Some(callsign) = possible_callsign {
                    writeln!(f, "  BDS 2,0 Ident : {}", callsign)?;
                }
                writeln!(f, "  AP            : {:06x}", parity_identifier)?;
            }
            DownlinkFields::CommD {
                elm_control,
                d_segment_number,
                comm_d_message,
                parity_identifier,
            } => {
                writeln!(f, "DF 24: Comm-D (ELM).")?;
                writeln!(f, "  KE            : {}", elm_control)?;
                writeln!(f, "  ND            : {}", d_segment_number)?;
                write_hex_bytes(f, "MD", comm_d_message)?;
                writeln!(f, "  AP            : {:06x}", parity_identifier)?;
            }
            DownlinkFields::Unsupported => {
                writeln!(f, "DF {} (no field layout documented)", df)?;
            }
        }
        Ok(())
    }
}
