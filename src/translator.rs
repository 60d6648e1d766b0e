//! Mode S downlink format translator
//!
//! The root decode entry point. A frame is demultiplexed on its 5-bit
//! downlink format field and handed to the matching field extractor; the
//! extractors walk the frame with a shared sequential bit cursor, so the
//! read order in each one mirrors the wire layout exactly.
//!
//! One translator instance belongs to one decode thread or pipeline stage;
//! all instances feeding a receiver share a single [`ReceiverStatistics`].

use std::sync::Arc;

use thiserror::Error;

use crate::altitude::{AltitudeCode, AltitudeConversion, StandardAltitude};
use crate::bits::BitStream;
use crate::charset::extract_callsign;
use crate::message::{
    DownlinkFields, DownlinkFormat, MilitaryApplication, ModeSMessage, NonTransponderAddress,
    VerticalStatus,
};
use crate::squawk::decode_id13;
use crate::stats::ReceiverStatistics;

/// Errors that indicate a wiring bug in the host, never a data problem.
/// Malformed or truncated frames decode to `Ok(None)` or a partially
/// populated message instead.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// [`ModeSTranslator::set_statistics`] was never called. Decoding
    /// without a statistics sink would silently corrupt the counters the
    /// receiver reports, so this fails fast.
    #[error("receiver statistics must be attached before translating frames")]
    StatisticsNotAttached,
}

/// Decodes raw Mode S frames into [`ModeSMessage`] records.
pub struct ModeSTranslator {
    statistics: Option<Arc<ReceiverStatistics>>,
    altitude: Box<dyn AltitudeConversion + Send + Sync>,
}

impl Default for ModeSTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeSTranslator {
    /// A translator using the standard ICAO altitude conversions.
    pub fn new() -> Self {
        Self {
            statistics: None,
            altitude: Box::new(StandardAltitude),
        }
    }

    /// A translator with injected altitude conversions, for tests and
    /// non-standard tables.
    pub fn with_altitude_conversion(
        altitude: Box<dyn AltitudeConversion + Send + Sync>,
    ) -> Self {
        Self {
            statistics: None,
            altitude,
        }
    }

    /// Attach the shared statistics sink. Must happen before the first
    /// [`translate`](Self::translate) call.
    pub fn set_statistics(&mut self, statistics: Arc<ReceiverStatistics>) {
        self.statistics = Some(statistics);
    }

    /// Decode the frame beginning at byte `start` of `raw`.
    ///
    /// Returns `Ok(None)` for frames too short to decode: fewer than seven
    /// bytes, or fewer than fourteen for a long-frame format. Truncated
    /// captures are a routine consequence of live RF feeds, so they are
    /// dropped silently and do not touch the statistics. `signal_level` and
    /// `is_mlat` are pass-through values from the feed layer.
    ///
    /// # Panics
    /// Panics if `start` points past the end of `raw` in a way the length
    /// guard cannot catch; that is a caller contract violation.
    pub fn translate(
        &mut self,
        raw: &[u8],
        start: usize,
        signal_level: Option<i32>,
        is_mlat: bool,
    ) -> Result<Option<ModeSMessage>, TranslateError> {
        let statistics = self
            .statistics
            .as_ref()
            .ok_or(TranslateError::StatisticsNotAttached)?;

        let message_length = raw.len().saturating_sub(start);
        if message_length <= 6 {
            return Ok(None);
        }

        let mut bits = BitStream::new(raw);
        bits.skip((start * 8) as isize);

        let mut df_number = bits.read_u8(5);
        if df_number >= 24 {
            // DF24 uses only the first two bits as format code; the other
            // three belong to the next field, so give them back.
            df_number = 24;
            bits.skip(-3);
        }

        let downlink_format = DownlinkFormat::from_number(df_number);
        let long_frame = downlink_format.is_long_frame();
        if long_frame && message_length <= 13 {
            return Ok(None);
        }

        let fields = match downlink_format {
            DownlinkFormat::ShortAirToAirSurveillance => {
                self.extract_short_air_to_air(&mut bits)
            }
            DownlinkFormat::SurveillanceAltitudeReply => {
                self.extract_surveillance_altitude(&mut bits)
            }
            DownlinkFormat::SurveillanceIdentityReply => {
                self.extract_surveillance_identity(&mut bits)
            }
            DownlinkFormat::AllCallReply => self.extract_all_call(&mut bits),
            DownlinkFormat::LongAirToAirSurveillance => {
                self.extract_long_air_to_air(&mut bits)
            }
            DownlinkFormat::ExtendedSquitter => self.extract_extended_squitter(&mut bits),
            DownlinkFormat::ExtendedSquitterNonTransponder => {
                self.extract_non_transponder(&mut bits)
            }
            DownlinkFormat::MilitaryExtendedSquitter => self.extract_military(&mut bits),
            DownlinkFormat::CommBAltitudeReply => self.extract_comm_b_altitude(&mut bits),
            DownlinkFormat::CommBIdentityReply => self.extract_comm_b_identity(&mut bits),
            DownlinkFormat::CommD => self.extract_comm_d(&mut bits),
            // No layout documented; keep the common fields and move on.
            DownlinkFormat::Unassigned(_) => DownlinkFields::Unsupported,
        };

        statistics.record_message(df_number, long_frame);

        Ok(Some(ModeSMessage {
            downlink_format,
            signal_level,
            is_mlat,
            fields,
        }))
    }

    fn read_altitude(&self, bits: &mut BitStream<'_>) -> AltitudeCode {
        AltitudeCode::decode(bits.read_u16(13), &*self.altitude)
    }

    fn extract_short_air_to_air(&self, bits: &mut BitStream<'_>) -> DownlinkFields {
        let vertical_status = VerticalStatus::from_bit(bits.read_bit());
        let cross_link_capability = bits.read_bit();
        bits.skip(1);
        let sensitivity_level = bits.read_u8(3);
        bits.skip(2);
        let reply_information = bits.read_u8(4);
        bits.skip(2);
        let altitude = self.read_altitude(bits);
        let address_parity = bits.read_u32(24);
        DownlinkFields::ShortAirToAirSurveillance {
            vertical_status,
            cross_link_capability,
            sensitivity_level,
            reply_information,
            altitude,
            address_parity,
        }
    }

    fn extract_surveillance_altitude(&self, bits: &mut BitStream<'_>) -> DownlinkFields {
        let flight_status = bits.read_u8(3);
        let downlink_request = bits.read_u8(5);
        let utility_message = bits.read_u8(6);
        let altitude = self.read_altitude(bits);
        let parity_identifier = bits.read_u32(24);
        DownlinkFields::SurveillanceAltitudeReply {
            flight_status,
            downlink_request,
            utility_message,
            altitude,
            parity_identifier,
        }
    }

    fn extract_surveillance_identity(&self, bits: &mut BitStream<'_>) -> DownlinkFields {
        let flight_status = bits.read_u8(3);
        let downlink_request = bits.read_u8(5);
        let utility_message = bits.read_u8(6);
        let identity = decode_id13(bits.read_u16(13));
        let parity_identifier = bits.read_u32(24);
        DownlinkFields::SurveillanceIdentityReply {
            flight_status,
            downlink_request,
            utility_message,
            identity,
            parity_identifier,
        }
    }

    fn extract_all_call(&self, bits: &mut BitStream<'_>) -> DownlinkFields {
        let capability = bits.read_u8(3);
        let icao24 = bits.read_u32(24);
        let parity_interrogator = bits.read_u32(24);
        DownlinkFields::AllCallReply {
            capability,
            icao24,
            parity_interrogator,
        }
    }

    fn extract_long_air_to_air(&self, bits: &mut BitStream<'_>) -> DownlinkFields {
        let vertical_status = VerticalStatus::from_bit(bits.read_bit());
        bits.skip(2);
        let sensitivity_level = bits.read_u8(3);
        bits.skip(2);
        let reply_information = bits.read_u8(4);
        bits.skip(2);
        let altitude = self.read_altitude(bits);
        let acas_message = bits.read_bytes::<7>();
        let parity_identifier = bits.read_u32(24);
        DownlinkFields::LongAirToAirSurveillance {
            vertical_status,
            sensitivity_level,
            reply_information,
            altitude,
            acas_message,
            parity_identifier,
        }
    }

    fn extract_extended_squitter(&self, bits: &mut BitStream<'_>) -> DownlinkFields {
        let capability = bits.read_u8(3);
        let icao24 = bits.read_u32(24);
        let message = bits.read_bytes::<7>();
        let parity_interrogator = bits.read_u32(24);
        DownlinkFields::ExtendedSquitter {
            capability,
            icao24,
            message,
            parity_interrogator,
        }
    }

    fn extract_non_transponder(&self, bits: &mut BitStream<'_>) -> DownlinkFields {
        let control_field = bits.read_u8(3);
        let address = match control_field {
            // ADS-B device with a real ICAO address, and ADS-R rebroadcasts.
            0 | 6 => NonTransponderAddress::Icao24 {
                icao24: bits.read_u32(24),
                message: bits.read_bytes::<7>(),
            },
            // Anonymous ADS-B and TIS-B track files.
            1 | 2 | 3 => NonTransponderAddress::NonIcao {
                address: bits.read_u32(24),
                message: bits.read_bytes::<7>(),
            },
            _ => NonTransponderAddress::Supplementary {
                message: bits.read_bytes::<10>(),
            },
        };
        let parity_interrogator = bits.read_u32(24);
        DownlinkFields::ExtendedSquitterNonTransponder {
            control_field,
            address,
            parity_interrogator,
        }
    }

    fn extract_military(&self, bits: &mut BitStream<'_>) -> DownlinkFields {
        let application_field = bits.read_u8(3);
        let application = if application_field == 0 {
            MilitaryApplication::AdsB {
                icao24: bits.read_u32(24),
                message: bits.read_bytes::<7>(),
                parity_interrogator: bits.read_u32(24),
            }
        } else {
            MilitaryApplication::Supplementary {
                message: bits.read_bytes::<13>(),
            }
        };
        DownlinkFields::MilitaryExtendedSquitter {
            application_field,
            application,
        }
    }

    /// Read a 7-byte Comm-B payload and, when the leading byte is the
    /// BDS 2,0 register code, rewind over the payload to recover the
    /// 8-character aircraft identification it carries.
    fn read_comm_b(&self, bits: &mut BitStream<'_>) -> ([u8; 7], Option<String>) {
        let message = bits.read_bytes::<7>();
        let possible_callsign = if message[0] == 0x20 {
            bits.skip(-48);
            Some(extract_callsign(bits))
        } else {
            None
        };
        (message, possible_callsign)
    }

    fn extract_comm_b_altitude(&self, bits: &mut BitStream<'_>) -> DownlinkFields {
        let flight_status = bits.read_u8(3);
        let downlink_request = bits.read_u8(5);
        let utility_message = bits.read_u8(6);
        let altitude = self.read_altitude(bits);
        let (comm_b_message, possible_callsign) = self.read_comm_b(bits);
        let parity_identifier = bits.read_u32(24);
        DownlinkFields::CommBAltitudeReply {
            flight_status,
            downlink_request,
            utility_message,
            altitude,
            comm_b_message,
            possible_callsign,
            parity_identifier,
        }
    }

    fn extract_comm_b_identity(&self, bits: &mut BitStream<'_>) -> DownlinkFields {
        let flight_status = bits.read_u8(3);
        let downlink_request = bits.read_u8(5);
        let utility_message = bits.read_u8(6);
        let identity = decode_id13(bits.read_u16(13));
        let (comm_b_message, possible_callsign) = self.read_comm_b(bits);
        let parity_identifier = bits.read_u32(24);
        DownlinkFields::CommBIdentityReply {
            flight_status,
            downlink_request,
            utility_message,
            identity,
            comm_b_message,
            possible_callsign,
            parity_identifier,
        }
    }

    fn extract_comm_d(&self, bits: &mut BitStream<'_>) -> DownlinkFields {
        bits.skip(1);
        let elm_control = bits.read_bit();
        let d_segment_number = bits.read_u8(4);
        let comm_d_message = bits.read_bytes::<10>();
        let parity_identifier = bits.read_u32(24);
        DownlinkFields::CommD {
            elm_control,
            d_segment_number,
            comm_d_message,
            parity_identifier,
        }
    }
}
