//! modes1090: a Mode S downlink format decoder
//!
//! Decodes raw 56/112-bit Mode S reply frames into structured messages,
//! demultiplexing the eleven documented downlink formats, stripping the
//! CRC-24 parity overlay, and decoding Mode A squawks and Gillham/binary
//! altitude codes. The decoder owns no wire protocol itself; an upstream
//! feed layer (see [`feed`]) removes the framing and hands it bare bytes.

pub mod altitude;
pub mod bits;
pub mod charset;
pub mod crc;
pub mod feed;
pub mod message;
pub mod squawk;
pub mod stats;
pub mod translator;

pub use altitude::{AltitudeCode, AltitudeConversion, StandardAltitude};
pub use bits::BitStream;
pub use message::{DownlinkFields, DownlinkFormat, ModeSMessage};
pub use stats::{ReceiverStatistics, StatisticsSnapshot};
pub use translator::{ModeSTranslator, TranslateError};
