//! RDS Decoder
//!
//! Accumulates Radio Data System groups into the programme service name
//! (group 0) and radio text (group 2A) buffers.
//!
//! The two buffers treat unprintable bytes differently: the station name
//! keeps whatever was already decoded at that position, while radio text
//! writes a space there.

use crate::config::{RDS_NAME_LEN, RDS_TEXT_LEN};

/// Four 16-bit blocks of one RDS group
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RdsGroup {
    /// Block A (programme identification)
    pub a: u16,
    /// Block B (group type, version, segment address)
    pub b: u16,
    /// Block C
    pub c: u16,
    /// Block D
    pub d: u16,
}

impl RdsGroup {
    /// Build a group from its four blocks
    #[must_use]
    pub const fn new(a: u16, b: u16, c: u16, d: u16) -> Self {
        Self { a, b, c, d }
    }

    /// Group type code (0-15)
    #[must_use]
    pub const fn group_type(&self) -> u8 {
        ((self.b >> 12) & 0x0F) as u8
    }

    /// Version B group (version A otherwise)
    #[must_use]
    pub const fn version_b(&self) -> bool {
        (self.b >> 11) & 0x01 == 1
    }

    /// Programme type code (0-31)
    #[must_use]
    pub const fn program_type(&self) -> u8 {
        ((self.b >> 5) & 0x1F) as u8
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RdsGroup {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "RDS({:04X} {:04X} {:04X} {:04X})",
            self.a,
            self.b,
            self.c,
            self.d
        );
    }
}

/// What a processed group changed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RdsUpdate {
    /// Two station-name characters at this segment (0-3)
    StationName(u8),
    /// Four radio-text characters at this segment (0-15)
    RadioText(u8),
    /// Group carried nothing this decoder accumulates
    Other,
}

/// RDS accumulator with an optional radio-text callback
pub struct RdsDecoder<F = fn(&str)> {
    station_name: [u8; RDS_NAME_LEN],
    radio_text: [u8; RDS_TEXT_LEN],
    program_id: Option<u16>,
    program_type: Option<u8>,
    on_text: Option<F>,
}

impl RdsDecoder {
    /// Create a decoder with blank buffers and no callback
    #[must_use]
    pub const fn new() -> Self {
        Self {
            station_name: [b' '; RDS_NAME_LEN],
            radio_text: [b' '; RDS_TEXT_LEN],
            program_id: None,
            program_type: None,
            on_text: None,
        }
    }
}

impl Default for RdsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FnMut(&str)> RdsDecoder<F> {
    /// Attach a callback invoked with the radio text after each update
    ///
    /// Keeps whatever has been accumulated so far.
    #[must_use]
    pub fn with_text_callback<G: FnMut(&str)>(self, callback: G) -> RdsDecoder<G> {
        RdsDecoder {
            station_name: self.station_name,
            radio_text: self.radio_text,
            program_id: self.program_id,
            program_type: self.program_type,
            on_text: Some(callback),
        }
    }

    /// Feed one group into the accumulator
    pub fn process(&mut self, group: RdsGroup) -> RdsUpdate {
        self.program_id = Some(group.a);
        self.program_type = Some(group.program_type());

        match (group.group_type(), group.version_b()) {
            (0, _) => {
                let segment = (group.b & 0x03) as u8;
                let pos = usize::from(segment) * 2;
                let [hi, lo] = group.d.to_be_bytes();
                for (offset, byte) in [hi, lo].into_iter().enumerate() {
                    if is_printable(byte) {
                        self.station_name[pos + offset] = byte;
                    }
                }
                RdsUpdate::StationName(segment)
            }
            (2, false) => {
                let segment = (group.b & 0x0F) as u8;
                let pos = usize::from(segment) * 4;
                let [c_hi, c_lo] = group.c.to_be_bytes();
                let [d_hi, d_lo] = group.d.to_be_bytes();
                for (offset, byte) in [c_hi, c_lo, d_hi, d_lo].into_iter().enumerate() {
                    self.radio_text[pos + offset] = if is_printable(byte) { byte } else { b' ' };
                }

                let text = trimmed(&self.radio_text);
                if let Some(callback) = self.on_text.as_mut() {
                    if !text.is_empty() {
                        callback(text);
                    }
                }
                RdsUpdate::RadioText(segment)
            }
            // 2B carries a 32-character text in block D only; not decoded
            _ => RdsUpdate::Other,
        }
    }

    /// Station name with padding removed
    #[must_use]
    pub fn station_name(&self) -> &str {
        trimmed(&self.station_name)
    }

    /// Radio text with padding removed
    #[must_use]
    pub fn radio_text(&self) -> &str {
        trimmed(&self.radio_text)
    }

    /// Programme identification code from the last group
    #[must_use]
    pub const fn program_id(&self) -> Option<u16> {
        self.program_id
    }

    /// Programme type code from the last group
    #[must_use]
    pub const fn program_type(&self) -> Option<u8> {
        self.program_type
    }

    /// Blank both buffers, e.g. after retuning to another station
    pub fn clear(&mut self) {
        self.station_name.fill(b' ');
        self.radio_text.fill(b' ');
        self.program_id = None;
        self.program_type = None;
    }
}

const fn is_printable(byte: u8) -> bool {
    byte >= 32 && byte <= 126
}

/// Buffers only ever hold printable ASCII, so they are always valid UTF-8
fn trimmed(buf: &[u8]) -> &str {
    core::str::from_utf8(buf).unwrap_or("").trim()
}
