//! RDA5807M register map
//!
//! Bit layout of the 16-bit registers the driver touches, plus pure
//! encode/decode helpers so the layout can be checked without a bus.

use crate::radio::rds::RdsGroup;
use crate::types::{Band, Volume};

/// Register addresses
pub mod reg {
    /// Chip identification
    pub const CHIP_ID: u8 = 0x00;
    /// Power, audio and seek control
    pub const CONFIG: u8 = 0x02;
    /// Channel, band and tune start
    pub const TUNING: u8 = 0x03;
    /// GPIO and de-emphasis
    pub const GPIO: u8 = 0x04;
    /// Volume and seek threshold
    pub const VOLUME: u8 = 0x05;
    /// I2S output setup
    pub const I2S: u8 = 0x06;
    /// Stereo blend and band-3 range
    pub const BLEND: u8 = 0x07;
    /// Tune/seek/RDS status and current channel
    pub const STATUS: u8 = 0x0A;
    /// Signal strength
    pub const RSSI: u8 = 0x0B;
    /// RDS block A
    pub const RDS_A: u8 = 0x0C;
    /// RDS block B
    pub const RDS_B: u8 = 0x0D;
    /// RDS block C
    pub const RDS_C: u8 = 0x0E;
    /// RDS block D
    pub const RDS_D: u8 = 0x0F;
}

/// Configuration register (0x02) bits
pub mod config {
    /// Audio output enabled (high-Z off)
    pub const DHIZ: u16 = 1 << 15;
    /// Mute disable; clear to mute
    pub const DMUTE: u16 = 1 << 14;
    /// Force mono
    pub const MONO: u16 = 1 << 13;
    /// Bass boost
    pub const BASS: u16 = 1 << 12;
    /// Seek towards higher frequencies
    pub const SEEKUP: u16 = 1 << 9;
    /// Start seek
    pub const SEEK: u16 = 1 << 8;
    /// Stop seeking at the band edge instead of wrapping
    pub const SKMODE: u16 = 1 << 7;
    /// Reference clock mode, 000 = 32.768 kHz
    pub const CLK_MODE_MASK: u16 = 0b111 << 4;
    /// RDS/RBDS enable
    pub const RDS_EN: u16 = 1 << 3;
    /// Improved demodulation method
    pub const NEW_METHOD: u16 = 1 << 2;
    /// Soft reset
    pub const SOFT_RESET: u16 = 1 << 1;
    /// Power up
    pub const ENABLE: u16 = 1 << 0;
}

/// Tuning register (0x03) fields
pub mod tuning {
    /// Channel index shift
    pub const CHAN_SHIFT: u16 = 6;
    /// Channel index mask (10 bits, before shifting)
    pub const CHAN_MASK: u16 = 0x03FF;
    /// Start tuning
    pub const TUNE: u16 = 1 << 4;
    /// Band select shift
    pub const BAND_SHIFT: u16 = 2;
    /// 100 kHz channel spacing
    pub const SPACE_100K: u16 = 0b00;
}

/// Volume register (0x05) fields
pub mod volume {
    /// Interpolation mode, seek threshold and LNA settings left at defaults
    pub const FIXED: u16 = 0x84D0;
    /// Volume field mask
    pub const MASK: u16 = 0x000F;
}

/// Status register (0x0A) bits
pub mod status {
    /// New RDS group ready
    pub const RDSR: u16 = 1 << 15;
    /// Seek/tune complete
    pub const STC: u16 = 1 << 14;
    /// Seek failed
    pub const SF: u16 = 1 << 13;
    /// Stereo indicator
    pub const ST: u16 = 1 << 10;
    /// Current channel
    pub const READCHAN_MASK: u16 = 0x03FF;
}

/// RSSI register (0x0B) fields
pub mod rssi {
    /// Signal strength shift
    pub const SHIFT: u16 = 9;
    /// Signal strength mask (7 bits, after shifting)
    pub const MASK: u16 = 0x7F;
}

/// Tuning register value for a channel
#[must_use]
pub const fn tuning_word(channel: u16, band: Band, tune: bool) -> u16 {
    let mut word = ((channel & tuning::CHAN_MASK) << tuning::CHAN_SHIFT)
        | (band.as_reg() << tuning::BAND_SHIFT)
        | tuning::SPACE_100K;
    if tune {
        word |= tuning::TUNE;
    }
    word
}

/// Volume register value
#[must_use]
pub const fn volume_word(volume: Volume) -> u16 {
    volume::FIXED | (volume.level() as u16 & volume::MASK)
}

/// Decoded status and signal strength registers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    /// A new RDS group is waiting in 0x0C..=0x0F
    pub rds_ready: bool,
    /// The last tune or seek has finished
    pub tune_complete: bool,
    /// The last seek found nothing
    pub seek_failed: bool,
    /// Receiving in stereo
    pub stereo: bool,
    /// Channel the chip is tuned to
    pub channel: u16,
    /// Received signal strength (0-127)
    pub rssi: u8,
}

impl Status {
    /// Decode registers 0x0A and 0x0B
    #[must_use]
    pub const fn from_registers(status_word: u16, rssi_word: u16) -> Self {
        Self {
            rds_ready: status_word & status::RDSR != 0,
            tune_complete: status_word & status::STC != 0,
            seek_failed: status_word & status::SF != 0,
            stereo: status_word & status::ST != 0,
            channel: status_word & status::READCHAN_MASK,
            rssi: ((rssi_word >> rssi::SHIFT) & rssi::MASK) as u8,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Status(chan {}, rssi {}, stc={}, sf={}, st={}, rds={})",
            self.channel,
            self.rssi,
            self.tune_complete,
            self.seek_failed,
            self.stereo,
            self.rds_ready
        );
    }
}

/// Decode the six registers 0x0A..=0x0F into an RDS group, if one is ready
#[must_use]
pub const fn rds_group(words: &[u16; 6]) -> Option<RdsGroup> {
    if words[0] & status::RDSR == 0 {
        return None;
    }
    Some(RdsGroup::new(words[2], words[3], words[4], words[5]))
}

/// Shadow of the configuration space 0x02..=0x0F
///
/// Holds what was last written to the writable registers (0x02..=0x07).
/// Status and RDS registers reflect live chip state and are never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterImage {
    values: [u16; Self::LEN],
    written: [bool; Self::LEN],
}

impl RegisterImage {
    /// First mirrored register
    pub const FIRST: u8 = reg::CONFIG;

    /// Last writable register
    pub const LAST_WRITABLE: u8 = reg::BLEND;

    const LEN: usize = (reg::RDS_D - reg::CONFIG + 1) as usize;

    /// Create an empty image
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: [0; Self::LEN],
            written: [false; Self::LEN],
        }
    }

    /// Remember a value written to a configuration register
    ///
    /// Read-only registers are ignored.
    pub fn record(&mut self, register: u8, value: u16) {
        if let Some(idx) = Self::writable_index(register) {
            self.values[idx] = value;
            self.written[idx] = true;
        }
    }

    /// Last value written to a register, if any
    #[must_use]
    pub fn get(&self, register: u8) -> Option<u16> {
        let idx = Self::writable_index(register)?;
        self.written[idx].then_some(self.values[idx])
    }

    /// Forget everything, e.g. after a soft reset
    pub fn clear(&mut self) {
        self.values.fill(0);
        self.written.fill(false);
    }

    fn writable_index(register: u8) -> Option<usize> {
        (Self::FIRST..=Self::LAST_WRITABLE)
            .contains(&register)
            .then(|| usize::from(register - Self::FIRST))
    }
}

impl Default for RegisterImage {
    fn default() -> Self {
        Self::new()
    }
}
