//! Shared types used across the FM radio firmware
//!
//! Frequencies, band plans and volume levels. Out-of-range input is clamped
//! rather than rejected: volume on construction, frequencies against a band.

use core::fmt;

/// Broadcast frequency in units of 10 kHz
///
/// `Frequency::from_ten_khz(10110)` is 101.1 MHz. This is the unit the
/// tuner's channel arithmetic works in, so no conversions are needed on the
/// hot path. Range checks are band-dependent and live on [`Band`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u16);

impl Frequency {
    /// Create a frequency from 10 kHz units
    #[must_use]
    pub const fn from_ten_khz(units: u16) -> Self {
        Self(units)
    }

    /// Create a frequency from kHz (truncated to 10 kHz resolution)
    #[must_use]
    pub const fn from_khz(khz: u32) -> Self {
        let units = khz / 10;
        if units > u16::MAX as u32 {
            Self(u16::MAX)
        } else {
            Self(units as u16)
        }
    }

    /// Get the frequency in 10 kHz units
    #[must_use]
    pub const fn as_ten_khz(self) -> u16 {
        self.0
    }

    /// Get the frequency in kHz
    #[must_use]
    pub const fn as_khz(self) -> u32 {
        self.0 as u32 * 10
    }

    /// Get the frequency in MHz as floating point
    #[must_use]
    pub fn as_mhz_f32(self) -> f32 {
        f32::from(self.0) / 100.0
    }

    /// Whole MHz part (101 for 101.1 MHz)
    #[must_use]
    pub const fn mhz(self) -> u16 {
        self.0 / 100
    }

    /// First decimal of the MHz value (1 for 101.1 MHz)
    #[must_use]
    pub const fn tenths_mhz(self) -> u16 {
        (self.0 % 100) / 10
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({}.{:02} MHz)", self.0 / 100, self.0 % 100)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} MHz", self.mhz(), self.tenths_mhz())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}.{} MHz", self.mhz(), self.tenths_mhz());
    }
}

/// FM band plan supported by the tuner
///
/// All bands use the 100 kHz channel raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Band {
    /// 87-108 MHz (US/Europe)
    #[default]
    UsEurope,
    /// 76-91 MHz (Japan)
    Japan,
    /// 76-108 MHz (worldwide)
    World,
    /// 65-76 MHz (East Europe OIRT)
    EastEurope,
}

impl Band {
    /// Channel spacing in 10 kHz units (100 kHz raster)
    pub const SPACING: u16 = 10;

    /// Lowest frequency in the band
    #[must_use]
    pub const fn start(self) -> Frequency {
        match self {
            Self::UsEurope => Frequency(8700),
            Self::Japan | Self::World => Frequency(7600),
            Self::EastEurope => Frequency(6500),
        }
    }

    /// Highest frequency in the band
    #[must_use]
    pub const fn end(self) -> Frequency {
        match self {
            Self::UsEurope | Self::World => Frequency(10800),
            Self::Japan => Frequency(9100),
            Self::EastEurope => Frequency(7600),
        }
    }

    /// Check whether a frequency lies inside the band
    #[must_use]
    pub const fn contains(self, freq: Frequency) -> bool {
        freq.0 >= self.start().0 && freq.0 <= self.end().0
    }

    /// Clamp a frequency into the band
    #[must_use]
    pub const fn clamp(self, freq: Frequency) -> Frequency {
        if freq.0 < self.start().0 {
            self.start()
        } else if freq.0 > self.end().0 {
            self.end()
        } else {
            freq
        }
    }

    /// Channel index for a frequency, rounded to the nearest raster step
    ///
    /// Out-of-band frequencies are clamped first.
    #[must_use]
    pub const fn channel_for(self, freq: Frequency) -> u16 {
        let offset = self.clamp(freq).0 - self.start().0;
        (offset + Self::SPACING / 2) / Self::SPACING
    }

    /// Frequency of a channel index, clamped into the band
    #[must_use]
    pub const fn frequency_for(self, channel: u16) -> Frequency {
        let units = self.start().0 as u32 + channel as u32 * Self::SPACING as u32;
        if units > self.end().0 as u32 {
            self.end()
        } else {
            Frequency(units as u16)
        }
    }

    /// Nearest channel frequency, clamped into the band
    #[must_use]
    pub const fn snap(self, freq: Frequency) -> Frequency {
        self.frequency_for(self.channel_for(freq))
    }

    /// Number of channels in the band
    #[must_use]
    pub const fn channel_count(self) -> u16 {
        (self.end().0 - self.start().0) / Self::SPACING + 1
    }

    /// BAND field value for the tuning register
    #[must_use]
    pub const fn as_reg(self) -> u16 {
        match self {
            Self::UsEurope => 0b00,
            Self::Japan => 0b01,
            Self::World => 0b10,
            Self::EastEurope => 0b11,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Band {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::UsEurope => defmt::write!(f, "US/EU"),
            Self::Japan => defmt::write!(f, "JP"),
            Self::World => defmt::write!(f, "WORLD"),
            Self::EastEurope => defmt::write!(f, "OIRT"),
        }
    }
}

/// Audio volume level (0-15)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Volume(u8);

impl Volume {
    /// Silent
    pub const MIN: Self = Self(0);

    /// Loudest setting the chip supports
    pub const MAX: Self = Self(15);

    /// Create a volume from any level, clamped to 0-15
    #[must_use]
    pub const fn new(level: i32) -> Self {
        if level < 0 {
            Self::MIN
        } else if level > Self::MAX.0 as i32 {
            Self::MAX
        } else {
            Self(level as u8)
        }
    }

    /// Get the volume level
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// One step louder, saturating at the maximum
    #[must_use]
    pub const fn up(self) -> Self {
        Self::new(self.0 as i32 + 1)
    }

    /// One step quieter, saturating at zero
    #[must_use]
    pub const fn down(self) -> Self {
        Self::new(self.0 as i32 - 1)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_VOLUME)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Volume {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}/15", self.0);
    }
}

/// Seek direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekDirection {
    /// Towards higher frequencies
    Up,
    /// Towards lower frequencies
    Down,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SeekDirection {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Up => defmt::write!(f, "UP"),
            Self::Down => defmt::write!(f, "DOWN"),
        }
    }
}

/// What the hardware does when a seek reaches the end of the band
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SeekMode {
    /// Continue from the other band edge
    Wrap,
    /// Stop at the band edge
    #[default]
    StopAtBandEdge,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SeekMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Wrap => defmt::write!(f, "WRAP"),
            Self::StopAtBandEdge => defmt::write!(f, "STOP"),
        }
    }
}
