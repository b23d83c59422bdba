//! Radio State
//!
//! The controller's view of the receiver settings. The configuration
//! register's control bits cannot be read back from the chip, so this copy
//! is the authoritative one; every write to that register is rebuilt from it.
//! Transitions are immutable and return a new state.

use crate::drivers::rda5807m::registers::config;
use crate::types::{Band, Frequency, Volume};

/// Complete receiver state (immutable)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadioState {
    /// Tuned frequency, always a channel of `band`
    frequency: Frequency,
    /// Audio volume
    volume: Volume,
    /// Audio muted
    mute: bool,
    /// Forced mono
    mono: bool,
    /// Bass boost enabled
    bass_boost: bool,
    /// Band plan
    band: Band,
}

impl RadioState {
    /// Create a new state, snapping the frequency to a channel of the band
    #[must_use]
    pub const fn new(band: Band, frequency: Frequency, volume: Volume) -> Self {
        Self {
            frequency: band.snap(frequency),
            volume,
            mute: false,
            mono: false,
            bass_boost: false,
            band,
        }
    }

    /// Get tuned frequency
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Get volume
    #[must_use]
    pub const fn volume(&self) -> Volume {
        self.volume
    }

    /// Check if muted
    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.mute
    }

    /// Check if mono is forced
    #[must_use]
    pub const fn is_mono(&self) -> bool {
        self.mono
    }

    /// Check if bass boost is on
    #[must_use]
    pub const fn bass_boost(&self) -> bool {
        self.bass_boost
    }

    /// Get band plan
    #[must_use]
    pub const fn band(&self) -> Band {
        self.band
    }

    /// Channel index of the tuned frequency
    #[must_use]
    pub const fn channel(&self) -> u16 {
        self.band.channel_for(self.frequency)
    }

    /// Set frequency, snapped to the nearest channel (returns new state)
    #[must_use]
    pub const fn with_frequency(self, frequency: Frequency) -> Self {
        Self {
            frequency: self.band.snap(frequency),
            ..self
        }
    }

    /// Change band, re-clamping the frequency (returns new state)
    #[must_use]
    pub const fn with_band(self, band: Band) -> Self {
        Self {
            band,
            frequency: band.snap(self.frequency),
            ..self
        }
    }

    /// Set volume (returns new state)
    #[must_use]
    pub const fn with_volume(self, volume: Volume) -> Self {
        Self { volume, ..self }
    }

    /// Set mute (returns new state)
    #[must_use]
    pub const fn with_mute(self, mute: bool) -> Self {
        Self { mute, ..self }
    }

    /// Set forced mono (returns new state)
    #[must_use]
    pub const fn with_mono(self, mono: bool) -> Self {
        Self { mono, ..self }
    }

    /// Set bass boost (returns new state)
    #[must_use]
    pub const fn with_bass_boost(self, bass_boost: bool) -> Self {
        Self { bass_boost, ..self }
    }

    /// Configuration register value for these settings
    ///
    /// Output enabled, RDS on, chip enabled; seek and reset bits clear.
    #[must_use]
    pub const fn config_word(&self) -> u16 {
        let mut word = config::DHIZ | config::RDS_EN | config::NEW_METHOD | config::ENABLE;
        if !self.mute {
            word |= config::DMUTE;
        }
        if self.mono {
            word |= config::MONO;
        }
        if self.bass_boost {
            word |= config::BASS;
        }
        word
    }
}

impl Default for RadioState {
    fn default() -> Self {
        Self::new(
            Band::UsEurope,
            Frequency::from_ten_khz(crate::config::DEFAULT_FREQUENCY),
            Volume::new(crate::config::DEFAULT_VOLUME),
        )
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Radio({}, {}, vol {}, mute={}, mono={}, bass={})",
            self.frequency,
            self.band,
            self.volume,
            self.mute,
            self.mono,
            self.bass_boost
        );
    }
}
