//! System configuration and hardware constants
//!
//! Compile-time constants for the FM receiver hardware, plus the runtime
//! [`TunerConfig`] the driver is constructed with.

use crate::hal::i2c::I2cAddress;
use crate::types::{Band, Frequency, SeekMode, Volume};

/// I2C bus frequency for the tuner and display
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// RDA5807M I2C address (register-indexed mode)
pub const TUNER_I2C_ADDR: u8 = 0x11;

/// SSD1306 OLED I2C address
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;

/// Display width in pixels
pub const DISPLAY_WIDTH: u32 = 128;

/// Display height in pixels
pub const DISPLAY_HEIGHT: u32 = 64;

/// Default startup frequency in 10 kHz units (101.1 MHz)
pub const DEFAULT_FREQUENCY: u16 = 10_110;

/// Default startup volume
pub const DEFAULT_VOLUME: i32 = 5;

/// Default band plan
pub const DEFAULT_BAND: Band = Band::UsEurope;

/// Maximum status polls while waiting for tune/seek completion
pub const POLL_ATTEMPTS: u8 = 20;

/// Delay between status polls in milliseconds
pub const POLL_INTERVAL_MS: u32 = 100;

/// Wait after starting a tune before polling, in milliseconds
pub const TUNE_SETTLE_MS: u32 = 100;

/// Wait after starting a seek before polling, in milliseconds
pub const SEEK_SETTLE_MS: u32 = 300;

/// Wait after each step of the reset sequence, in milliseconds
pub const RESET_DELAY_MS: u32 = 100;

/// How often the firmware checks for a new RDS group, in milliseconds
pub const RDS_POLL_INTERVAL_MS: u64 = 100;

/// Button debounce time in milliseconds
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// RDS programme service name length
pub const RDS_NAME_LEN: usize = 8;

/// RDS radio text length (version A groups)
pub const RDS_TEXT_LEN: usize = 64;

/// Expected high byte of the chip ID register
pub const RDA5807M_CHIP_ID: u8 = 0x58;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Status LED (directly on MCU)
    pub const LED_STATUS: &str = "PA5";

    /// I2C1 SCL (tuner)
    pub const I2C1_SCL: &str = "PB8";

    /// I2C1 SDA (tuner)
    pub const I2C1_SDA: &str = "PB9";

    /// I2C2 SCL (display)
    pub const I2C2_SCL: &str = "PA9";

    /// I2C2 SDA (display)
    pub const I2C2_SDA: &str = "PA8";

    /// Seek button (active low)
    pub const SEEK_BUTTON: &str = "PA2";

    /// Preset button (active low)
    pub const PRESET_BUTTON: &str = "PA3";
}

/// Runtime tuner configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TunerConfig {
    /// Bus address of the tuner
    pub address: I2cAddress,
    /// Band plan
    pub band: Band,
    /// Frequency tuned during initialization
    pub frequency: Frequency,
    /// Volume set during initialization
    pub volume: Volume,
    /// Band-edge behaviour while seeking
    pub seek_mode: SeekMode,
    /// Maximum completion polls per tune or seek
    pub poll_attempts: u8,
    /// Delay between completion polls
    pub poll_interval_ms: u32,
    /// Wait after starting a tune
    pub tune_settle_ms: u32,
    /// Wait after starting a seek
    pub seek_settle_ms: u32,
    /// Wait after each reset step
    pub reset_delay_ms: u32,
}

impl TunerConfig {
    /// Configuration built from the compile-time defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            address: I2cAddress::new(TUNER_I2C_ADDR),
            band: DEFAULT_BAND,
            frequency: Frequency::from_ten_khz(DEFAULT_FREQUENCY),
            volume: Volume::new(DEFAULT_VOLUME),
            seek_mode: SeekMode::StopAtBandEdge,
            poll_attempts: POLL_ATTEMPTS,
            poll_interval_ms: POLL_INTERVAL_MS,
            tune_settle_ms: TUNE_SETTLE_MS,
            seek_settle_ms: SEEK_SETTLE_MS,
            reset_delay_ms: RESET_DELAY_MS,
        }
    }

    /// Set the band plan
    #[must_use]
    pub const fn with_band(self, band: Band) -> Self {
        Self { band, ..self }
    }

    /// Set the startup frequency
    #[must_use]
    pub const fn with_frequency(self, frequency: Frequency) -> Self {
        Self { frequency, ..self }
    }

    /// Set the startup volume
    #[must_use]
    pub const fn with_volume(self, volume: Volume) -> Self {
        Self { volume, ..self }
    }

    /// Set the seek band-edge behaviour
    #[must_use]
    pub const fn with_seek_mode(self, seek_mode: SeekMode) -> Self {
        Self { seek_mode, ..self }
    }

    /// Set the completion polling budget
    #[must_use]
    pub const fn with_polling(self, attempts: u8, interval_ms: u32) -> Self {
        Self {
            poll_attempts: attempts,
            poll_interval_ms: interval_ms,
            ..self
        }
    }
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the default startup frequency
#[must_use]
pub const fn default_frequency() -> Frequency {
    DEFAULT_BAND.clamp(Frequency::from_ten_khz(DEFAULT_FREQUENCY))
}

/// A stored station
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preset {
    /// Station frequency
    pub frequency: Frequency,
    /// Label shown when the station sends no RDS name
    pub name: &'static str,
}

impl Preset {
    const fn new(ten_khz: u16, name: &'static str) -> Self {
        Self {
            frequency: Frequency::from_ten_khz(ten_khz),
            name,
        }
    }
}

/// Station presets, stepped through with the preset button
pub const PRESETS: [Preset; 9] = [
    Preset::new(8870, "KTCU"),
    Preset::new(9010, "KERA"),
    Preset::new(9170, "KKXT"),
    Preset::new(9250, "KZPS"),
    Preset::new(9710, "KEGL"),
    Preset::new(9870, "KLUV"),
    Preset::new(10_030, "KJKK"),
    Preset::new(10_210, "KDGE"),
    Preset::new(10_610, "KHKS"),
];

/// Index of the preset within one channel of `frequency`
#[must_use]
pub fn preset_at(frequency: Frequency) -> Option<usize> {
    PRESETS.iter().position(|p| {
        p.frequency.as_ten_khz().abs_diff(frequency.as_ten_khz()) < Band::SPACING
    })
}

/// Preset after the one at `frequency`, wrapping; the first if none matches
#[must_use]
pub fn next_preset(frequency: Frequency) -> usize {
    preset_at(frequency).map_or(0, |i| (i + 1) % PRESETS.len())
}
