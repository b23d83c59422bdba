//! RDA5807M FM Tuner Driver
//!
//! Single-chip FM broadcast receiver with RDS, controlled over I2C in
//! register-indexed mode.
//!
//! Tuning and seeking are synchronous: each call writes the command,
//! polls the seek/tune-complete flag for a bounded number of attempts, and
//! returns. Running out of attempts is not an error; the chip finishes on
//! its own, so the driver logs it and returns the best frequency it has.
//!
//! The cached [`RadioState`] only changes once the matching register write
//! has gone through.

pub mod registers;

use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use self::registers::{config, reg, RegisterImage, Status};
use crate::config::{TunerConfig, PRESETS};
use crate::error::{Error, Result};
use crate::hal::i2c::RegisterBus;
use crate::radio::rds::{RdsDecoder, RdsGroup};
use crate::radio::state::RadioState;
use crate::types::{Band, Frequency, SeekDirection, SeekMode, Volume};

/// RDA5807M driver
pub struct Rda5807m<I2C, D, M: RawMutex = NoopRawMutex> {
    bus: RegisterBus<I2C, M>,
    delay: D,
    config: TunerConfig,
    state: RadioState,
    image: RegisterImage,
}

impl<I2C, D, M> Rda5807m<I2C, D, M>
where
    I2C: I2c,
    D: DelayNs,
    M: RawMutex,
{
    /// Probe for the chip, reset it and apply the configured settings
    ///
    /// Fails with `DeviceAbsent` if nothing answers at the configured address.
    pub fn new(i2c: I2C, delay: D, config: TunerConfig) -> Result<Self> {
        let bus = RegisterBus::new(i2c, config.address);
        bus.probe()?;

        let mut radio = Self {
            bus,
            delay,
            config,
            state: RadioState::new(config.band, config.frequency, config.volume),
            image: RegisterImage::new(),
        };
        radio.soft_reset()?;

        info!("RDA5807M ready at {}", radio.state.frequency());
        Ok(radio)
    }

    /// Reset the chip and re-apply frequency and volume from the cached state
    pub fn soft_reset(&mut self) -> Result<()> {
        self.image.clear();

        let word = self.state.config_word();
        self.write(reg::CONFIG, word | config::SOFT_RESET)?;
        self.delay.delay_ms(self.config.reset_delay_ms);
        self.write(reg::CONFIG, word)?;
        self.delay.delay_ms(self.config.reset_delay_ms);

        self.set_frequency(self.state.frequency())?;
        self.set_volume(i32::from(self.state.volume().level()))?;
        Ok(())
    }

    /// Read the chip identification register
    pub fn chip_id(&mut self) -> Result<u16> {
        self.bus.read_register(reg::CHIP_ID)
    }

    /// Current cached settings
    #[must_use]
    pub const fn state(&self) -> RadioState {
        self.state
    }

    /// Configuration the driver was built with
    #[must_use]
    pub const fn config(&self) -> &TunerConfig {
        &self.config
    }

    /// What was last written to each configuration register
    #[must_use]
    pub const fn register_image(&self) -> &RegisterImage {
        &self.image
    }

    /// Tune to a frequency, clamped into the band and snapped to a channel
    ///
    /// Returns the frequency actually requested from the chip. If the
    /// complete flag never shows up within the polling budget the same
    /// frequency is returned.
    pub fn set_frequency(&mut self, frequency: Frequency) -> Result<Frequency> {
        self.tune(self.state.with_frequency(frequency))
    }

    /// Tune to an entry of the preset table
    ///
    /// Fails with `InvalidParameter` if `index` is past the end of the table.
    pub fn tune_preset(&mut self, index: usize) -> Result<Frequency> {
        let preset = PRESETS.get(index).ok_or(Error::InvalidParameter)?;
        info!("preset {}: {}", index, preset.name);
        self.set_frequency(preset.frequency)
    }

    /// Frequency the chip reports it is tuned to
    pub fn tuned_frequency(&mut self) -> Result<Frequency> {
        let status = self.status()?;
        Ok(self.state.band().frequency_for(status.channel))
    }

    /// Switch band plan and re-tune
    ///
    /// The cached frequency is clamped into the new band first.
    pub fn set_band(&mut self, band: Band) -> Result<Frequency> {
        self.tune(self.state.with_band(band))
    }

    /// Set volume, clamped to 0-15
    pub fn set_volume(&mut self, level: i32) -> Result<Volume> {
        let volume = Volume::new(level);
        self.write(reg::VOLUME, registers::volume_word(volume))?;
        self.state = self.state.with_volume(volume);
        Ok(volume)
    }

    /// One step louder
    pub fn volume_up(&mut self) -> Result<Volume> {
        let level = self.state.volume().up().level();
        self.set_volume(i32::from(level))
    }

    /// One step quieter
    pub fn volume_down(&mut self) -> Result<Volume> {
        let level = self.state.volume().down().level();
        self.set_volume(i32::from(level))
    }

    /// Mute or unmute the audio output
    pub fn set_mute(&mut self, mute: bool) -> Result<()> {
        self.apply(self.state.with_mute(mute))
    }

    /// Force mono reception
    pub fn set_mono(&mut self, mono: bool) -> Result<()> {
        self.apply(self.state.with_mono(mono))
    }

    /// Enable bass boost
    pub fn set_bass_boost(&mut self, bass_boost: bool) -> Result<()> {
        self.apply(self.state.with_bass_boost(bass_boost))
    }

    /// Seek to the next station above the current one
    pub fn seek_up(&mut self) -> Result<Frequency> {
        self.seek(SeekDirection::Up)
    }

    /// Seek to the next station below the current one
    pub fn seek_down(&mut self) -> Result<Frequency> {
        self.seek(SeekDirection::Down)
    }

    /// Run a hardware seek and return wherever the chip ended up
    ///
    /// A station found and a seek that ran into the band edge both come back
    /// as a plain frequency. Check [`Status::seek_failed`] to tell them apart.
    pub fn seek(&mut self, direction: SeekDirection) -> Result<Frequency> {
        let mut word = self.state.config_word() | config::SEEK;
        if direction == SeekDirection::Up {
            word |= config::SEEKUP;
        }
        if self.config.seek_mode == SeekMode::StopAtBandEdge {
            word |= config::SKMODE;
        }
        debug!("seek {} from {}", direction, self.state.frequency());

        self.write(reg::CONFIG, word)?;
        self.delay.delay_ms(self.config.seek_settle_ms);

        // SEEK has to drop even if polling failed
        let completed = self.wait_complete();
        let cleared = self.apply(self.state);
        if !completed? {
            warn!(
                "seek {} not confirmed after {} polls",
                direction, self.config.poll_attempts
            );
        }
        cleared?;

        let frequency = self.tuned_frequency()?;
        self.state = self.state.with_frequency(frequency);
        Ok(self.state.frequency())
    }

    /// Read the status and signal strength registers
    pub fn status(&mut self) -> Result<Status> {
        let mut words = [0u16; 2];
        self.bus.read_registers(reg::STATUS, &mut words)?;
        Ok(Status::from_registers(words[0], words[1]))
    }

    /// Received signal strength (0-127)
    pub fn rssi(&mut self) -> Result<u8> {
        Ok(self.status()?.rssi)
    }

    /// Whether the current station is received in stereo
    pub fn is_stereo(&mut self) -> Result<bool> {
        Ok(self.status()?.stereo)
    }

    /// Whether the last tune or seek has finished
    pub fn is_tuned(&mut self) -> Result<bool> {
        Ok(self.status()?.tune_complete)
    }

    /// Fetch the pending RDS group, if the chip has one
    pub fn read_rds_group(&mut self) -> Result<Option<RdsGroup>> {
        let mut words = [0u16; 6];
        self.bus.read_registers(reg::STATUS, &mut words)?;
        Ok(registers::rds_group(&words))
    }

    /// Feed the pending RDS group, if any, to a decoder
    ///
    /// The decoder (and its callback) runs after the bus is released.
    pub fn check_rds<F: FnMut(&str)>(&mut self, decoder: &mut RdsDecoder<F>) -> Result<bool> {
        match self.read_rds_group()? {
            Some(group) => {
                trace!("{}", group);
                decoder.process(group);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Shut down the driver and return the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.bus.release(), self.delay)
    }

    /// Start a tune for `state` and wait for it to settle
    fn tune(&mut self, state: RadioState) -> Result<Frequency> {
        let band = state.band();
        let channel = state.channel();
        debug!("tune {} (channel {})", state.frequency(), channel);

        self.write(reg::TUNING, registers::tuning_word(channel, band, true))?;
        self.delay.delay_ms(self.config.tune_settle_ms);

        // The chip only accepts the next command once TUNE is low again,
        // so clear it even if polling failed
        let completed = self.wait_complete();
        let cleared = self.write(reg::TUNING, registers::tuning_word(channel, band, false));
        if !completed? {
            warn!(
                "tune to {} not confirmed after {} polls",
                state.frequency(),
                self.config.poll_attempts
            );
        }
        cleared?;

        self.state = state;
        Ok(state.frequency())
    }

    /// Poll for seek/tune complete; `false` if the budget ran out
    fn wait_complete(&mut self) -> Result<bool> {
        for attempt in 0..self.config.poll_attempts {
            if self.status()?.tune_complete {
                trace!("complete after {} polls", attempt + 1);
                return Ok(true);
            }
            self.delay.delay_ms(self.config.poll_interval_ms);
        }
        Ok(false)
    }

    /// Write the configuration register for `state`, then adopt it
    fn apply(&mut self, state: RadioState) -> Result<()> {
        self.write(reg::CONFIG, state.config_word())?;
        self.state = state;
        Ok(())
    }

    fn write(&mut self, register: u8, value: u16) -> Result<()> {
        self.bus.write_register(register, value)?;
        self.image.record(register, value);
        Ok(())
    }
}
