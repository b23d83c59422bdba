//! I2C Register Transport
//!
//! 16-bit register access over a two-wire bus for the RDA5807M and the
//! status display. Every transaction takes the bus lock immediately before
//! it starts and drops it as soon as it ends, error or not.

use core::cell::RefCell;
use core::fmt;

use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::i2c::I2c;

use crate::error::{Error, Result};

/// Largest register read in one transaction (the whole register file)
pub const MAX_READ_WORDS: usize = 16;

/// I2C device address wrapper
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// RDA5807M in register-indexed mode
    pub const RDA5807M_INDEXED: Self = Self(0x11);

    /// RDA5807M in sequential-access mode (not used by this driver)
    pub const RDA5807M_SEQUENTIAL: Self = Self(0x10);

    /// SSD1306 OLED display address
    pub const SSD1306: Self = Self(0x3C);

    /// Create from 7-bit address
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// Get the 7-bit address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self.0
    }
}

impl fmt::Display for I2cAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for I2cAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{:02X}", self.0);
    }
}

/// Register-indexed bus handle for one device
///
/// Owns the underlying bus for the lifetime of the driver. Use
/// [`RegisterBus::release`] to get it back on shutdown.
pub struct RegisterBus<I2C, M: RawMutex = NoopRawMutex> {
    bus: Mutex<M, RefCell<I2C>>,
    address: I2cAddress,
}

impl<I2C: I2c, M: RawMutex> RegisterBus<I2C, M> {
    /// Wrap a bus for register access at `address`
    #[must_use]
    pub fn new(i2c: I2C, address: I2cAddress) -> Self {
        Self {
            bus: Mutex::new(RefCell::new(i2c)),
            address,
        }
    }

    /// Device address this handle talks to
    #[must_use]
    pub const fn address(&self) -> I2cAddress {
        self.address
    }

    /// Check that something acknowledges the device address
    pub fn probe(&self) -> Result<()> {
        let address = self.address;
        self.with_bus(|i2c| {
            let mut buf = [0u8; 1];
            i2c.read(address.addr(), &mut buf)
                .map_err(|_| Error::DeviceAbsent(address))
        })
    }

    /// Write a 16-bit register: index byte, then the value big-endian
    pub fn write_register(&self, reg: u8, value: u16) -> Result<()> {
        let [hi, lo] = value.to_be_bytes();
        let address = self.address;
        self.with_bus(|i2c| {
            i2c.write(address.addr(), &[reg, hi, lo])
                .map_err(Error::transaction)
        })
    }

    /// Read `words.len()` consecutive registers starting at `start`
    ///
    /// Sends the index byte and reads all words in one transaction.
    pub fn read_registers(&self, start: u8, words: &mut [u16]) -> Result<()> {
        if words.len() > MAX_READ_WORDS {
            return Err(Error::InvalidParameter);
        }

        let mut raw = [0u8; MAX_READ_WORDS * 2];
        let raw = &mut raw[..words.len() * 2];
        let address = self.address;
        self.with_bus(|i2c| {
            i2c.write_read(address.addr(), &[start], &mut *raw)
                .map_err(Error::transaction)
        })?;

        for (word, bytes) in words.iter_mut().zip(raw.chunks_exact(2)) {
            *word = u16::from_be_bytes([bytes[0], bytes[1]]);
        }
        Ok(())
    }

    /// Read a single register
    pub fn read_register(&self, reg: u8) -> Result<u16> {
        let mut word = [0u16; 1];
        self.read_registers(reg, &mut word)?;
        Ok(word[0])
    }

    /// Hand the bus back to the caller
    pub fn release(self) -> I2C {
        self.bus.into_inner().into_inner()
    }

    /// Run one transaction with the bus locked
    fn with_bus<R>(&self, f: impl FnOnce(&mut I2C) -> R) -> R {
        self.bus.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

/// Scan the I2C bus for devices
///
/// Probes every non-reserved 7-bit address with a one-byte read.
pub fn scan<I2C: I2c>(i2c: &mut I2C) -> heapless::Vec<I2cAddress, 16> {
    let mut devices = heapless::Vec::new();

    for addr in 0x08..0x78 {
        let mut buf = [0u8; 1];
        if i2c.read(addr, &mut buf).is_ok() {
            let _ = devices.push(I2cAddress::new(addr));
        }
    }

    devices
}
