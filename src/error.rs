//! Driver errors
//!
//! Only bus-level failures are errors. A tune or seek that runs out of its
//! polling budget is logged and returns the best-known frequency instead.

use crate::hal::i2c::I2cAddress;
use embedded_hal::i2c::ErrorKind;

/// Result alias used throughout the driver
pub type Result<T> = core::result::Result<T, Error>;

/// Tuner driver error
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Nothing acknowledged the expected address during the init probe
    DeviceAbsent(I2cAddress),
    /// A read or write failed mid-transaction
    Transaction(ErrorKind),
    /// Request outside what the register file can hold
    InvalidParameter,
}

impl Error {
    /// Wrap any bus error as a transaction failure
    pub(crate) fn transaction<E: embedded_hal::i2c::Error>(err: E) -> Self {
        Self::Transaction(err.kind())
    }

    /// Whether the error means the device is missing entirely
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::DeviceAbsent(_))
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DeviceAbsent(addr) => write!(f, "no device at {addr}"),
            Self::Transaction(kind) => write!(f, "bus transaction failed: {kind}"),
            Self::InvalidParameter => f.write_str("invalid parameter"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::DeviceAbsent(addr) => defmt::write!(f, "DeviceAbsent({})", addr),
            Self::Transaction(kind) => {
                defmt::write!(f, "Transaction({})", defmt::Debug2Format(kind));
            }
            Self::InvalidParameter => defmt::write!(f, "InvalidParameter"),
        }
    }
}
