//! FM Radio Firmware Library
//!
//! Driver and application logic for an STM32G474 board with an RDA5807M
//! single-chip FM receiver and an SSD1306 status display.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Seek button  │  RDS polling  │  Status screen               │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     RADIO LOGIC                              │
//! │  Radio state  │  RDS decoder                                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  RDA5807M  │  SSD1306  │  I2C register transport             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The drivers are written against the blocking `embedded-hal` 1.0 traits
//! and take their delay source as a parameter, so the whole stack runs on
//! the host with a simulated bus (`--features std`).
//!
//! # Design Principles
//!
//! - **Immutable-by-default**: State transitions return new instances
//! - **Type-driven design**: Custom types enforce invariants at construction
//! - **No unsafe in application code**
//! - **Functional core, imperative shell**: Register encoding and RDS
//!   decoding are pure; only the drivers do I/O
//! - **Explicit error handling**: All fallible operations return `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Register-indexed I2C transport and bus scanning.
pub mod hal;

/// Peripheral Drivers
///
/// RDA5807M tuner and SSD1306 display.
pub mod drivers;

/// Radio Control Logic
///
/// Receiver state and RDS decoding.
pub mod radio;

/// Driver error type
pub mod error;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

pub use drivers::rda5807m::Rda5807m;
pub use error::{Error, Result};

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::drivers::display::{Display, ScreenStatus};
    pub use crate::drivers::rda5807m::Rda5807m;
    pub use crate::radio::rds::RdsDecoder;
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::i2c::I2c;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
