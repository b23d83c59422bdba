//! Peripheral Drivers
//!
//! Drivers for the external ICs on the receiver board: the RDA5807M
//! tuner and the SSD1306 status display.

pub mod display;
pub mod rda5807m;
