//! Hardware Abstraction Layer
//!
//! Bus-level access shared by the tuner and display drivers. Everything
//! here is generic over the `embedded-hal` traits so it runs unchanged on
//! the target and against host-side fakes.

pub mod i2c;
