//! Radio Control Logic
//!
//! Receiver state and the RDS decoder. Nothing in here touches the bus.

pub mod rds;
pub mod state;
