//! Firmware protocol front ends
//!
//! Supported protocols:
//! - GRBL: streamed GCode with realtime control bytes

pub mod grbl;

pub use grbl::{EmulatorConfig, GrblEmulator, StatusReport};
