//! GRBL protocol support
//!
//! An emulator that accepts a GRBL byte stream and drives a laser
//! interpreter, plus the realtime byte set and the status report line.

pub mod emulator;
pub mod realtime;
pub mod status_parser;

pub use emulator::{EmulatorConfig, GcodeRecord, GrblEmulator, MotionMode, GRBL_BANNER, OK_RESPONSE};
pub use realtime::RealtimeByte;
pub use status_parser::{grbl_state_name, StatusReport};
