//! # k40kit Communication
//!
//! Byte-stream front ends for the laser interpreter.
//! Includes a GRBL emulator that turns streamed GCode into laser commands,
//! the `Pipe` abstraction transports write into, and a TCP passthrough
//! server.

pub mod communication;
pub mod error;
pub mod firmware;

pub use communication::{LaserServer, Pipe, ServerConfig};
pub use error::{CommunicationError, CommunicationResult};
pub use firmware::grbl::{
    EmulatorConfig, GcodeRecord, GrblEmulator, MotionMode, RealtimeByte, StatusReport,
    GRBL_BANNER, OK_RESPONSE,
};
