//! k40kit Settings Crate
//!
//! Loads and saves device, server, and emulator configuration.

pub mod config;
pub mod error;

pub use config::{
    Config, ConfigFormat, DeviceSettings, EmulatorSettings, ServerSettings, CONFIG_FILE_NAME,
};
pub use error::{SettingsError, SettingsResult};
