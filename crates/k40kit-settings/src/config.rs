//! Configuration for k40kit
//!
//! Stored as TOML or JSON (chosen by file extension) in the platform config
//! directory. Sections:
//! - `device`: bed geometry
//! - `server`: TCP passthrough listener
//! - `emulator`: GRBL front end options
//!
//! Every section is optional in the file; missing keys take their defaults.

use crate::error::{SettingsError, SettingsResult};
use k40kit_communication::{EmulatorConfig, ServerConfig, GRBL_BANNER};
use k40kit_core::MILS_PER_MM;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name used inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Supported on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Laser bed geometry
///
/// Keys this version does not know are ignored when loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Bed width in mm
    pub bed_width: f64,
    /// Bed height in mm
    pub bed_height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            bed_width: 320.0,
            bed_height: 220.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl DeviceSettings {
    /// Bed size in device units (mils).
    pub fn bed_size_mils(&self) -> (f64, f64) {
        (
            self.bed_width * MILS_PER_MM * self.scale_x,
            self.bed_height * MILS_PER_MM * self.scale_y,
        )
    }
}

/// TCP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
    pub port: u16,
    /// Largest chunk read from a client at once, in bytes
    pub read_buffer: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        let defaults = ServerConfig::default();
        Self {
            bind_address: defaults.bind_address,
            port: defaults.port,
            read_buffer: defaults.read_buffer,
        }
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            bind_address: settings.bind_address.clone(),
            port: settings.port,
            read_buffer: settings.read_buffer,
        }
    }
}

/// GRBL emulator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorSettings {
    pub flip_x: f64,
    pub flip_y: f64,
    pub banner: String,
}

impl Default for EmulatorSettings {
    fn default() -> Self {
        Self {
            flip_x: 1.0,
            flip_y: -1.0,
            banner: GRBL_BANNER.to_string(),
        }
    }
}

impl From<&EmulatorSettings> for EmulatorConfig {
    fn from(settings: &EmulatorSettings) -> Self {
        Self {
            flip_x: settings.flip_x,
            flip_y: settings.flip_y,
            banner: settings.banner.clone(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceSettings,
    pub server: ServerSettings,
    pub emulator: EmulatorSettings,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/k40kit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no config directory on this platform".to_string())
        })?;
        Ok(dir.join("k40kit").join(CONFIG_FILE_NAME))
    }

    /// Load config from a `.toml` or `.json` file
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = match format {
            ConfigFormat::Toml => toml::from_str(&content)?,
            ConfigFormat::Json => serde_json::from_str(&content)?,
        };
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to a `.toml` or `.json` file, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
        };

        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, content).map_err(io_err)?;
        Ok(())
    }

    pub fn validate(&self) -> SettingsResult<()> {
        let device = &self.device;
        if device.bed_width <= 0.0 || device.bed_height <= 0.0 {
            return Err(SettingsError::invalid(
                "device.bed_width",
                "bed dimensions must be > 0",
            ));
        }
        if device.scale_x <= 0.0 || device.scale_y <= 0.0 {
            return Err(SettingsError::invalid("device.scale_x", "scale must be > 0"));
        }

        if self.server.port == 0 {
            return Err(SettingsError::invalid("server.port", "must be > 0"));
        }
        if self.server.read_buffer == 0 {
            return Err(SettingsError::invalid("server.read_buffer", "must be > 0"));
        }

        for (key, flip) in [
            ("emulator.flip_x", self.emulator.flip_x),
            ("emulator.flip_y", self.emulator.flip_y),
        ] {
            if flip != 1.0 && flip != -1.0 {
                return Err(SettingsError::invalid(key, "must be 1 or -1"));
            }
        }
        Ok(())
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::from(&self.server)
    }

    pub fn emulator_config(&self) -> EmulatorConfig {
        EmulatorConfig::from(&self.emulator)
    }
}
