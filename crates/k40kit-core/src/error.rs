//! Error handling for k40kit
//!
//! Provides the error types of the core layer:
//! - Raster errors (pixel buffers that cannot be sampled)
//! - Property errors (loosely-typed values that fail to coerce)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Raster image error type
///
/// Raised when a pixel buffer cannot back a raster scan. These are
/// configuration errors: an image must be normalized into a supported
/// mode before an operation ever sees it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterError {
    /// Image has a zero dimension
    #[error("Image has zero size ({width}x{height})")]
    EmptyImage {
        /// The image width in pixels.
        width: u32,
        /// The image height in pixels.
        height: u32,
    },

    /// Pixel buffer length does not match the image geometry
    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize {
        /// The byte count implied by width, height and mode.
        expected: usize,
        /// The byte count actually supplied.
        actual: usize,
    },

    /// Palette-mode image supplied without a palette
    #[error("Palette image has an empty palette")]
    MissingPalette,

    /// Pixel refers to a palette entry that does not exist
    #[error("Palette index {index} out of range for {len} entries")]
    PaletteIndex {
        /// The offending palette index.
        index: u8,
        /// The number of palette entries.
        len: usize,
    },
}

/// Property coercion error type
///
/// Operation settings arrive as loosely-typed values. Callers decide
/// whether a coercion failure is fatal or falls back to a previous value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// Key not present in the property map
    #[error("Property '{key}' is not set")]
    Missing {
        /// The requested key.
        key: String,
    },

    /// Value could not be coerced into the requested type
    #[error("Property '{key}' has value {value}, expected {expected}")]
    InvalidType {
        /// The requested key.
        key: String,
        /// The stored value, rendered as JSON.
        value: String,
        /// The requested type.
        expected: &'static str,
    },

    /// Value coerced but falls outside the accepted range
    #[error("Property '{key}' value {value} is out of range")]
    OutOfRange {
        /// The requested key.
        key: String,
        /// The stored value, rendered as JSON.
        value: String,
    },
}

/// Main error type for k40kit core
#[derive(Error, Debug)]
pub enum Error {
    /// Raster error
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// Property error
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a raster error
    pub fn is_raster_error(&self) -> bool {
        matches!(self, Error::Raster(_))
    }

    /// Check if this is a property error
    pub fn is_property_error(&self) -> bool {
        matches!(self, Error::Property(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
