//! Raster sampling adapter
//!
//! Turns a decoded image plus scan parameters into a scan descriptor: an
//! intensity sampler selected once per image mode, traversal flags derived
//! from the raster direction, and a lazy sequence of head movements.

pub mod bitmap;
pub mod plotter;
pub mod sampler;
pub mod traversal;

pub use bitmap::{PixelMode, RasterImage};
pub use plotter::{ScanDescriptor, ScanSegment, ScanSegments};
pub use sampler::PixelSampler;
pub use traversal::{RasterDirection, ScanDirection, Traversal};
