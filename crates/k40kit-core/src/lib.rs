//! # k40kit Core
//!
//! Core types, traits, and utilities shared by the k40kit crates.
//! Provides the laser command vocabulary, graphic element variants,
//! loosely-typed property maps, the raster sampling adapter and the
//! interpreter contract that consumes command streams.

pub mod commands;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod interpreter;
pub mod properties;
pub mod raster;
pub mod types;
pub mod units;

pub use commands::{LaserCommand, RealtimeCommand};

pub use elements::{Element, ImageElement, PathElement, TextElement};

pub use error::{Error, PropertyError, RasterError, Result};

pub use interpreter::{Interpreter, InterpreterState, RecordingInterpreter};

pub use properties::Properties;

pub use raster::{
    PixelMode, PixelSampler, RasterDirection, RasterImage, ScanDescriptor, ScanDirection,
    ScanSegment, ScanSegments, Traversal,
};

// Re-export type aliases for convenience
pub use types::{thread_safe, BoxedIterator, ThreadSafe};

pub use units::{format_duration, MeasurementSystem, MILS_PER_INCH, MILS_PER_MM};
