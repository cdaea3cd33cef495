//! Common type aliases shared across the k40kit crates.

mod aliases;

pub use aliases::*;
