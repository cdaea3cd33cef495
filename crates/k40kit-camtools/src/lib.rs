//! # k40kit CAM Tools
//!
//! Laser operations and the job spooler.
//!
//! - **Operations**: cut, engrave and raster operations that compile their
//!   elements into a lazy laser command stream, with run-time estimates
//! - **Spooler**: FIFO job queue that streams operations into an interpreter

pub mod error;
pub mod operation;
pub mod spooler;

pub use error::{OperationError, OperationResult};
pub use operation::{
    LaserOperation, LaserSettings, OperationKind, OperationType, RasterSettings, DEFAULT_OVERSCAN,
    DEFAULT_POWER, STATUS_QUEUED,
};
pub use spooler::{JobSummary, Spooler, SpoolerJob, STATUS_RUNNING};
