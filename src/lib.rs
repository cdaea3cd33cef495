//! # k40kit
//!
//! Laser job compiler and GRBL front end for K40-class laser cutters:
//! - Cut, engrave and raster operations compiled into laser command streams
//! - Run-time estimates and a FIFO job spooler
//! - A GRBL emulator that turns streamed GCode into the same commands
//! - A TCP passthrough server for GCode senders
//!
//! ## Architecture
//!
//! k40kit is organized as a workspace with multiple crates:
//!
//! 1. **k40kit-core** - Command vocabulary, elements, raster sampling, the interpreter trait
//! 2. **k40kit-camtools** - Laser operations and the job spooler
//! 3. **k40kit-communication** - GRBL emulation, pipes, TCP server
//! 4. **k40kit-settings** - Configuration files
//! 5. **k40kit** - Main binary that integrates all crates

pub use k40kit_core::{
    format_duration, Element, Error, ImageElement, Interpreter, InterpreterState, LaserCommand,
    PathElement, Properties, RasterDirection, RasterImage, RealtimeCommand, RecordingInterpreter,
    Result, ScanDescriptor, TextElement, MILS_PER_INCH, MILS_PER_MM,
};

pub use k40kit_camtools::{
    JobSummary, LaserOperation, LaserSettings, OperationError, OperationKind, OperationType,
    RasterSettings, Spooler,
};

pub use k40kit_communication::{
    CommunicationError, EmulatorConfig, GrblEmulator, LaserServer, Pipe, ServerConfig,
    StatusReport,
};

pub use k40kit_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Build a server with a GRBL emulator attached, configured from `config`.
///
/// The emulator drives `interpreter`; its banner is sent to the first client
/// that connects.
pub fn emulator_server<I>(config: &Config, interpreter: I) -> LaserServer
where
    I: Interpreter + Send + 'static,
{
    let server = LaserServer::new(config.server_config());
    let emulator = GrblEmulator::with_config(interpreter, config.emulator_config());
    server.set_pipe(Box::new(emulator));
    server
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
