//! Laser command vocabulary
//!
//! The closed set of primitive instructions shared by every producer
//! (operation compiler, GCode emulator) and every interpreter. Adding a
//! variant is a breaking change: interpreters match exhaustively.

use crate::geometry::Path;
use crate::raster::{ScanDescriptor, ScanDirection};
use std::fmt;

/// One primitive device instruction.
#[derive(Debug, Clone)]
pub enum LaserCommand {
    /// Travel moves with the laser idle.
    ModeRapid,
    /// Program mode: moves burn at the programmed speed and power.
    ModeProgram,
    /// Compact mode used for streamed GCode motion.
    ModeCompact,
    /// Return to the interpreter's default mode.
    ModeDefault,
    SetAbsolute,
    SetIncremental,
    /// Speed in mm/s.
    SetSpeed(f64),
    /// Power on the 0 to 1000 scale.
    SetPower(f64),
    /// Raster step; `0` outside raster work.
    SetStep(i32),
    /// Custom d-ratio, or `None` for the device default.
    SetDRatio(Option<f64>),
    /// Custom acceleration, or `None` for the device default.
    SetAcceleration(Option<i32>),
    SetDirection(ScanDirection),
    /// Move to `(x, y)` in device units.
    Move(f64, f64),
    /// Trace a placed outline.
    Plot(Path),
    /// Execute a raster scan.
    Raster(ScanDescriptor),
    LaserOn,
    LaserOff,
    Home,
    /// Dwell for the given number of seconds.
    Wait(f64),
    WaitBufferEmpty,
    Reset,
}

impl LaserCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ModeRapid => "mode_rapid",
            Self::ModeProgram => "mode_program",
            Self::ModeCompact => "mode_compact",
            Self::ModeDefault => "mode_default",
            Self::SetAbsolute => "set_absolute",
            Self::SetIncremental => "set_incremental",
            Self::SetSpeed(_) => "set_speed",
            Self::SetPower(_) => "set_power",
            Self::SetStep(_) => "set_step",
            Self::SetDRatio(_) => "set_d_ratio",
            Self::SetAcceleration(_) => "set_acceleration",
            Self::SetDirection(_) => "set_direction",
            Self::Move(..) => "move",
            Self::Plot(_) => "plot",
            Self::Raster(_) => "raster",
            Self::LaserOn => "laser_on",
            Self::LaserOff => "laser_off",
            Self::Home => "home",
            Self::Wait(_) => "wait",
            Self::WaitBufferEmpty => "wait_buffer_empty",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for LaserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetSpeed(v) | Self::SetPower(v) | Self::Wait(v) => {
                write!(f, "{}({})", self.name(), v)
            }
            Self::SetStep(v) => write!(f, "{}({})", self.name(), v),
            Self::SetDRatio(v) => write!(f, "{}({:?})", self.name(), v),
            Self::SetAcceleration(v) => write!(f, "{}({:?})", self.name(), v),
            Self::Move(x, y) => write!(f, "{}({}, {})", self.name(), x, y),
            Self::SetDirection(d) => write!(
                f,
                "{}(top={}, left={}, x={}, y={})",
                self.name(),
                d.top,
                d.left,
                d.x_major,
                d.y_major
            ),
            Self::Raster(scan) => write!(
                f,
                "{}({}x{}, step={})",
                self.name(),
                scan.width(),
                scan.height(),
                scan.step()
            ),
            _ => f.write_str(self.name()),
        }
    }
}

/// Out-of-band control signal delivered ahead of queued commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RealtimeCommand {
    Pause,
    Resume,
    /// Abort everything queued; also the emergency stop.
    Reset,
}

impl fmt::Display for RealtimeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pause => write!(f, "pause"),
            Self::Resume => write!(f, "resume"),
            Self::Reset => write!(f, "reset"),
        }
    }
}
