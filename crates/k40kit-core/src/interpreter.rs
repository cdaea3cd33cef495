//! Interpreter contract
//!
//! An interpreter consumes the command stream and drives the hardware. The
//! operation compiler and the GCode emulator only talk to this trait.

use crate::commands::{LaserCommand, RealtimeCommand};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Motion state reported in status queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InterpreterState {
    #[default]
    Idle,
    Busy,
}

impl InterpreterState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Busy => "Busy",
        }
    }
}

impl fmt::Display for InterpreterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consumer of laser commands.
pub trait Interpreter {
    /// Accept one command.
    fn command(&mut self, command: LaserCommand);

    /// Accept one out-of-band control signal.
    fn realtime_command(&mut self, command: RealtimeCommand);

    fn state(&self) -> InterpreterState;

    /// Head position in device units.
    fn position(&self) -> (f64, f64);

    fn speed(&self) -> f64;

    fn power(&self) -> f64;
}

impl<T: Interpreter + ?Sized> Interpreter for Box<T> {
    fn command(&mut self, command: LaserCommand) {
        (**self).command(command)
    }

    fn realtime_command(&mut self, command: RealtimeCommand) {
        (**self).realtime_command(command)
    }

    fn state(&self) -> InterpreterState {
        (**self).state()
    }

    fn position(&self) -> (f64, f64) {
        (**self).position()
    }

    fn speed(&self) -> f64 {
        (**self).speed()
    }

    fn power(&self) -> f64 {
        (**self).power()
    }
}

/// In-memory interpreter that tracks machine state without hardware.
///
/// Commands are kept in order unless history is disabled, which lets a
/// long-running host use it as a pure state tracker.
#[derive(Debug)]
pub struct RecordingInterpreter {
    commands: Vec<LaserCommand>,
    realtime: Vec<RealtimeCommand>,
    keep_history: bool,
    state: InterpreterState,
    position: (f64, f64),
    speed: f64,
    power: f64,
    incremental: bool,
    laser_on: bool,
    paused: bool,
}

impl Default for RecordingInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingInterpreter {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            realtime: Vec::new(),
            keep_history: true,
            state: InterpreterState::Idle,
            position: (0.0, 0.0),
            speed: 0.0,
            power: 1000.0,
            incremental: false,
            laser_on: false,
            paused: false,
        }
    }

    /// Track state only; commands are logged and dropped.
    pub fn without_history() -> Self {
        Self {
            keep_history: false,
            ..Self::new()
        }
    }

    pub fn commands(&self) -> &[LaserCommand] {
        &self.commands
    }

    pub fn realtime_commands(&self) -> &[RealtimeCommand] {
        &self.realtime
    }

    /// Drain the recorded commands.
    pub fn take_commands(&mut self) -> Vec<LaserCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn set_state(&mut self, state: InterpreterState) {
        self.state = state;
    }

    pub fn is_laser_on(&self) -> bool {
        self.laser_on
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Interpreter for RecordingInterpreter {
    fn command(&mut self, command: LaserCommand) {
        tracing::trace!("interpreter <- {}", command);
        match &command {
            LaserCommand::SetSpeed(speed) => self.speed = *speed,
            LaserCommand::SetPower(power) => self.power = *power,
            LaserCommand::SetAbsolute => self.incremental = false,
            LaserCommand::SetIncremental => self.incremental = true,
            LaserCommand::Move(x, y) => {
                self.position = if self.incremental {
                    (self.position.0 + x, self.position.1 + y)
                } else {
                    (*x, *y)
                };
            }
            LaserCommand::LaserOn => self.laser_on = true,
            LaserCommand::LaserOff | LaserCommand::ModeRapid => self.laser_on = false,
            LaserCommand::Home => {
                self.position = (0.0, 0.0);
                self.laser_on = false;
            }
            LaserCommand::Reset => {
                self.laser_on = false;
                self.incremental = false;
            }
            _ => {}
        }
        if self.keep_history {
            self.commands.push(command);
        }
    }

    fn realtime_command(&mut self, command: RealtimeCommand) {
        match command {
            RealtimeCommand::Pause => self.paused = true,
            RealtimeCommand::Resume => self.paused = false,
            RealtimeCommand::Reset => {
                self.paused = false;
                self.laser_on = false;
                self.commands.clear();
            }
        }
        if self.keep_history {
            self.realtime.push(command);
        }
    }

    fn state(&self) -> InterpreterState {
        self.state
    }

    fn position(&self) -> (f64, f64) {
        self.position
    }

    fn speed(&self) -> f64 {
        self.speed
    }

    fn power(&self) -> f64 {
        self.power
    }
}
