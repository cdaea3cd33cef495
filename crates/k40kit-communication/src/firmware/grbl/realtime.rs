//! GRBL realtime control bytes.
//!
//! These single bytes are acted on the moment they arrive, whatever the
//! parser is in the middle of, and never enter a line.

use k40kit_core::RealtimeCommand;

/// A realtime byte recognised in the incoming stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RealtimeByte {
    /// `?` status report request
    StatusQuery,
    /// `~` cycle start / resume
    Resume,
    /// `!` feed hold
    Pause,
    /// `0x18` (Ctrl-X) soft reset
    SoftReset,
}

impl RealtimeByte {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'?' => Some(Self::StatusQuery),
            b'~' => Some(Self::Resume),
            b'!' => Some(Self::Pause),
            0x18 => Some(Self::SoftReset),
            _ => None,
        }
    }

    /// Get the byte representation for real-time commands
    pub fn as_byte(&self) -> u8 {
        match self {
            Self::StatusQuery => b'?',
            Self::Resume => b'~',
            Self::Pause => b'!',
            Self::SoftReset => 0x18,
        }
    }

    /// Interpreter signal for this byte. Status queries are answered by the
    /// emulator itself.
    pub fn command(&self) -> Option<RealtimeCommand> {
        match self {
            Self::StatusQuery => None,
            Self::Resume => Some(RealtimeCommand::Resume),
            Self::Pause => Some(RealtimeCommand::Pause),
            Self::SoftReset => Some(RealtimeCommand::Reset),
        }
    }
}
