//! Byte pipes between a transport and a protocol front end.

use crate::firmware::grbl::GrblEmulator;
use k40kit_core::Interpreter;

/// A duplex byte channel with a one-shot readback slot.
pub trait Pipe: Send {
    /// Deliver raw bytes.
    fn write(&mut self, data: &[u8]);

    /// Take the pending reply, if any. Each reply is returned once.
    fn read(&mut self) -> Option<String>;
}

impl<I: Interpreter + Send> Pipe for GrblEmulator<I> {
    fn write(&mut self, data: &[u8]) {
        GrblEmulator::write(self, data)
    }

    fn read(&mut self) -> Option<String> {
        GrblEmulator::read(self)
    }
}
