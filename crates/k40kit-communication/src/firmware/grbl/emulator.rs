//! GRBL Emulator
//!
//! Streaming GCode front end for a laser interpreter. Bytes are consumed one
//! at a time: realtime bytes are handled immediately, everything else is
//! tokenized into letter/value pairs and collected into a record that is
//! executed when a line ends.
//!
//! Arcs (`G2`/`G3`) are accepted but executed as straight moves to their end
//! point.

use super::realtime::RealtimeByte;
use super::status_parser::{grbl_state_name, StatusReport};
use k40kit_core::{Interpreter, LaserCommand, MeasurementSystem, MILS_PER_MM};
use std::collections::BTreeMap;

/// Banner queued for the first read, as sent by GRBL on reset.
pub const GRBL_BANNER: &str = "Grbl 1.1e ['$' for help]\r\n";

/// Reply queued after every completed line.
pub const OK_RESPONSE: &str = "ok\r\n";

/// Emulator construction options.
#[derive(Debug, Clone, PartialEq)]
pub struct EmulatorConfig {
    /// Sign applied to incoming X values.
    pub flip_x: f64,
    /// Sign applied to incoming Y values.
    pub flip_y: f64,
    /// Message available before anything is written.
    pub banner: String,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            flip_x: 1.0,
            flip_y: -1.0,
            banner: GRBL_BANNER.to_string(),
        }
    }
}

/// Modal motion mode selected by `G0` to `G3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionMode {
    #[default]
    Rapid,
    Linear,
    ArcCw,
    ArcCcw,
}

/// Letter/value pairs of one GCode line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GcodeRecord {
    fields: BTreeMap<char, f64>,
    comment: Option<String>,
}

impl GcodeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a lowercase letter field.
    pub fn with(mut self, letter: char, value: f64) -> Self {
        self.insert(letter, value);
        self
    }

    pub fn insert(&mut self, letter: char, value: f64) {
        self.fields.insert(letter.to_ascii_lowercase(), value);
    }

    pub fn get(&self, letter: char) -> Option<f64> {
        self.fields.get(&letter).copied()
    }

    pub fn contains(&self, letter: char) -> bool {
        self.fields.contains_key(&letter)
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.comment.is_none()
    }

    fn integer(&self, letter: char) -> Option<i64> {
        self.get(letter)
            .filter(|v| v.fract() == 0.0)
            .map(|v| v as i64)
    }
}

/// Byte-stream GRBL front end driving an [`Interpreter`].
#[derive(Debug)]
pub struct GrblEmulator<I> {
    interpreter: I,
    flip_x: f64,
    flip_y: f64,
    units: MeasurementSystem,
    feed_scale: f64,
    motion_mode: MotionMode,
    comment: Option<String>,
    code: Option<char>,
    value: String,
    record: GcodeRecord,
    last_comment: Option<String>,
    read_info: Option<String>,
}

impl<I: Interpreter> GrblEmulator<I> {
    pub fn new(interpreter: I) -> Self {
        Self::with_config(interpreter, EmulatorConfig::default())
    }

    pub fn with_config(interpreter: I, config: EmulatorConfig) -> Self {
        Self {
            interpreter,
            flip_x: config.flip_x,
            flip_y: config.flip_y,
            units: MeasurementSystem::Metric,
            feed_scale: feed_scale_for(MILS_PER_MM),
            motion_mode: MotionMode::default(),
            comment: None,
            code: None,
            value: String::new(),
            record: GcodeRecord::new(),
            last_comment: None,
            read_info: Some(config.banner).filter(|b| !b.is_empty()),
        }
    }

    pub fn interpreter(&self) -> &I {
        &self.interpreter
    }

    pub fn interpreter_mut(&mut self) -> &mut I {
        &mut self.interpreter
    }

    pub fn into_inner(self) -> I {
        self.interpreter
    }

    /// Active `G20`/`G21` unit system.
    pub fn units(&self) -> MeasurementSystem {
        self.units
    }

    /// Device units per incoming linear unit.
    pub fn scale(&self) -> f64 {
        self.units.mils_per_unit()
    }

    /// Multiplier turning an `F` word into interpreter speed.
    pub fn feed_scale(&self) -> f64 {
        self.feed_scale
    }

    pub fn motion_mode(&self) -> MotionMode {
        self.motion_mode
    }

    /// Text of the most recently closed comment.
    pub fn last_comment(&self) -> Option<&str> {
        self.last_comment.as_deref()
    }

    /// Fields collected for the line in progress.
    pub fn pending_record(&self) -> &GcodeRecord {
        &self.record
    }

    /// Take the pending readback message, if any.
    pub fn read(&mut self) -> Option<String> {
        self.read_info.take()
    }

    /// Feed raw bytes into the parser.
    pub fn write(&mut self, data: &[u8]) {
        for &byte in data {
            self.feed_byte(byte);
        }
    }

    fn feed_byte(&mut self, byte: u8) {
        if let Some(rt) = RealtimeByte::from_byte(byte) {
            self.realtime(rt);
            return;
        }

        let is_end = byte == b'\n' || byte == b'\r';
        if let Some(comment) = self.comment.as_mut() {
            if byte != b')' && !is_end {
                comment.push(char::from(byte));
                return;
            }
            let text = std::mem::take(comment);
            self.comment = None;
            self.last_comment = Some(text.clone());
            self.record.comment = Some(text);
            if !is_end {
                return;
            }
        }

        match byte {
            b'(' | b';' => {
                self.comment = Some(String::new());
                return;
            }
            b'\t' | b' ' => return,
            b'/' if self.code.is_none() && self.value.is_empty() => return,
            b'0'..=b'9' | b'+' | b'-' | b'.' => {
                self.value.push(char::from(byte));
                return;
            }
            _ => {}
        }

        let byte = byte.to_ascii_lowercase();
        let is_letter = byte.is_ascii_lowercase();
        if is_letter || is_end {
            self.flush_token();
        }
        if is_letter {
            self.code = Some(char::from(byte));
        } else if is_end {
            let record = std::mem::take(&mut self.record);
            self.command(&record);
            self.read_info = Some(OK_RESPONSE.to_string());
        }
    }

    /// Move a completed letter/value pair into the record.
    fn flush_token(&mut self) {
        let value = std::mem::take(&mut self.value);
        let Some(code) = self.code.take() else {
            return;
        };
        if value.is_empty() {
            tracing::debug!("Dropping '{}' without a value", code);
            return;
        }
        match value.parse::<f64>() {
            Ok(v) => self.record.insert(code, v),
            Err(_) => tracing::warn!("Dropping malformed value '{}{}'", code, value),
        }
    }

    fn realtime(&mut self, rt: RealtimeByte) {
        match rt.command() {
            Some(command) => {
                tracing::info!("Realtime {}", command);
                self.interpreter.realtime_command(command);
            }
            None => self.read_info = Some(self.status_report().format()),
        }
    }

    /// Snapshot of the interpreter in user units.
    pub fn status_report(&self) -> StatusReport {
        let (x, y) = self.interpreter.position();
        let scale = self.scale();
        StatusReport {
            state: grbl_state_name(self.interpreter.state()).to_string(),
            mpos: (x / scale, y / scale, 0.0),
            feed: self.interpreter.speed() / self.feed_scale,
            power: self.interpreter.power() as i64,
        }
    }

    fn set_units(&mut self, units: MeasurementSystem) {
        self.units = units;
        self.feed_scale = feed_scale_for(units.mils_per_unit());
    }

    /// Execute one completed line.
    pub fn command(&mut self, record: &GcodeRecord) {
        if record.is_empty() {
            return;
        }
        tracing::debug!("GRBL record {:?}", record);

        if let Some(f) = record.get('f') {
            self.interpreter
                .command(LaserCommand::SetSpeed(self.feed_scale * f));
        }

        if let Some(g) = record.integer('g') {
            match g {
                0 => self.motion_mode = MotionMode::Rapid,
                1 => self.motion_mode = MotionMode::Linear,
                2 => self.motion_mode = MotionMode::ArcCw,
                3 => self.motion_mode = MotionMode::ArcCcw,
                4 => {
                    self.interpreter.command(LaserCommand::ModeDefault);
                    self.interpreter.command(LaserCommand::WaitBufferEmpty);
                    if let Some(p) = record.get('p') {
                        self.interpreter.command(LaserCommand::Wait(p / 1000.0));
                    }
                    if let Some(s) = record.get('s') {
                        self.interpreter.command(LaserCommand::Wait(s));
                    }
                }
                28 => {
                    self.interpreter.command(LaserCommand::ModeDefault);
                    self.interpreter.command(LaserCommand::WaitBufferEmpty);
                    self.interpreter.command(LaserCommand::Home);
                }
                20 | 70 => self.set_units(MeasurementSystem::Imperial),
                21 | 71 => self.set_units(MeasurementSystem::Metric),
                90 => self.interpreter.command(LaserCommand::SetAbsolute),
                91 => self.interpreter.command(LaserCommand::SetIncremental),
                94 => self.feed_scale = feed_scale_for(self.scale()),
                other => tracing::debug!("Ignoring G{}", other),
            }
        }

        if let Some(m) = record.integer('m') {
            match m {
                30 => return,
                3 | 4 => self.interpreter.command(LaserCommand::LaserOn),
                5 => self.interpreter.command(LaserCommand::LaserOff),
                other => tracing::debug!("Ignoring M{}", other),
            }
        }

        if record.contains('x') || record.contains('y') {
            let scale = self.scale();
            let x = record.get('x').map_or(0.0, |x| x * scale * self.flip_x);
            let y = record.get('y').map_or(0.0, |y| y * scale * self.flip_y);
            if self.motion_mode == MotionMode::Rapid {
                self.interpreter.command(LaserCommand::LaserOff);
                self.interpreter.command(LaserCommand::ModeDefault);
            } else {
                self.interpreter.command(LaserCommand::ModeCompact);
            }
            self.interpreter.command(LaserCommand::Move(x, y));
        }
    }
}

/// Feed scale for units-per-minute feed at `scale` device units per unit.
fn feed_scale_for(scale: f64) -> f64 {
    (scale / MILS_PER_MM) * (1.0 / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k40kit_core::{RecordingInterpreter, MILS_PER_INCH};

    fn emulator() -> GrblEmulator<RecordingInterpreter> {
        let mut emu = GrblEmulator::new(RecordingInterpreter::new());
        emu.read();
        emu
    }

    #[test]
    fn test_banner_on_first_read() {
        let mut emu = GrblEmulator::new(RecordingInterpreter::new());
        assert_eq!(emu.read().as_deref(), Some(GRBL_BANNER));
        assert_eq!(emu.read(), None);
    }

    #[test]
    fn test_letter_without_value_is_dropped() {
        let mut emu = emulator();
        emu.write(b"X Y5");
        assert!(!emu.pending_record().contains('x'));
        emu.write(b"\n");
        let commands = emu.interpreter().commands();
        assert!(matches!(commands.last(), Some(LaserCommand::Move(x, y)) if *x == 0.0 && *y == -5.0 * MILS_PER_MM));
    }

    #[test]
    fn test_comment_kept_as_field() {
        let mut emu = emulator();
        emu.write(b"(hello world)G1\n");
        assert_eq!(emu.last_comment(), Some("hello world"));
        assert_eq!(emu.motion_mode(), MotionMode::Linear);

        emu.write(b"; trailing note\n");
        assert_eq!(emu.last_comment(), Some(" trailing note"));
        assert_eq!(emu.read().as_deref(), Some(OK_RESPONSE));
    }

    #[test]
    fn test_block_delete_only_at_token_start() {
        let mut emu = emulator();
        emu.write(b"/G1 X1\n");
        assert_eq!(emu.motion_mode(), MotionMode::Linear);
    }

    #[test]
    fn test_malformed_value_is_dropped() {
        let mut emu = emulator();
        emu.write(b"X1.2.3 Y2\n");
        let commands = emu.interpreter().commands();
        assert!(matches!(commands.last(), Some(LaserCommand::Move(x, _)) if *x == 0.0));
    }

    #[test]
    fn test_inch_mode_rescales_feed() {
        let mut emu = emulator();
        emu.write(b"G20\n");
        assert_eq!(emu.units(), MeasurementSystem::Imperial);
        assert_eq!(emu.scale(), MILS_PER_INCH);
        assert!((emu.feed_scale() - MILS_PER_INCH / MILS_PER_MM / 60.0).abs() < 1e-12);
        emu.write(b"G21\n");
        assert_eq!(emu.scale(), MILS_PER_MM);
        assert!((emu.feed_scale() - 1.0 / 60.0).abs() < 1e-12);
    }
}
