use k40kit_communication::{EmulatorConfig, GrblEmulator, MotionMode, OK_RESPONSE};
use k40kit_core::{
    InterpreterState, LaserCommand, RealtimeCommand, RecordingInterpreter, MILS_PER_INCH,
    MILS_PER_MM,
};
use proptest::prelude::*;

fn emulator() -> GrblEmulator<RecordingInterpreter> {
    let mut emu = GrblEmulator::new(RecordingInterpreter::new());
    emu.read();
    emu
}

fn names(emu: &GrblEmulator<RecordingInterpreter>) -> Vec<&'static str> {
    emu.interpreter().commands().iter().map(|c| c.name()).collect()
}

#[test]
fn test_linear_move_with_feed() {
    let mut emu = emulator();
    emu.write(b"G1 X10 Y20 F500\n");

    let commands = emu.interpreter().commands();
    assert_eq!(commands.len(), 3);
    assert!(matches!(commands[0], LaserCommand::SetSpeed(s) if (s - 500.0 / 60.0).abs() < 1e-12));
    assert!(matches!(commands[1], LaserCommand::ModeCompact));
    assert!(matches!(
        commands[2],
        LaserCommand::Move(x, y) if x == 10.0 * MILS_PER_MM && y == 20.0 * MILS_PER_MM * -1.0
    ));
    assert!(emu.pending_record().is_empty());
    assert_eq!(emu.read().as_deref(), Some(OK_RESPONSE));
    assert_eq!(emu.read(), None);
}

#[test]
fn test_status_query_mid_token() {
    let mut emu = emulator();
    emu.write(b"G1 X1");
    emu.write(b"?");
    let status = emu.read().unwrap();
    assert!(status.starts_with("<Idle|MPos:"));
    assert!(emu.interpreter().commands().is_empty());

    emu.write(b"\n");
    let commands = emu.interpreter().commands();
    assert!(matches!(commands.last(), Some(LaserCommand::Move(x, y)) if *x == MILS_PER_MM && *y == 0.0));
    assert_eq!(emu.read().as_deref(), Some(OK_RESPONSE));
}

#[test]
fn test_realtime_bytes_inside_a_number() {
    let mut emu = emulator();
    emu.write(b"G1 X1!2~\n");
    assert_eq!(
        emu.interpreter().realtime_commands(),
        &[RealtimeCommand::Pause, RealtimeCommand::Resume]
    );
    let commands = emu.interpreter().commands();
    assert!(matches!(commands.last(), Some(LaserCommand::Move(x, _)) if *x == 12.0 * MILS_PER_MM));
}

#[test]
fn test_soft_reset_byte() {
    let mut emu = emulator();
    emu.write(&[0x18]);
    assert_eq!(emu.interpreter().realtime_commands(), &[RealtimeCommand::Reset]);
    assert_eq!(emu.read(), None);
}

#[test]
fn test_rapid_move_turns_laser_off() {
    let mut emu = emulator();
    emu.write(b"G0 X1 Y1\n");
    assert_eq!(names(&emu), vec!["laser_off", "mode_default", "move"]);
}

#[test]
fn test_motion_mode_is_modal() {
    let mut emu = emulator();
    emu.write(b"G1\nX1\nX2\n");
    assert_eq!(emu.motion_mode(), MotionMode::Linear);
    assert_eq!(names(&emu), vec!["mode_compact", "move", "mode_compact", "move"]);
}

#[test]
fn test_arc_executes_as_straight_move() {
    // Known limitation: arcs go straight to their end point.
    let mut emu = emulator();
    emu.write(b"G2 X10 Y0 I5 J0\n");
    assert_eq!(emu.motion_mode(), MotionMode::ArcCw);
    assert_eq!(names(&emu), vec!["mode_compact", "move"]);
}

#[test]
fn test_ccw_arc_executes_as_straight_move() {
    let mut emu = emulator();
    emu.write(b"G3 X1 Y1\n");
    assert_eq!(emu.motion_mode(), MotionMode::ArcCcw);
    assert_eq!(names(&emu), vec!["mode_compact", "move"]);
    assert!(matches!(
        emu.interpreter().commands()[1],
        LaserCommand::Move(x, y) if x == MILS_PER_MM && y == -MILS_PER_MM
    ));
}

fn speeds(emu: &GrblEmulator<RecordingInterpreter>) -> Vec<f64> {
    emu.interpreter()
        .commands()
        .iter()
        .filter_map(|c| match c {
            LaserCommand::SetSpeed(s) => Some(*s),
            _ => None,
        })
        .collect()
}

#[test]
fn test_feed_rate_follows_unit_aliases() {
    let mut emu = emulator();
    emu.write(b"G70\nG94\nF60\nG71\nF60\n");
    let speeds = speeds(&emu);
    assert_eq!(speeds.len(), 2);
    assert!((speeds[0] - MILS_PER_INCH / MILS_PER_MM).abs() < 1e-9);
    assert!((speeds[1] - 1.0).abs() < 1e-12);
}

#[test]
fn test_g94_keeps_feed_scale_of_active_units() {
    let mut emu = emulator();
    emu.write(b"G20\nG94\n");
    assert!((emu.feed_scale() - MILS_PER_INCH / MILS_PER_MM / 60.0).abs() < 1e-12);
    emu.write(b"G21\nG94\n");
    assert!((emu.feed_scale() - 1.0 / 60.0).abs() < 1e-12);
}

#[test]
fn test_status_line_reports_busy_state() {
    let mut interp = RecordingInterpreter::new();
    interp.set_state(InterpreterState::Busy);
    let mut emu = GrblEmulator::new(interp);
    emu.read();
    emu.write(b"?");
    let line = emu.read().unwrap();
    assert!(line.starts_with("<Busy|MPos:"), "{}", line);
}

#[test]
fn test_dwell_in_milliseconds_and_seconds() {
    let mut emu = emulator();
    emu.write(b"G4 P500\n");
    let commands = emu.interpreter().commands();
    assert_eq!(names(&emu), vec!["mode_default", "wait_buffer_empty", "wait"]);
    assert!(matches!(commands[2], LaserCommand::Wait(t) if t == 0.5));

    let mut emu = emulator();
    emu.write(b"G4 S2\n");
    assert!(matches!(emu.interpreter().commands()[2], LaserCommand::Wait(t) if t == 2.0));
}

#[test]
fn test_home() {
    let mut emu = emulator();
    emu.write(b"G28\n");
    assert_eq!(names(&emu), vec!["mode_default", "wait_buffer_empty", "home"]);
}

#[test]
fn test_positioning_modes() {
    let mut emu = emulator();
    emu.write(b"G91\nG90\n");
    assert_eq!(names(&emu), vec!["set_incremental", "set_absolute"]);
}

#[test]
fn test_laser_on_off() {
    let mut emu = emulator();
    emu.write(b"M3\nM4\nM5\n");
    assert_eq!(names(&emu), vec!["laser_on", "laser_on", "laser_off"]);
}

#[test]
fn test_program_end_skips_motion() {
    let mut emu = emulator();
    emu.write(b"F600 M30 X5\n");
    assert_eq!(names(&emu), vec!["set_speed"]);
    assert_eq!(emu.read().as_deref(), Some(OK_RESPONSE));
}

#[test]
fn test_inch_units_scale_moves() {
    let mut emu = emulator();
    emu.write(b"G20\ng1 x1 y1\n");
    let commands = emu.interpreter().commands();
    assert!(matches!(
        commands.last(),
        Some(LaserCommand::Move(x, y)) if *x == MILS_PER_INCH && *y == -MILS_PER_INCH
    ));
}

#[test]
fn test_comment_closed_by_line_end_dispatches_line() {
    let mut emu = emulator();
    emu.write(b"G1 X3 (move right\n");
    assert_eq!(emu.last_comment(), Some("move right"));
    assert_eq!(names(&emu), vec!["mode_compact", "move"]);
    assert_eq!(emu.read().as_deref(), Some(OK_RESPONSE));
}

#[test]
fn test_unterminated_comment_is_never_flushed() {
    let mut emu = emulator();
    emu.write(b"(unfinished");
    assert_eq!(emu.last_comment(), None);
    assert!(emu.pending_record().comment().is_none());
}

#[test]
fn test_custom_flips() {
    let config = EmulatorConfig {
        flip_x: -1.0,
        flip_y: 1.0,
        banner: String::new(),
    };
    let mut emu = GrblEmulator::with_config(RecordingInterpreter::new(), config);
    assert_eq!(emu.read(), None);
    emu.write(b"G1 X1 Y1\n");
    assert!(matches!(
        emu.interpreter().commands().last(),
        Some(LaserCommand::Move(x, y)) if *x == -MILS_PER_MM && *y == MILS_PER_MM
    ));
}

proptest! {
    #[test]
    fn prop_chunking_does_not_change_commands(split in 0usize..40) {
        let program = b"G21 G1 X10.5 Y-3 F1200 (cut)\nM3\nG0 X0 Y0\nM5\n";
        let split = split.min(program.len());

        let mut whole = emulator();
        whole.write(program);

        let mut chunked = emulator();
        chunked.write(&program[..split]);
        chunked.write(&program[split..]);

        let a: Vec<String> = whole.interpreter().commands().iter().map(|c| c.to_string()).collect();
        let b: Vec<String> = chunked.interpreter().commands().iter().map(|c| c.to_string()).collect();
        prop_assert_eq!(a, b);
    }
}
