use k40kit_communication::firmware::grbl::status_parser::*;
use k40kit_communication::GrblEmulator;
use k40kit_core::{Interpreter, InterpreterState, LaserCommand, RecordingInterpreter, MILS_PER_MM};

#[test]
fn test_status_reports_user_units() {
    let mut interp = RecordingInterpreter::new();
    interp.command(LaserCommand::Move(10.0 * MILS_PER_MM, 20.0 * MILS_PER_MM));
    interp.command(LaserCommand::SetSpeed(500.0 / 60.0));
    interp.command(LaserCommand::SetPower(750.0));
    interp.set_state(InterpreterState::Busy);

    let mut emu = GrblEmulator::new(interp);
    emu.read();
    emu.write(b"?");
    let line = emu.read().unwrap();
    let report = StatusReport::parse(&line).unwrap();

    assert_eq!(report.state, "Busy");
    assert!((report.mpos.0 - 10.0).abs() < 1e-9);
    assert!((report.mpos.1 - 20.0).abs() < 1e-9);
    assert_eq!(report.mpos.2, 0.0);
    assert!((report.feed - 500.0).abs() < 1e-6);
    assert_eq!(report.power, 750);
    assert!(line.ends_with(">\r\n"));
}

#[test]
fn test_status_roundtrips_through_format() {
    let report = StatusReport {
        state: "Idle".to_string(),
        mpos: (1.25, -3.5, 0.0),
        feed: 12.0,
        power: 0,
    };
    assert_eq!(StatusReport::parse(&report.format()), Some(report));
}
