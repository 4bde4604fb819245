//! Tests for Joystick session switching

use super::*;
use crate::joystick::delegate::{DelegateCall, RecordingDelegate};

fn make_joystick() -> (Joystick<RecordingDelegate>, RecordingDelegate) {
    let geometry = JoystickGeometry::new(Point::new(100.0, 100.0), 80.0, 20.0).unwrap();
    let recorder = RecordingDelegate::default();
    let joystick = Joystick::new(geometry, JoystickSettings::default(), recorder.clone());
    (joystick, recorder)
}

fn tilt(x: f64, y: f64) -> Acceleration {
    Acceleration { x, y, z: 0.0 }
}

#[test]
fn test_touch_gesture_round_trip() {
    let (mut joystick, recorder) = make_joystick();

    assert_eq!(joystick.mode(), InputMode::Idle);
    let event = joystick.touch_began(&[Point::new(100.0, 40.0)]).unwrap();
    assert_eq!(event.direction, Direction::Up);
    assert_eq!(joystick.mode(), InputMode::Touch);
    assert!(joystick.is_engaged());

    joystick.touch_moved(&[Point::new(130.0, 100.0)]).unwrap();
    assert_eq!(joystick.thumb_center(), Point::new(130.0, 100.0));

    assert!(joystick.touch_ended());
    assert_eq!(joystick.mode(), InputMode::Idle);
    assert_eq!(joystick.thumb_center(), Point::new(100.0, 100.0));
    assert_eq!(recorder.calls().len(), 3);
    assert_eq!(recorder.calls().last(), Some(&DelegateCall::EndMoving));
}

#[test]
fn test_double_end_emits_once() {
    let (mut joystick, recorder) = make_joystick();

    joystick.touch_began(&[Point::new(100.0, 60.0)]);
    assert!(joystick.touch_ended());
    assert!(!joystick.touch_cancelled());
    assert!(!joystick.recenter());

    assert_eq!(joystick.thumb_center(), joystick.geometry().center());
    assert_eq!(recorder.end_count(), 1);
}

#[test]
fn test_rejected_touch_then_end_is_silent() {
    let (mut joystick, recorder) = make_joystick();

    assert!(joystick.touch_began(&[Point::new(100.0, 10.0)]).is_none());
    assert!(!joystick.is_engaged());
    assert!(!joystick.touch_ended());
    assert!(recorder.calls().is_empty());
}

#[test]
fn test_tilt_mode_gates_touch_and_step() {
    let (mut joystick, recorder) = make_joystick();

    assert!(joystick.set_tilt_mode(true));
    assert_eq!(recorder.calls(), vec![DelegateCall::EndMoving]);

    assert!(joystick.touch_began(&[Point::new(100.0, 40.0)]).is_none());
    assert!(joystick.step(Direction::Up).is_none());
    assert_eq!(recorder.calls().len(), 1);

    // Turning it on again is a no-op
    assert!(!joystick.set_tilt_mode(true));
    assert_eq!(recorder.end_count(), 1);
}

#[test]
fn test_tilt_samples_only_in_tilt_mode() {
    let (mut joystick, recorder) = make_joystick();

    assert!(joystick.on_sample(tilt(0.5, 0.0)).is_none());
    assert!(recorder.calls().is_empty());

    joystick.set_tilt_mode(true);
    let outcome = joystick.on_sample(tilt(0.5, 0.0)).unwrap();
    assert!(matches!(outcome, SampleOutcome::Moved(_)));
    assert_eq!(joystick.thumb_center(), Point::new(102.0, 100.0));

    assert!(joystick.set_tilt_mode(false));
    assert_eq!(joystick.mode(), InputMode::Idle);
    assert_eq!(joystick.thumb_center(), Point::new(100.0, 100.0));
    assert_eq!(recorder.end_count(), 2);
    assert!(joystick.on_sample(tilt(0.5, 0.0)).is_none());
}

#[test]
fn test_switching_touch_to_tilt_resets_and_notifies_once() {
    let (mut joystick, recorder) = make_joystick();

    joystick.touch_began(&[Point::new(100.0, 150.0)]).unwrap();
    recorder.clear();

    joystick.set_tilt_mode(true);

    assert_eq!(recorder.calls(), vec![DelegateCall::EndMoving]);
    assert_eq!(joystick.mode(), InputMode::Tilt);
    assert!(joystick.snapshot().thumb_center == Point::new(100.0, 100.0));

    // The old finger lifting later must not emit again
    assert!(!joystick.touch_ended());
    assert_eq!(recorder.end_count(), 1);
}

#[test]
fn test_step_then_touch_switches_mode() {
    let (mut joystick, recorder) = make_joystick();

    for _ in 0..3 {
        joystick.step(Direction::Left).unwrap();
    }
    assert_eq!(joystick.mode(), InputMode::Step);
    assert_eq!(joystick.thumb_center(), Point::new(97.0, 100.0));

    joystick.touch_began(&[Point::new(100.0, 130.0)]).unwrap();

    assert_eq!(joystick.mode(), InputMode::Touch);
    let calls = recorder.calls();
    assert_eq!(calls[3], DelegateCall::EndMoving);
    assert!(matches!(calls[4], DelegateCall::MoveIn(e) if e.direction == Direction::Down));
}

#[test]
fn test_step_ignored_while_touching() {
    let (mut joystick, _recorder) = make_joystick();

    joystick.touch_began(&[Point::new(60.0, 100.0)]).unwrap();
    assert!(joystick.step(Direction::Right).is_none());
    assert_eq!(joystick.thumb_center(), Point::new(60.0, 100.0));
}

#[test]
fn test_recenter_keeps_tilt_mode() {
    let (mut joystick, recorder) = make_joystick();

    joystick.set_tilt_mode(true);
    joystick.on_sample(tilt(0.0, 0.5)).unwrap();
    assert_ne!(joystick.thumb_center(), Point::new(100.0, 100.0));

    assert!(joystick.recenter());
    assert_eq!(joystick.mode(), InputMode::Tilt);
    assert_eq!(joystick.thumb_center(), Point::new(100.0, 100.0));
    assert_eq!(recorder.end_count(), 2);
}

#[test]
fn test_recenter_ends_step_session() {
    let (mut joystick, recorder) = make_joystick();

    joystick.step(Direction::Down).unwrap();
    assert!(joystick.recenter());
    assert_eq!(joystick.mode(), InputMode::Idle);
    assert_eq!(recorder.end_count(), 1);
}

#[test]
fn test_configure_refused_while_engaged() {
    let (mut joystick, _recorder) = make_joystick();
    let bigger = JoystickGeometry::new(Point::new(150.0, 150.0), 120.0, 30.0).unwrap();

    joystick.touch_began(&[Point::new(100.0, 60.0)]).unwrap();
    assert_eq!(
        joystick.configure(bigger),
        Err(JoystickError::SessionActive(InputMode::Touch))
    );

    joystick.touch_ended();
    joystick.configure(bigger).unwrap();
    assert_eq!(joystick.geometry(), &bigger);
    assert_eq!(joystick.thumb_center(), Point::new(150.0, 150.0));
}

#[test]
fn test_configure_allowed_after_rejected_step() {
    let (mut joystick, _recorder) = make_joystick();

    // Huge unit: first step already leaves the circle
    joystick.set_settings(JoystickSettings {
        step_unit: 500.0,
        ..JoystickSettings::default()
    });
    assert!(joystick.step(Direction::Up).is_none());
    assert_eq!(joystick.mode(), InputMode::Step);
    assert!(!joystick.is_engaged());

    let other = JoystickGeometry::new(Point::new(0.0, 0.0), 50.0, 10.0).unwrap();
    assert!(joystick.configure(other).is_ok());
    assert_eq!(joystick.mode(), InputMode::Idle);
}

#[test]
fn test_snapshot_reports_travel() {
    let (mut joystick, _recorder) = make_joystick();

    let snap = joystick.snapshot();
    assert_eq!(snap.mode, InputMode::Idle);
    assert!(!snap.engaged);
    assert_eq!(snap.percentage, 0.25);

    joystick.touch_began(&[Point::new(100.0, 60.0)]).unwrap();
    let snap = joystick.snapshot();
    assert_eq!(snap.mode, InputMode::Touch);
    assert!(snap.engaged);
    assert_eq!(snap.percentage, 0.75);
}
