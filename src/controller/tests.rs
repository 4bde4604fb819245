//! Controller actor tests

use std::time::Duration;

use super::*;
use crate::engine::{Direction, JoystickGeometry};
use crate::error::JoystickError;
use crate::geometry::Point;
use crate::joystick::delegate::{DelegateCall, RecordingDelegate};
use crate::joystick::{InputMode, JoystickSettings};
use crate::sensor::{
    AccelerometerSource, Acceleration, ChannelAccelerometer, ScriptedAccelerometer,
    SourceFactory, UnavailableAccelerometer,
};
use tokio::sync::mpsc;

fn geometry() -> JoystickGeometry {
    JoystickGeometry::new(Point::new(100.0, 100.0), 80.0, 20.0).unwrap()
}

fn spawn_with(sources: SourceFactory) -> (ControllerHandle, RecordingDelegate) {
    spawn_with_interval(sources, Duration::from_millis(1))
}

fn spawn_with_interval(
    sources: SourceFactory,
    sample_interval: Duration,
) -> (ControllerHandle, RecordingDelegate) {
    let recorder = RecordingDelegate::default();
    let handle = ControllerActor::spawn(
        geometry(),
        JoystickSettings::default(),
        Box::new(recorder.clone()),
        sources,
        sample_interval,
    );
    (handle, recorder)
}

fn spawn_with_channel() -> (
    ControllerHandle,
    RecordingDelegate,
    mpsc::UnboundedSender<Acceleration>,
) {
    let (tx, source) = ChannelAccelerometer::channel();
    let (handle, recorder) = spawn_with(Box::new(move || -> Box<dyn AccelerometerSource> {
        Box::new(source.clone())
    }));
    (handle, recorder, tx)
}

fn no_sensor() -> SourceFactory {
    Box::new(|| -> Box<dyn AccelerometerSource> { Box::new(UnavailableAccelerometer) })
}

async fn wait_for(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn test_touch_events_reach_delegate_in_order() {
    let (handle, recorder) = spawn_with(no_sensor());

    handle.touch_began(vec![Point::new(100.0, 40.0)]);
    handle.touch_moved(vec![Point::new(100.0, 10.0)]); // out of frame
    handle.touch_moved(vec![Point::new(140.0, 100.0)]);

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.joystick.mode, InputMode::Touch);
    assert_eq!(snap.joystick.thumb_center, Point::new(140.0, 100.0));

    handle.touch_ended();
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.joystick.mode, InputMode::Idle);

    let calls = recorder.calls();
    assert_eq!(calls.len(), 3);
    assert!(matches!(calls[0], DelegateCall::MoveIn(e) if e.direction == Direction::Up));
    assert!(matches!(calls[1], DelegateCall::MoveIn(e) if e.direction == Direction::Right));
    assert_eq!(calls[2], DelegateCall::EndMoving);
}

#[tokio::test]
async fn test_tilt_unavailable_leaves_joystick_alone() {
    let (handle, recorder) = spawn_with(no_sensor());

    let result = handle.set_tilt_mode(true).await;

    assert_eq!(
        result,
        Err(JoystickError::SensorUnavailable("unavailable".to_string()))
    );
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.joystick.mode, InputMode::Idle);
    assert!(!snap.sampling);
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_tilt_samples_move_thumb() {
    let (handle, recorder, samples) = spawn_with_channel();

    handle.set_tilt_mode(true).await.unwrap();
    assert_eq!(recorder.calls(), vec![DelegateCall::EndMoving]);

    samples.send(Acceleration::planar(0.0, 0.5)).unwrap();
    wait_for(|| recorder.moves().len() == 1).await;

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.joystick.mode, InputMode::Tilt);
    assert!(snap.sampling);
    assert_eq!(snap.joystick.thumb_center, Point::new(100.0, 98.0));
    assert_eq!(recorder.moves()[0].direction, Direction::Up);
}

#[tokio::test]
async fn test_tilt_mode_ignores_touch_and_step() {
    let (handle, recorder, _samples) = spawn_with_channel();

    handle.set_tilt_mode(true).await.unwrap();
    handle.touch_began(vec![Point::new(100.0, 40.0)]);
    handle.step(Direction::Left);

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.joystick.thumb_center, Point::new(100.0, 100.0));
    assert!(recorder.moves().is_empty());
}

#[tokio::test]
async fn test_tilt_off_stops_sampling() {
    let (handle, recorder, samples) = spawn_with_channel();

    handle.set_tilt_mode(true).await.unwrap();
    let on = handle.snapshot().await.unwrap();
    samples.send(Acceleration::planar(0.5, 0.0)).unwrap();
    wait_for(|| recorder.moves().len() == 1).await;

    handle.set_tilt_mode(false).await.unwrap();
    let off = handle.snapshot().await.unwrap();
    assert!(off.tilt_epoch > on.tilt_epoch);
    assert!(!off.sampling);
    assert_eq!(off.joystick.mode, InputMode::Idle);
    assert_eq!(off.joystick.thumb_center, Point::new(100.0, 100.0));

    samples.send(Acceleration::planar(0.5, 0.0)).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let after = handle.snapshot().await.unwrap();
    assert_eq!(after.joystick.thumb_center, Point::new(100.0, 100.0));
    assert_eq!(recorder.moves().len(), 1);
    assert_eq!(recorder.end_count(), 2);
}

#[tokio::test]
async fn test_tilt_toggle_is_idempotent() {
    let (handle, recorder, _samples) = spawn_with_channel();

    handle.set_tilt_mode(false).await.unwrap();
    handle.set_tilt_mode(true).await.unwrap();
    handle.set_tilt_mode(true).await.unwrap();

    handle.snapshot().await.unwrap();
    assert_eq!(recorder.end_count(), 1);
}

#[tokio::test]
async fn test_configure_refused_while_touching() {
    let (handle, _recorder) = spawn_with(no_sensor());
    let resized = JoystickGeometry::new(Point::new(200.0, 200.0), 100.0, 25.0).unwrap();

    handle.touch_began(vec![Point::new(100.0, 60.0)]);
    assert_eq!(
        handle.configure(resized).await,
        Err(JoystickError::SessionActive(InputMode::Touch))
    );

    handle.touch_ended();
    handle.configure(resized).await.unwrap();

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.joystick.geometry, resized);
    assert_eq!(snap.joystick.thumb_center, Point::new(200.0, 200.0));
}

#[tokio::test]
async fn test_update_settings_changes_step_unit() {
    let (handle, recorder) = spawn_with(no_sensor());

    handle.update_settings(
        JoystickSettings {
            step_unit: 5.0,
            ..JoystickSettings::default()
        },
        1,
    );
    handle.step(Direction::Right);
    handle.step(Direction::Right);

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.joystick.mode, InputMode::Step);
    assert_eq!(snap.joystick.thumb_center, Point::new(110.0, 100.0));
    assert_eq!(recorder.moves().len(), 2);
}

#[tokio::test]
async fn test_recenter_through_handle() {
    let (handle, recorder) = spawn_with(no_sensor());

    handle.step(Direction::Up);
    handle.recenter();
    handle.recenter();

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.joystick.mode, InputMode::Idle);
    assert!(!snap.joystick.engaged);
    assert_eq!(recorder.end_count(), 1);
}

#[tokio::test]
async fn test_shutdown_releases_thumb_and_closes() {
    let (handle, recorder) = spawn_with(no_sensor());

    handle.touch_began(vec![Point::new(100.0, 150.0)]);
    handle.shutdown();

    wait_for(|| !handle.is_alive()).await;
    assert_eq!(recorder.end_count(), 1);
    assert_eq!(handle.snapshot().await, Err(JoystickError::ControllerClosed));
    assert_eq!(
        handle.set_tilt_mode(true).await,
        Err(JoystickError::ControllerClosed)
    );
}

#[tokio::test]
async fn test_zero_sample_interval_still_samples() {
    let (tx, source) = ChannelAccelerometer::channel();
    let (handle, recorder) = spawn_with_interval(
        Box::new(move || -> Box<dyn AccelerometerSource> { Box::new(source.clone()) }),
        Duration::ZERO,
    );

    handle.set_tilt_mode(true).await.unwrap();
    tx.send(Acceleration::planar(0.5, 0.0)).unwrap();
    wait_for(|| recorder.moves().len() == 1).await;

    let snap = handle.snapshot().await.unwrap();
    assert!(snap.sampling);
    assert_eq!(snap.joystick.thumb_center, Point::new(102.0, 100.0));
}

#[tokio::test]
async fn test_interval_change_does_not_replay_exhausted_source() {
    let (handle, recorder) = spawn_with(Box::new(|| -> Box<dyn AccelerometerSource> {
        Box::new(ScriptedAccelerometer::new(
            vec![Acceleration::planar(0.5, 0.0)],
            false,
        ))
    }));

    handle.set_tilt_mode(true).await.unwrap();
    wait_for(|| recorder.moves().len() == 1).await;

    let mut exhausted = handle.snapshot().await.unwrap();
    for _ in 0..200 {
        if !exhausted.sampling {
            break;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
        exhausted = handle.snapshot().await.unwrap();
    }
    assert!(!exhausted.sampling);

    handle.update_settings(JoystickSettings::default(), 3);
    tokio::time::sleep(Duration::from_millis(30)).await;

    let after = handle.snapshot().await.unwrap();
    assert_eq!(after.tilt_epoch, exhausted.tilt_epoch);
    assert!(!after.sampling);
    assert_eq!(after.joystick.mode, InputMode::Tilt);
    assert_eq!(recorder.moves().len(), 1);
}
