//! Delegate contract between the joystick and the UI layer

use serde::Serialize;

use crate::engine::Direction;

/// Normalized movement reported to the delegate
///
/// `percentage` is `(distance + thumb_radius) / outer_radius` and may exceed
/// 1.0 near the rim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MovementEvent {
    pub direction: Direction,
    pub percentage: f64,
}

impl MovementEvent {
    pub fn new(direction: Direction, percentage: f64) -> Self {
        Self {
            direction,
            percentage,
        }
    }
}

/// Receiver of joystick notifications
///
/// Implemented by the UI collaborator and injected at construction. Calls are
/// made from the single control task, never concurrently.
pub trait JoystickDelegate {
    /// The thumb moved (or was held) in `event.direction`
    fn on_move_in(&mut self, event: MovementEvent);

    /// The gesture ended, was cancelled, or the input mode changed
    fn on_end_moving(&mut self);
}

impl<D: JoystickDelegate + ?Sized> JoystickDelegate for Box<D> {
    fn on_move_in(&mut self, event: MovementEvent) {
        (**self).on_move_in(event)
    }

    fn on_end_moving(&mut self) {
        (**self).on_end_moving()
    }
}

/// Fan-out: both delegates see every notification, first one first
impl<A: JoystickDelegate, B: JoystickDelegate> JoystickDelegate for (A, B) {
    fn on_move_in(&mut self, event: MovementEvent) {
        self.0.on_move_in(event);
        self.1.on_move_in(event);
    }

    fn on_end_moving(&mut self) {
        self.0.on_end_moving();
        self.1.on_end_moving();
    }
}

/// Discards every notification
impl JoystickDelegate for () {
    fn on_move_in(&mut self, _event: MovementEvent) {}

    fn on_end_moving(&mut self) {}
}

#[cfg(test)]
pub(crate) use recording::{DelegateCall, RecordingDelegate};
