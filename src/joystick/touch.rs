//! Touch-tracking session (finger drag)

use tracing::{debug, trace};

use super::delegate::{JoystickDelegate, MovementEvent};
use super::thumb::ThumbState;
use crate::engine::{
    classify_direction, is_valid, lock_to_axis, percentage_of_travel, Direction, JoystickGeometry,
};
use crate::geometry::Point;

/// Touch session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    /// Finger down but no point accepted yet
    Idle,
    /// At least one point accepted; the thumb follows the finger
    Tracking,
}

#[derive(Debug)]
pub struct TouchSession {
    thumb: ThumbState,
    phase: TouchPhase,
}

impl TouchSession {
    pub fn new(thumb: ThumbState) -> Self {
        Self {
            thumb,
            phase: TouchPhase::Idle,
        }
    }

    pub fn phase(&self) -> TouchPhase {
        self.phase
    }

    pub fn thumb(&self) -> &ThumbState {
        &self.thumb
    }

    pub fn into_thumb(self) -> ThumbState {
        self.thumb
    }

    /// Handle a touch began/moved event
    ///
    /// Only the first touch is read. Out-of-frame points are dropped without
    /// any state change or notification.
    pub fn track<D: JoystickDelegate>(
        &mut self,
        geometry: &JoystickGeometry,
        tolerance: f64,
        touches: &[Point],
        delegate: &mut D,
    ) -> Option<MovementEvent> {
        let &point = touches.first()?;
        if touches.len() > 1 {
            trace!(ignored = touches.len() - 1, "extra touches ignored");
        }

        let direction = classify_direction(geometry.center(), point, tolerance);
        // None re-centers, so its candidate is the center itself
        let candidate = match direction {
            Direction::None => geometry.center(),
            _ => point,
        };
        if !is_valid(geometry, candidate, direction) {
            debug!(%point, %direction, "touch out of frame, ignored");
            return None;
        }

        self.thumb.move_to(lock_to_axis(geometry, point, direction));
        self.phase = TouchPhase::Tracking;

        let event = MovementEvent::new(direction, percentage_of_travel(geometry, point));
        trace!(%point, %direction, percentage = event.percentage, "touch tracked");
        delegate.on_move_in(event);
        Some(event)
    }

    /// Handle touch ended/cancelled; returns whether `on_end_moving` fired
    pub fn end<D: JoystickDelegate>(
        &mut self,
        geometry: &JoystickGeometry,
        delegate: &mut D,
    ) -> bool {
        self.thumb.reset(geometry);
        match self.phase {
            TouchPhase::Tracking => {
                self.phase = TouchPhase::Idle;
                delegate.on_end_moving();
                true
            }
            TouchPhase::Idle => false,
        }
    }
}
