//! Discrete-step session (arrow buttons, key repeat)

use tracing::debug;

use super::delegate::{JoystickDelegate, MovementEvent};
use super::thumb::ThumbState;
use crate::engine::{is_valid, lock_to_axis, percentage_of_travel, Direction, JoystickGeometry};

pub const DEFAULT_STEP_UNIT: f64 = 1.0;

#[derive(Debug)]
pub struct StepSession {
    thumb: ThumbState,
}

impl StepSession {
    pub fn new(thumb: ThumbState) -> Self {
        Self { thumb }
    }

    pub fn thumb(&self) -> &ThumbState {
        &self.thumb
    }

    pub fn into_thumb(self) -> ThumbState {
        self.thumb
    }

    /// Nudge the thumb one `unit` towards `direction`
    ///
    /// `Direction::None` snaps back to the center. A step that would push the
    /// thumb past the rim is a silent no-op.
    pub fn step<D: JoystickDelegate>(
        &mut self,
        geometry: &JoystickGeometry,
        unit: f64,
        direction: Direction,
        delegate: &mut D,
    ) -> Option<MovementEvent> {
        let candidate = match direction {
            Direction::None => geometry.center(),
            _ => {
                let (ux, uy) = direction.unit();
                self.thumb.current_center().offset(ux * unit, uy * unit)
            }
        };

        if !is_valid(geometry, candidate, direction) {
            debug!(%candidate, %direction, "step out of frame, ignored");
            return None;
        }

        let locked = lock_to_axis(geometry, candidate, direction);
        self.thumb.move_to(locked);

        let event = MovementEvent::new(direction, percentage_of_travel(geometry, locked));
        delegate.on_move_in(event);
        Some(event)
    }
}
