//! Tilt-tracking session (accelerometer driven)
//!
//! Each sample is reduced to a dominant-axis direction and a magnitude. The
//! magnitude is scaled by `outer_radius / thumb_radius` and added to the
//! *current* thumb center, so a steady tilt keeps pushing the thumb outwards
//! until it hits the rim.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::delegate::{JoystickDelegate, MovementEvent};
use super::thumb::ThumbState;
use crate::engine::{
    is_valid, percentage_of_travel, tilt_direction, Axis, Direction, JoystickGeometry,
};
use crate::geometry::{distance, Point};
use crate::sensor::Acceleration;

/// Tilt processing thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TiltSettings {
    /// Per-axis acceleration below which a sample counts as no input
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f64,
    /// Samples with planar magnitude at or above this are discarded
    #[serde(default = "default_max_magnitude")]
    pub max_magnitude: f64,
    /// Allowed drift of the locked coordinate away from the center axis
    #[serde(default = "default_lock_band")]
    pub lock_band: f64,
}

impl Default for TiltSettings {
    fn default() -> Self {
        Self {
            dead_zone: default_dead_zone(),
            max_magnitude: default_max_magnitude(),
            lock_band: default_lock_band(),
        }
    }
}

fn default_dead_zone() -> f64 {
    0.003
}

fn default_max_magnitude() -> f64 {
    1.0
}

fn default_lock_band() -> f64 {
    15.0
}

/// What a single sample did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// Both axes inside the dead zone; nothing happened
    DeadZone,
    /// Magnitude at or above the limit; discarded
    Saturated,
    /// Thumb moved and the delegate was notified
    Moved(MovementEvent),
    /// Position rejected; the delegate still got the last accepted event
    Clamped(MovementEvent),
}

/// Thumb travel produced by a tilt of `magnitude`
pub fn tilt_displacement(geometry: &JoystickGeometry, magnitude: f64) -> f64 {
    geometry.outer_radius() * magnitude / geometry.thumb_radius()
}

fn within_lock_band(
    geometry: &JoystickGeometry,
    candidate: Point,
    direction: Direction,
    band: f64,
) -> bool {
    let center = geometry.center();
    match direction.axis() {
        Some(Axis::Vertical) => (candidate.x - center.x).abs() < band,
        Some(Axis::Horizontal) => (candidate.y - center.y).abs() < band,
        None => false,
    }
}

#[derive(Debug)]
pub struct TiltSession {
    thumb: ThumbState,
    last_accepted: Option<MovementEvent>,
}

impl TiltSession {
    pub fn new(thumb: ThumbState) -> Self {
        Self {
            thumb,
            last_accepted: None,
        }
    }

    pub fn thumb(&self) -> &ThumbState {
        &self.thumb
    }

    pub fn into_thumb(self) -> ThumbState {
        self.thumb
    }

    pub fn last_accepted(&self) -> Option<MovementEvent> {
        self.last_accepted
    }

    /// Put the thumb back on the center without leaving tilt mode
    pub fn recenter(&mut self, geometry: &JoystickGeometry) {
        self.thumb.reset(geometry);
        self.last_accepted = None;
    }

    pub fn on_sample<D: JoystickDelegate>(
        &mut self,
        geometry: &JoystickGeometry,
        settings: &TiltSettings,
        sample: Acceleration,
        delegate: &mut D,
    ) -> SampleOutcome {
        let magnitude = distance(Point::ORIGIN, Point::new(sample.x, sample.y));

        let direction = tilt_direction(sample.x, sample.y, settings.dead_zone);
        if direction == Direction::None {
            return SampleOutcome::DeadZone;
        }

        if magnitude >= settings.max_magnitude {
            debug!(magnitude, "saturated accelerometer sample discarded");
            return SampleOutcome::Saturated;
        }

        let (ux, uy) = direction.unit();
        let travel = tilt_displacement(geometry, magnitude);
        let candidate = self.thumb.current_center().offset(ux * travel, uy * travel);

        let accepted = is_valid(geometry, candidate, direction)
            && within_lock_band(geometry, candidate, direction, settings.lock_band);

        if accepted {
            self.thumb.move_to(candidate);
            let event = MovementEvent::new(direction, percentage_of_travel(geometry, candidate));
            trace!(%candidate, %direction, percentage = event.percentage, "tilt moved thumb");
            self.last_accepted = Some(event);
            delegate.on_move_in(event);
            SampleOutcome::Moved(event)
        } else {
            // Delegate keeps receiving updates while the thumb is pinned
            let event = self.last_accepted.unwrap_or_else(|| {
                MovementEvent::new(
                    direction,
                    percentage_of_travel(geometry, self.thumb.current_center()),
                )
            });
            trace!(%candidate, %direction, "tilt candidate rejected, thumb held");
            delegate.on_move_in(event);
            SampleOutcome::Clamped(event)
        }
    }
}
