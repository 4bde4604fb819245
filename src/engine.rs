//! Direction & validity engine
//!
//! Pure functions that turn a raw point into a quantized [`Direction`], check
//! that the thumb stays inside the joystick circle, and compute the
//! percentage-of-travel reported to delegates.
//!
//! # Coordinate system
//!
//! Widget space, y grows downwards: a point above the center has a smaller `y`
//! and classifies as [`Direction::Up`].
//!
//! # Key Functions
//!
//! - [`classify_direction`]: axis-band classification of a touch point
//! - [`is_valid`]: thumb-radius projection + point-in-circle test
//! - [`percentage_of_travel`]: normalized distance from center (not clamped)
//! - [`tilt_direction`]: dominant-axis classification of an acceleration

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::JoystickError;
use crate::geometry::{distance, distance_squared, Point};

/// Half-width of the band around each axis inside which a touch snaps to it.
pub const DEFAULT_DIRECTION_TOLERANCE: f64 = 25.0;

/// Quantized joystick direction
///
/// `None` is both the idle state and the answer for ambiguous input
/// (center, diagonals, accelerometer dead zone).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

/// Axis a direction moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Direction {
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn axis(self) -> Option<Axis> {
        match self {
            Direction::Up | Direction::Down => Some(Axis::Vertical),
            Direction::Left | Direction::Right => Some(Axis::Horizontal),
            Direction::None => None,
        }
    }

    /// Unit vector in widget space
    pub fn unit(self) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::None => (0.0, 0.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::None => "none",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = JoystickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "stop" => Ok(Direction::None),
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            _ => Err(JoystickError::UnknownDirection(s.to_string())),
        }
    }
}

/// Joystick widget geometry
///
/// Invariant: both radii are finite and positive and
/// `thumb_radius < outer_radius`. Built only through [`JoystickGeometry::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JoystickGeometry {
    center: Point,
    outer_radius: f64,
    thumb_radius: f64,
}

impl JoystickGeometry {
    pub fn new(center: Point, outer_radius: f64, thumb_radius: f64) -> Result<Self, JoystickError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !center.is_finite() || !positive(outer_radius) || !positive(thumb_radius) {
            return Err(JoystickError::NonPositiveGeometry {
                outer: outer_radius,
                thumb: thumb_radius,
            });
        }
        if thumb_radius >= outer_radius {
            return Err(JoystickError::ThumbTooLarge {
                outer: outer_radius,
                thumb: thumb_radius,
            });
        }
        Ok(Self {
            center,
            outer_radius,
            thumb_radius,
        })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn thumb_radius(&self) -> f64 {
        self.thumb_radius
    }

    /// Point-in-circle test against the background circle, boundary inclusive
    pub fn contains(&self, point: Point) -> bool {
        distance_squared(point, self.center) <= self.outer_radius * self.outer_radius
    }
}

/// Classify a raw point relative to `center`
///
/// The vertical band is tested first, so a point inside both bands resolves
/// to `Up`/`Down`. Diagonal regions resolve to `None`.
pub fn classify_direction(center: Point, point: Point, tolerance: f64) -> Direction {
    let dx = point.x - center.x;
    let dy = point.y - center.y;

    if dx.abs() <= tolerance && point.y != center.y {
        if point.y >= center.y {
            Direction::Down
        } else {
            Direction::Up
        }
    } else if dy.abs() <= tolerance && point.x != center.x {
        if point.x > center.x {
            Direction::Right
        } else {
            Direction::Left
        }
    } else {
        Direction::None
    }
}

/// Point the thumb edge would reach for `candidate` moving in `direction`
///
/// The perpendicular coordinate is pinned to the geometric center.
/// `None` does not project.
pub fn project_thumb_edge(
    geometry: &JoystickGeometry,
    candidate: Point,
    direction: Direction,
) -> Point {
    let c = geometry.center;
    let r = geometry.thumb_radius;
    match direction {
        Direction::Up => Point::new(c.x, candidate.y - r),
        Direction::Down => Point::new(c.x, candidate.y + r),
        Direction::Left => Point::new(candidate.x - r, c.y),
        Direction::Right => Point::new(candidate.x + r, c.y),
        Direction::None => candidate,
    }
}

/// Whether `candidate` keeps the thumb inside the joystick circle
///
/// Never mutates and never fails. For `Direction::None` the candidate is
/// tested unprojected; callers use `None` to mean "re-center".
pub fn is_valid(geometry: &JoystickGeometry, candidate: Point, direction: Direction) -> bool {
    geometry.contains(project_thumb_edge(geometry, candidate, direction))
}

/// Thumb position for `point` with motion locked to the direction's axis
pub fn lock_to_axis(geometry: &JoystickGeometry, point: Point, direction: Direction) -> Point {
    let c = geometry.center;
    match direction.axis() {
        Some(Axis::Vertical) => Point::new(c.x, point.y),
        Some(Axis::Horizontal) => Point::new(point.x, c.y),
        None => c,
    }
}

/// `(distance(point, center) + thumb_radius) / outer_radius`
///
/// At rest this is `thumb_radius / outer_radius`. Not clamped: it exceeds 1.0
/// once the thumb edge passes the rim, so consumers must clamp.
pub fn percentage_of_travel(geometry: &JoystickGeometry, point: Point) -> f64 {
    (distance(point, geometry.center) + geometry.thumb_radius) / geometry.outer_radius
}

/// Classify an acceleration sample by its dominant axis
///
/// Samples with both components under `dead_zone` return `None`. The sign
/// mapping follows the device orientation (`ay < 0` is `Down`).
pub fn tilt_direction(ax: f64, ay: f64, dead_zone: f64) -> Direction {
    if ax.abs() < dead_zone && ay.abs() < dead_zone {
        Direction::None
    } else if ax.abs() > ay.abs() {
        if ax < 0.0 {
            Direction::Left
        } else {
            Direction::Right
        }
    } else if ay < 0.0 {
        Direction::Down
    } else {
        Direction::Up
    }
}
