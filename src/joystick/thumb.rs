//! Thumb position owned by the active session

use crate::engine::JoystickGeometry;
use crate::geometry::Point;

/// Current thumb center
///
/// Exactly one session owns this value at a time; it moves between sessions
/// when the input mode changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbState {
    current_center: Point,
}

impl ThumbState {
    /// Thumb resting on the geometric center
    pub fn at_rest(geometry: &JoystickGeometry) -> Self {
        Self {
            current_center: geometry.center(),
        }
    }

    pub fn current_center(&self) -> Point {
        self.current_center
    }

    pub fn is_at_rest(&self, geometry: &JoystickGeometry) -> bool {
        self.current_center == geometry.center()
    }

    pub(crate) fn move_to(&mut self, center: Point) {
        self.current_center = center;
    }

    pub(crate) fn reset(&mut self, geometry: &JoystickGeometry) {
        self.current_center = geometry.center();
    }
}
