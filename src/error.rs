//! Library error type

use thiserror::Error;

use crate::joystick::InputMode;

/// Errors surfaced by the joystick library
///
/// The mapping engine itself never fails: ambiguous or out-of-frame input
/// resolves to `Direction::None` or a rejected update. These errors only come
/// from configuration, mode switching and the controller plumbing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JoystickError {
    #[error("joystick geometry values must be finite and positive (outer radius {outer}, thumb radius {thumb})")]
    NonPositiveGeometry { outer: f64, thumb: f64 },

    #[error("thumb radius {thumb} must be smaller than outer radius {outer}")]
    ThumbTooLarge { outer: f64, thumb: f64 },

    #[error("accelerometer '{0}' is not available")]
    SensorUnavailable(String),

    #[error("cannot reconfigure the joystick while {0} input is active")]
    SessionActive(InputMode),

    #[error("unknown direction '{0}' (expected none, up, down, left or right)")]
    UnknownDirection(String),

    #[error("joystick controller is not running")]
    ControllerClosed,
}
