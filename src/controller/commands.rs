//! Commands accepted by the joystick controller actor
//!
//! Input events are fire-and-forget; anything that can fail or that returns
//! data carries a oneshot responder.

use tokio::sync::oneshot;

use super::ControllerSnapshot;
use crate::engine::{Direction, JoystickGeometry};
use crate::error::JoystickError;
use crate::geometry::Point;
use crate::joystick::JoystickSettings;
use crate::sensor::Acceleration;

pub type Responder<T> = oneshot::Sender<T>;

#[derive(Debug)]
pub enum ControllerCommand {
    // -------------------------------------------------------------------------
    // Input events (no response)
    // -------------------------------------------------------------------------
    TouchBegan {
        touches: Vec<Point>,
    },
    TouchMoved {
        touches: Vec<Point>,
    },
    TouchEnded,
    TouchCancelled,
    Step {
        direction: Direction,
    },
    Recenter,

    /// Reading from the sampler task of tilt session `epoch`
    ///
    /// Dropped when `epoch` no longer matches the controller's current one.
    Sample {
        epoch: u64,
        sample: Acceleration,
    },

    // -------------------------------------------------------------------------
    // Request-response
    // -------------------------------------------------------------------------
    SetTiltMode {
        enabled: bool,
        response: Responder<Result<(), JoystickError>>,
    },
    Configure {
        geometry: JoystickGeometry,
        response: Responder<Result<(), JoystickError>>,
    },
    UpdateSettings {
        settings: JoystickSettings,
        sample_interval_ms: u64,
    },
    Snapshot {
        response: Responder<ControllerSnapshot>,
    },

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------
    Shutdown,
}

impl ControllerCommand {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ControllerCommand::TouchBegan { .. } => "touch_began",
            ControllerCommand::TouchMoved { .. } => "touch_moved",
            ControllerCommand::TouchEnded => "touch_ended",
            ControllerCommand::TouchCancelled => "touch_cancelled",
            ControllerCommand::Step { .. } => "step",
            ControllerCommand::Recenter => "recenter",
            ControllerCommand::Sample { .. } => "sample",
            ControllerCommand::SetTiltMode { .. } => "set_tilt_mode",
            ControllerCommand::Configure { .. } => "configure",
            ControllerCommand::UpdateSettings { .. } => "update_settings",
            ControllerCommand::Snapshot { .. } => "snapshot",
            ControllerCommand::Shutdown => "shutdown",
        }
    }
}
