//! Joystick controller - serializes all input onto one task
//!
//! The UI layer, the replay script and the accelerometer sampler never touch
//! the [`Joystick`](crate::joystick::Joystick) directly; they talk to a
//! [`ControllerHandle`] which forwards commands to the [`ControllerActor`].

mod actor;
mod actor_handle;
mod commands;

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::joystick::JoystickSnapshot;

pub use actor::{BoxedDelegate, ControllerActor};
pub use actor_handle::ControllerHandle;
pub use commands::ControllerCommand;

/// Joystick state plus the controller's own bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    #[serde(flatten)]
    pub joystick: JoystickSnapshot,
    /// Bumped every time a sampler starts or stops
    pub tilt_epoch: u64,
    pub sampling: bool,
}
