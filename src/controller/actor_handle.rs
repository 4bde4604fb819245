//! ControllerHandle - public API of the joystick controller
//!
//! Input events are fire-and-forget. Mode changes, reconfiguration and
//! snapshots wait for the actor's answer through a oneshot channel.

use tokio::sync::{mpsc, oneshot};

use super::commands::ControllerCommand;
use super::ControllerSnapshot;
use crate::engine::{Direction, JoystickGeometry};
use crate::error::JoystickError;
use crate::geometry::Point;
use crate::joystick::JoystickSettings;

#[derive(Clone)]
pub struct ControllerHandle {
    cmd_tx: mpsc::UnboundedSender<ControllerCommand>,
}

impl ControllerHandle {
    pub fn new(cmd_tx: mpsc::UnboundedSender<ControllerCommand>) -> Self {
        Self { cmd_tx }
    }

    // =========================================================================
    // Input events (fire-and-forget)
    // =========================================================================

    pub fn touch_began(&self, touches: Vec<Point>) {
        let _ = self.cmd_tx.send(ControllerCommand::TouchBegan { touches });
    }

    pub fn touch_moved(&self, touches: Vec<Point>) {
        let _ = self.cmd_tx.send(ControllerCommand::TouchMoved { touches });
    }

    pub fn touch_ended(&self) {
        let _ = self.cmd_tx.send(ControllerCommand::TouchEnded);
    }

    pub fn touch_cancelled(&self) {
        let _ = self.cmd_tx.send(ControllerCommand::TouchCancelled);
    }

    pub fn step(&self, direction: Direction) {
        let _ = self.cmd_tx.send(ControllerCommand::Step { direction });
    }

    pub fn recenter(&self) {
        let _ = self.cmd_tx.send(ControllerCommand::Recenter);
    }

    /// Applies to the next event; restarts sampling if the cadence changed
    pub fn update_settings(&self, settings: JoystickSettings, sample_interval_ms: u64) {
        let _ = self.cmd_tx.send(ControllerCommand::UpdateSettings {
            settings,
            sample_interval_ms,
        });
    }

    // =========================================================================
    // Request-response
    // =========================================================================

    /// Turn tilt mode on or off
    ///
    /// Fails with [`JoystickError::SensorUnavailable`] when the device has no
    /// accelerometer; the joystick is left untouched in that case.
    pub async fn set_tilt_mode(&self, enabled: bool) -> Result<(), JoystickError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(ControllerCommand::SetTiltMode {
            enabled,
            response: response_tx,
        })?;
        response_rx.await.map_err(|_| JoystickError::ControllerClosed)?
    }

    /// Replace the geometry; refused while a session is engaged
    pub async fn configure(&self, geometry: JoystickGeometry) -> Result<(), JoystickError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(ControllerCommand::Configure {
            geometry,
            response: response_tx,
        })?;
        response_rx.await.map_err(|_| JoystickError::ControllerClosed)?
    }

    /// Current state, after every previously sent command has been applied
    pub async fn snapshot(&self) -> Result<ControllerSnapshot, JoystickError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(ControllerCommand::Snapshot {
            response: response_tx,
        })?;
        response_rx.await.map_err(|_| JoystickError::ControllerClosed)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn is_alive(&self) -> bool {
        !self.cmd_tx.is_closed()
    }

    /// Stop the actor; the thumb is released first
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(ControllerCommand::Shutdown);
    }

    fn send(&self, cmd: ControllerCommand) -> Result<(), JoystickError> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| JoystickError::ControllerClosed)
    }
}
