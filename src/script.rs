//! Scripted input replay
//!
//! A replay script is a YAML list of input events pushed through a
//! [`ControllerHandle`], e.g.
//!
//! ```yaml
//! name: nudge and tilt
//! events:
//!   - { event: touch_began, touches: [{ x: 100, y: 40 }] }
//!   - { event: touch_ended }
//!   - { event: step, direction: right, repeat: 10 }
//!   - { event: tilt, enabled: true }
//!   - { event: wait, ms: 250 }
//!   - { event: tilt, enabled: false }
//! ```

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

use crate::controller::{ControllerHandle, ControllerSnapshot};
use crate::engine::Direction;
use crate::error::JoystickError;
use crate::geometry::Point;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    TouchBegan { touches: Vec<Point> },
    TouchMoved { touches: Vec<Point> },
    TouchEnded,
    TouchCancelled,
    Tilt { enabled: bool },
    Step {
        direction: Direction,
        #[serde(default = "default_repeat")]
        repeat: u32,
    },
    Recenter,
    Wait { ms: u64 },
}

fn default_repeat() -> u32 {
    1
}

impl ScriptEvent {
    /// Send this event to the controller
    ///
    /// Only tilt toggling waits for the controller; `wait` sleeps.
    pub async fn apply(&self, handle: &ControllerHandle) -> Result<(), JoystickError> {
        match self {
            ScriptEvent::TouchBegan { touches } => handle.touch_began(touches.clone()),
            ScriptEvent::TouchMoved { touches } => handle.touch_moved(touches.clone()),
            ScriptEvent::TouchEnded => handle.touch_ended(),
            ScriptEvent::TouchCancelled => handle.touch_cancelled(),
            ScriptEvent::Tilt { enabled } => handle.set_tilt_mode(*enabled).await?,
            ScriptEvent::Step { direction, repeat } => {
                for _ in 0..*repeat {
                    handle.step(*direction);
                }
            }
            ScriptEvent::Recenter => handle.recenter(),
            ScriptEvent::Wait { ms } => tokio::time::sleep(Duration::from_millis(*ms)).await,
        }
        if handle.is_alive() {
            Ok(())
        } else {
            Err(JoystickError::ControllerClosed)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ReplayScript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl ReplayScript {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read replay script: {}", path.display()))?;

        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse replay script: {}", path.display()))
    }

    /// Replay every event in order and return the final controller state
    pub async fn run(&self, handle: &ControllerHandle) -> Result<ControllerSnapshot> {
        let label = self.name.as_deref().unwrap_or("unnamed");
        info!(script = label, events = self.events.len(), "replaying input script");

        for (index, event) in self.events.iter().enumerate() {
            debug!(index, ?event, "script event");
            event
                .apply(handle)
                .await
                .with_context(|| format!("Script '{}' failed at event #{}", label, index + 1))?;
        }

        let snapshot = handle
            .snapshot()
            .await
            .context("Failed to read final joystick state")?;
        info!(
            script = label,
            mode = %snapshot.joystick.mode,
            thumb = %snapshot.joystick.thumb_center,
            "replay finished"
        );
        Ok(snapshot)
    }
}
