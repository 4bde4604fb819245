//! Accelerometer sources feeding tilt mode
//!
//! A source is polled by a sampler task at a fixed cadence; every reading is
//! forwarded as a message to the joystick controller, which stays the single
//! owner of the thumb. Only the planar `x` / `y` components are consumed.

mod sampler;
mod scripted;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use sampler::{spawn_sampler, DEFAULT_SAMPLE_INTERVAL_MS, MIN_SAMPLE_INTERVAL};
pub use scripted::{ChannelAccelerometer, ScriptedAccelerometer, UnavailableAccelerometer};

/// One accelerometer reading, in g
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Acceleration {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Acceleration {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Reading with only the planar components set
    pub const fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

impl fmt::Display for Acceleration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}, {:.3}]", self.x, self.y, self.z)
    }
}

/// Device motion source
///
/// `read` yields the next reading, or `None` once the source is exhausted
/// (the sampler then stops on its own).
#[async_trait]
pub trait AccelerometerSource: Send {
    fn name(&self) -> &str;

    /// Checked before tilt mode is turned on
    fn is_available(&self) -> bool {
        true
    }

    async fn read(&mut self) -> Option<Acceleration>;
}

/// Builds a fresh source each time tilt mode is turned on
pub type SourceFactory = Box<dyn Fn() -> Box<dyn AccelerometerSource> + Send>;
