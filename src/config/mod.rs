//! Configuration for the joystick runtime
//!
//! Handles loading, validating and hot-reloading the YAML configuration.
//! Every field has a default, so an empty file is a valid configuration.

pub mod watcher;

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

use crate::drivers::DriveSettings;
use crate::engine::{JoystickGeometry, DEFAULT_DIRECTION_TOLERANCE};
use crate::geometry::Point;
use crate::joystick::{JoystickSettings, TiltSettings, DEFAULT_STEP_UNIT};
use crate::sensor::{
    AccelerometerSource, Acceleration, ScriptedAccelerometer, SourceFactory,
    UnavailableAccelerometer, DEFAULT_SAMPLE_INTERVAL_MS,
};

pub use watcher::ConfigWatcher;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct AppConfig {
    #[serde(default)]
    pub joystick: JoystickConfig,
    #[serde(default)]
    pub tilt: TiltConfig,
    #[serde(default)]
    pub step: StepConfig,
    #[serde(default)]
    pub drive: DriveSettings,
    /// Scripted accelerometer; without it the device has no tilt input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor: Option<SensorConfig>,
}

/// Widget geometry and touch classification
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct JoystickConfig {
    #[serde(default = "default_center")]
    pub center: Point,
    #[serde(default = "default_outer_radius")]
    pub outer_radius: f64,
    #[serde(default = "default_thumb_radius")]
    pub thumb_radius: f64,
    /// Half-width of the axis bands used to classify touches
    #[serde(default = "default_direction_tolerance")]
    pub direction_tolerance: f64,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            center: default_center(),
            outer_radius: default_outer_radius(),
            thumb_radius: default_thumb_radius(),
            direction_tolerance: default_direction_tolerance(),
        }
    }
}

/// Accelerometer cadence and thresholds
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct TiltConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(flatten)]
    pub thresholds: TiltSettings,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            thresholds: TiltSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct StepConfig {
    #[serde(default = "default_step_unit")]
    pub unit: f64,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            unit: default_step_unit(),
        }
    }
}

/// Readings played back while tilt mode is on
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct SensorConfig {
    #[serde(default)]
    pub samples: Vec<Acceleration>,
    #[serde(default = "default_true")]
    pub looping: bool,
}

impl SensorConfig {
    fn factory(&self) -> SourceFactory {
        let samples = self.samples.clone();
        let looping = self.looping;
        Box::new(move || -> Box<dyn AccelerometerSource> {
            Box::new(ScriptedAccelerometer::new(samples.clone(), looping))
        })
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Parse and validate YAML text
    pub fn from_yaml(contents: &str) -> Result<Self> {
        // serde_yaml rejects an empty document; treat it as all defaults
        let config: AppConfig = if contents.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        self.geometry()?;

        let tolerance = self.joystick.direction_tolerance;
        if !(tolerance.is_finite() && tolerance > 0.0) {
            anyhow::bail!("joystick.direction_tolerance must be positive (got {})", tolerance);
        }

        if self.tilt.interval_ms == 0 {
            anyhow::bail!("tilt.interval_ms must be at least 1");
        }
        let t = &self.tilt.thresholds;
        if !(t.dead_zone >= 0.0 && t.dead_zone < t.max_magnitude) {
            anyhow::bail!(
                "tilt.dead_zone ({}) must be non-negative and below tilt.max_magnitude ({})",
                t.dead_zone,
                t.max_magnitude
            );
        }
        if !(t.lock_band > 0.0) {
            anyhow::bail!("tilt.lock_band must be positive (got {})", t.lock_band);
        }

        if !(self.step.unit.is_finite() && self.step.unit > 0.0) {
            anyhow::bail!("step.unit must be positive (got {})", self.step.unit);
        }

        let d = &self.drive;
        if d.max_range <= 0 {
            anyhow::bail!("drive.max_range must be positive (got {})", d.max_range);
        }
        if d.haptic_margin < 0 || d.haptic_margin > d.max_range {
            anyhow::bail!(
                "drive.haptic_margin must be within 0..={} (got {})",
                d.max_range,
                d.haptic_margin
            );
        }
        if !(d.full_ratio > 0.0 && d.full_ratio <= 1.0) {
            anyhow::bail!("drive.full_ratio must be in (0, 1] (got {})", d.full_ratio);
        }

        Ok(())
    }

    pub fn geometry(&self) -> Result<JoystickGeometry> {
        let j = &self.joystick;
        JoystickGeometry::new(j.center, j.outer_radius, j.thumb_radius)
            .context("Invalid joystick geometry")
    }

    pub fn settings(&self) -> JoystickSettings {
        JoystickSettings {
            direction_tolerance: self.joystick.direction_tolerance,
            step_unit: self.step.unit,
            tilt: self.tilt.thresholds,
        }
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.tilt.interval_ms)
    }

    /// Accelerometer for tilt mode
    pub fn source_factory(&self) -> SourceFactory {
        match &self.sensor {
            Some(sensor) => sensor.factory(),
            None => Box::new(|| -> Box<dyn AccelerometerSource> {
                Box::new(UnavailableAccelerometer)
            }),
        }
    }

    /// JSON schema of the configuration file
    pub fn json_schema() -> Result<String> {
        let schema = schemars::schema_for!(AppConfig);
        serde_json::to_string_pretty(&schema).context("Failed to serialize config schema")
    }
}

fn default_center() -> Point { Point::new(100.0, 100.0) }
fn default_outer_radius() -> f64 { 80.0 }
fn default_thumb_radius() -> f64 { 20.0 }
fn default_direction_tolerance() -> f64 { DEFAULT_DIRECTION_TOLERANCE }
fn default_interval_ms() -> u64 { DEFAULT_SAMPLE_INTERVAL_MS }
fn default_step_unit() -> f64 { DEFAULT_STEP_UNIT }
fn default_true() -> bool { true }
