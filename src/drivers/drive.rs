//! Differential-drive mixer
//!
//! Turns joystick movement into left/right track speeds for a tracked robot:
//! the travel percentage is quantized to `0..=max_range`, then mapped onto the
//! two tracks according to the direction. Pushing forward drives both tracks,
//! sideways spins in place.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::engine::Direction;
use crate::joystick::{JoystickDelegate, MovementEvent};

/// Receives every mixer output (motor controller, network bridge, UI)
pub type DriveCallback = Arc<dyn Fn(&DriveOutput) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DriveSettings {
    /// Track speed at full travel
    #[serde(default = "default_max_range")]
    pub max_range: i32,
    /// Haptic pulse fires once `|left|` gets within this of `max_range`
    #[serde(default = "default_haptic_margin")]
    pub haptic_margin: i32,
    /// Fraction of `max_range` that counts as full travel
    #[serde(default = "default_full_ratio")]
    pub full_ratio: f64,
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            max_range: default_max_range(),
            haptic_margin: default_haptic_margin(),
            full_ratio: default_full_ratio(),
        }
    }
}

fn default_max_range() -> i32 {
    26
}

fn default_haptic_margin() -> i32 {
    2
}

fn default_full_ratio() -> f64 {
    0.85
}

/// Coarse travel indicator, e.g. for picking a background image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelLevel {
    Rest,
    Halfway,
    Full,
}

impl TravelLevel {
    pub fn classify(range: i32, settings: &DriveSettings) -> Self {
        let range = range.abs();
        let full = (f64::from(settings.max_range) * settings.full_ratio).floor() as i32;
        if range >= full {
            TravelLevel::Full
        } else if range >= settings.max_range / 2 {
            TravelLevel::Halfway
        } else {
            TravelLevel::Rest
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriveOutput {
    pub direction: Direction,
    pub left: i32,
    pub right: i32,
    pub level: TravelLevel,
    pub haptic: bool,
}

impl DriveOutput {
    fn stopped() -> Self {
        Self {
            direction: Direction::None,
            left: 0,
            right: 0,
            level: TravelLevel::Rest,
            haptic: false,
        }
    }
}

/// Quantize a travel percentage to `0..=max_range`
///
/// The percentage is not clamped upstream and may exceed 1.0 near the rim.
pub fn quantize_range(percentage: f64, max_range: i32) -> i32 {
    let raw = (percentage * f64::from(max_range)).floor();
    if raw.is_nan() {
        return 0;
    }
    (raw as i64).clamp(0, i64::from(max_range)) as i32
}

/// `(left, right)` track speeds for `direction` at `range`
pub fn track_speeds(direction: Direction, range: i32) -> (i32, i32) {
    match direction {
        Direction::Up => (range, range),
        Direction::Down => (-range, -range),
        Direction::Right => (range, -range),
        Direction::Left => (-range, range),
        Direction::None => (0, 0),
    }
}

pub struct DriveMixer {
    settings: DriveSettings,
    output: DriveOutput,
    callback: Option<DriveCallback>,
    pulses: u64,
}

impl DriveMixer {
    pub fn new(settings: DriveSettings) -> Self {
        Self {
            settings,
            output: DriveOutput::stopped(),
            callback: None,
            pulses: 0,
        }
    }

    pub fn with_callback(mut self, callback: DriveCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn settings(&self) -> &DriveSettings {
        &self.settings
    }

    pub fn output(&self) -> DriveOutput {
        self.output
    }

    /// Number of haptic pulses fired so far
    pub fn pulses(&self) -> u64 {
        self.pulses
    }

    fn publish(&self) {
        if let Some(callback) = &self.callback {
            callback(&self.output);
        }
    }
}

impl JoystickDelegate for DriveMixer {
    fn on_move_in(&mut self, event: MovementEvent) {
        let range = quantize_range(event.percentage, self.settings.max_range);
        let (left, right) = track_speeds(event.direction, range);

        let haptic = left.abs() > self.output.left.abs()
            && left.abs() >= self.settings.max_range - self.settings.haptic_margin;
        if haptic {
            self.pulses += 1;
            debug!(left, max_range = self.settings.max_range, "haptic pulse");
        }

        let level = match event.direction {
            Direction::None => TravelLevel::Rest,
            _ => TravelLevel::classify(left, &self.settings),
        };

        self.output = DriveOutput {
            direction: event.direction,
            left,
            right,
            level,
            haptic,
        };
        trace!(left, right, ?level, "drive tracks updated");
        self.publish();
    }

    fn on_end_moving(&mut self) {
        self.output = DriveOutput::stopped();
        trace!("drive tracks stopped");
        self.publish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn mixer() -> DriveMixer {
        DriveMixer::new(DriveSettings::default())
    }

    #[test]
    fn test_quantize_range_clamps() {
        assert_eq!(quantize_range(0.0, 26), 0);
        assert_eq!(quantize_range(0.5, 26), 13);
        assert_eq!(quantize_range(0.99, 26), 25);
        assert_eq!(quantize_range(1.0, 26), 26);
        assert_eq!(quantize_range(1.3, 26), 26);
        assert_eq!(quantize_range(-0.2, 26), 0);
        assert_eq!(quantize_range(f64::NAN, 26), 0);
    }

    #[test]
    fn test_track_speeds_per_direction() {
        assert_eq!(track_speeds(Direction::Up, 10), (10, 10));
        assert_eq!(track_speeds(Direction::Down, 10), (-10, -10));
        assert_eq!(track_speeds(Direction::Right, 10), (10, -10));
        assert_eq!(track_speeds(Direction::Left, 10), (-10, 10));
        assert_eq!(track_speeds(Direction::None, 10), (0, 0));
    }

    #[test]
    fn test_travel_levels() {
        let s = DriveSettings::default();
        assert_eq!(TravelLevel::classify(0, &s), TravelLevel::Rest);
        assert_eq!(TravelLevel::classify(12, &s), TravelLevel::Rest);
        assert_eq!(TravelLevel::classify(13, &s), TravelLevel::Halfway);
        assert_eq!(TravelLevel::classify(-21, &s), TravelLevel::Halfway);
        assert_eq!(TravelLevel::classify(22, &s), TravelLevel::Full);
        assert_eq!(TravelLevel::classify(-26, &s), TravelLevel::Full);
    }

    #[test]
    fn test_haptic_fires_only_when_growing_near_max() {
        let mut m = mixer();

        m.on_move_in(MovementEvent::new(Direction::Up, 0.5));
        assert!(!m.output().haptic);

        m.on_move_in(MovementEvent::new(Direction::Up, 0.93)); // 24
        assert!(m.output().haptic);

        m.on_move_in(MovementEvent::new(Direction::Up, 0.93)); // same, not growing
        assert!(!m.output().haptic);

        m.on_move_in(MovementEvent::new(Direction::Up, 1.0)); // 26
        assert!(m.output().haptic);
        assert_eq!(m.pulses(), 2);
    }

    #[test]
    fn test_end_moving_stops_tracks() {
        let mut m = mixer();
        m.on_move_in(MovementEvent::new(Direction::Left, 1.0));
        assert_eq!((m.output().left, m.output().right), (-26, 26));
        assert_eq!(m.output().level, TravelLevel::Full);

        m.on_end_moving();
        assert_eq!(m.output(), DriveOutput::stopped());
    }

    #[test]
    fn test_callback_sees_every_output() {
        let seen: Arc<Mutex<Vec<DriveOutput>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let mut m = mixer().with_callback(Arc::new(move |out: &DriveOutput| {
            sink.lock().push(*out);
        }));

        m.on_move_in(MovementEvent::new(Direction::Down, 0.25));
        m.on_end_moving();

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!((seen[0].left, seen[0].right), (-6, -6));
        assert_eq!(seen[1].left, 0);
    }
}
