//! Console delegate - logs every joystick notification
//!
//! Useful for:
//! - Trying the joystick from the REPL or a replay script without hardware
//! - Checking which events a gesture actually produces

use tracing::{debug, info};

use crate::joystick::{JoystickDelegate, MovementEvent};

pub struct ConsoleDelegate {
    name: String,
    /// Notifications seen so far
    event_count: u64,
}

impl ConsoleDelegate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            event_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    fn next_event(&mut self) -> u64 {
        self.event_count += 1;
        self.event_count
    }
}

impl JoystickDelegate for ConsoleDelegate {
    fn on_move_in(&mut self, event: MovementEvent) {
        let n = self.next_event();
        info!(
            "🎮 [{}] Joystick '{}' → {} ({:.0}%) [event #{}]",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            self.name,
            event.direction,
            event.percentage * 100.0,
            n
        );
        debug!(
            delegate = self.name,
            direction = %event.direction,
            percentage = event.percentage,
            event_count = n,
            "ConsoleDelegate move"
        );
    }

    fn on_end_moving(&mut self) {
        let n = self.next_event();
        info!(
            "🛑 [{}] Joystick '{}' → released [event #{}]",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            self.name,
            n
        );
    }
}
