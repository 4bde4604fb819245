//! Joystick delegates shipped with the crate
//!
//! Embedding UIs implement [`JoystickDelegate`](crate::joystick::JoystickDelegate)
//! themselves; these cover logging and the tracked-robot mapping.

pub mod console;
pub mod drive;

pub use console::ConsoleDelegate;
pub use drive::{
    quantize_range, track_speeds, DriveCallback, DriveMixer, DriveOutput, DriveSettings,
    TravelLevel,
};

use crate::controller::BoxedDelegate;

/// Console logging followed by the drive mixer
pub fn standard_delegate(
    name: &str,
    drive: DriveSettings,
    on_drive: Option<DriveCallback>,
) -> BoxedDelegate {
    let mut mixer = DriveMixer::new(drive);
    if let Some(callback) = on_drive {
        mixer = mixer.with_callback(callback);
    }
    Box::new((ConsoleDelegate::new(name), mixer))
}
