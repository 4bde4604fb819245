//! Virtual joystick input mapping
//!
//! Turns finger drags, device tilt and discrete step commands into a
//! quantized direction plus a travel percentage for an on-screen joystick,
//! and reports them to an injected delegate.
//!
//! - [`engine`]: pure geometry (direction classification, validity, travel)
//! - [`joystick`]: the stateful sessions and the single-owner [`Joystick`](joystick::Joystick)
//! - [`controller`]: actor serializing all input onto one task
//! - [`sensor`]: accelerometer sources and the sampling task
//! - [`drivers`]: ready-made delegates (console log, tracked-robot mixer)

pub mod cli;
pub mod config;
pub mod controller;
pub mod drivers;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod joystick;
pub mod script;
pub mod sensor;

pub use controller::{ControllerActor, ControllerHandle, ControllerSnapshot};
pub use engine::{Direction, JoystickGeometry};
pub use error::JoystickError;
pub use geometry::Point;
pub use joystick::{InputMode, Joystick, JoystickDelegate, JoystickSettings, MovementEvent};
