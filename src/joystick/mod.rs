//! Joystick state owner
//!
//! [`Joystick`] holds the geometry, the injected delegate and a single
//! "current session" slot. The slot owns the [`ThumbState`]; switching input
//! mode moves the thumb out of the old session, resets it to the center,
//! notifies `on_end_moving` once and hands it to the new session. No two
//! sessions can ever hold the thumb at the same time.
//!
//! | Current   | touch      | step       | tilt on          | tilt off         |
//! |-----------|------------|------------|------------------|------------------|
//! | Idle      | start      | start      | switch           | -                |
//! | Touch     | track      | ignored    | switch           | -                |
//! | Tilt      | ignored    | ignored    | -                | switch to Idle   |
//! | Step      | switch     | step       | switch           | -                |

pub mod delegate;
pub mod step;
pub mod thumb;
pub mod tilt;
pub mod touch;

#[cfg(test)]
mod tests;

use serde::Serialize;
use std::fmt;
use tracing::{debug, info, trace};

use crate::engine::{
    percentage_of_travel, Direction, JoystickGeometry, DEFAULT_DIRECTION_TOLERANCE,
};
use crate::error::JoystickError;
use crate::geometry::Point;
use crate::sensor::Acceleration;

pub use delegate::{JoystickDelegate, MovementEvent};
pub use step::{StepSession, DEFAULT_STEP_UNIT};
pub use thumb::ThumbState;
pub use tilt::{SampleOutcome, TiltSession, TiltSettings};
pub use touch::{TouchPhase, TouchSession};

/// Which input currently drives the thumb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Idle,
    Touch,
    Tilt,
    Step,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputMode::Idle => "idle",
            InputMode::Touch => "touch",
            InputMode::Tilt => "tilt",
            InputMode::Step => "step",
        })
    }
}

/// Tunables that may change at any time, unlike the geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoystickSettings {
    pub direction_tolerance: f64,
    pub step_unit: f64,
    pub tilt: TiltSettings,
}

impl Default for JoystickSettings {
    fn default() -> Self {
        Self {
            direction_tolerance: DEFAULT_DIRECTION_TOLERANCE,
            step_unit: DEFAULT_STEP_UNIT,
            tilt: TiltSettings::default(),
        }
    }
}

/// Point-in-time view of the joystick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JoystickSnapshot {
    pub mode: InputMode,
    pub engaged: bool,
    pub thumb_center: Point,
    pub percentage: f64,
    pub geometry: JoystickGeometry,
}

#[derive(Debug)]
enum Session {
    Idle(ThumbState),
    Touch(TouchSession),
    Tilt(TiltSession),
    Step(StepSession),
}

impl Session {
    fn mode(&self) -> InputMode {
        match self {
            Session::Idle(_) => InputMode::Idle,
            Session::Touch(_) => InputMode::Touch,
            Session::Tilt(_) => InputMode::Tilt,
            Session::Step(_) => InputMode::Step,
        }
    }

    fn thumb(&self) -> &ThumbState {
        match self {
            Session::Idle(thumb) => thumb,
            Session::Touch(s) => s.thumb(),
            Session::Tilt(s) => s.thumb(),
            Session::Step(s) => s.thumb(),
        }
    }

    fn into_thumb(self) -> ThumbState {
        match self {
            Session::Idle(thumb) => thumb,
            Session::Touch(s) => s.into_thumb(),
            Session::Tilt(s) => s.into_thumb(),
            Session::Step(s) => s.into_thumb(),
        }
    }
}

pub struct Joystick<D> {
    geometry: JoystickGeometry,
    settings: JoystickSettings,
    delegate: D,
    session: Session,
}

impl<D: JoystickDelegate> Joystick<D> {
    pub fn new(geometry: JoystickGeometry, settings: JoystickSettings, delegate: D) -> Self {
        Self {
            geometry,
            settings,
            delegate,
            session: Session::Idle(ThumbState::at_rest(&geometry)),
        }
    }

    pub fn geometry(&self) -> &JoystickGeometry {
        &self.geometry
    }

    pub fn settings(&self) -> &JoystickSettings {
        &self.settings
    }

    /// Replace tolerance, step unit and tilt thresholds; applies to the next event
    pub fn set_settings(&mut self, settings: JoystickSettings) {
        self.settings = settings;
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    pub fn mode(&self) -> InputMode {
        self.session.mode()
    }

    pub fn is_tilt_mode(&self) -> bool {
        matches!(self.session, Session::Tilt(_))
    }

    pub fn thumb_center(&self) -> Point {
        self.session.thumb().current_center()
    }

    /// Whether the thumb is currently driven away from rest (or tilt is on)
    pub fn is_engaged(&self) -> bool {
        match &self.session {
            Session::Idle(_) => false,
            Session::Touch(s) => s.phase() == TouchPhase::Tracking,
            Session::Tilt(_) => true,
            Session::Step(s) => !s.thumb().is_at_rest(&self.geometry),
        }
    }

    pub fn snapshot(&self) -> JoystickSnapshot {
        let thumb_center = self.thumb_center();
        JoystickSnapshot {
            mode: self.mode(),
            engaged: self.is_engaged(),
            thumb_center,
            percentage: percentage_of_travel(&self.geometry, thumb_center),
            geometry: self.geometry,
        }
    }

    /// Replace the geometry (e.g. after a resize)
    ///
    /// Refused while a gesture, tilt mode or a displaced step session is
    /// active. On success the thumb rests on the new center.
    pub fn configure(&mut self, geometry: JoystickGeometry) -> Result<(), JoystickError> {
        if self.is_engaged() {
            return Err(JoystickError::SessionActive(self.mode()));
        }
        self.geometry = geometry;
        self.session = Session::Idle(ThumbState::at_rest(&geometry));
        info!(
            center = %geometry.center(),
            outer_radius = geometry.outer_radius(),
            thumb_radius = geometry.thumb_radius(),
            "joystick geometry configured"
        );
        Ok(())
    }

    pub fn touch_began(&mut self, touches: &[Point]) -> Option<MovementEvent> {
        self.touch(touches)
    }

    pub fn touch_moved(&mut self, touches: &[Point]) -> Option<MovementEvent> {
        self.touch(touches)
    }

    /// Returns whether `on_end_moving` was emitted
    pub fn touch_ended(&mut self) -> bool {
        self.finish_touch()
    }

    /// Returns whether `on_end_moving` was emitted
    pub fn touch_cancelled(&mut self) -> bool {
        self.finish_touch()
    }

    fn touch(&mut self, touches: &[Point]) -> Option<MovementEvent> {
        match self.session {
            Session::Tilt(_) => {
                debug!("touch ignored while tilt mode is on");
                return None;
            }
            Session::Idle(_) => {
                let thumb = self.take_thumb();
                self.session = Session::Touch(TouchSession::new(thumb));
            }
            Session::Step(_) => self.switch_to(InputMode::Touch),
            Session::Touch(_) => {}
        }

        let Session::Touch(session) = &mut self.session else {
            return None;
        };
        session.track(
            &self.geometry,
            self.settings.direction_tolerance,
            touches,
            &mut self.delegate,
        )
    }

    fn finish_touch(&mut self) -> bool {
        let Session::Touch(session) = &mut self.session else {
            trace!("touch end without an active touch session");
            return false;
        };
        let ended = session.end(&self.geometry, &mut self.delegate);
        self.session = Session::Idle(self.take_thumb());
        ended
    }

    /// Turn tilt mode on or off; returns whether the mode changed
    ///
    /// Both directions reset the thumb and emit `on_end_moving` once. The
    /// caller owns the accelerometer and must stop it before turning tilt off.
    pub fn set_tilt_mode(&mut self, enabled: bool) -> bool {
        if enabled == self.is_tilt_mode() {
            return false;
        }
        if enabled {
            self.switch_to(InputMode::Tilt);
        } else {
            self.switch_to(InputMode::Idle);
        }
        true
    }

    /// Feed one accelerometer sample; `None` when tilt mode is off
    pub fn on_sample(&mut self, sample: Acceleration) -> Option<SampleOutcome> {
        let Session::Tilt(session) = &mut self.session else {
            trace!("accelerometer sample outside tilt mode dropped");
            return None;
        };
        Some(session.on_sample(
            &self.geometry,
            &self.settings.tilt,
            sample,
            &mut self.delegate,
        ))
    }

    /// Nudge the thumb one step; ignored while touch or tilt drives it
    pub fn step(&mut self, direction: Direction) -> Option<MovementEvent> {
        match self.session {
            Session::Tilt(_) | Session::Touch(_) => {
                debug!(mode = %self.mode(), %direction, "step ignored");
                return None;
            }
            Session::Idle(_) => {
                let thumb = self.take_thumb();
                self.session = Session::Step(StepSession::new(thumb));
            }
            Session::Step(_) => {}
        }

        let Session::Step(session) = &mut self.session else {
            return None;
        };
        session.step(
            &self.geometry,
            self.settings.step_unit,
            direction,
            &mut self.delegate,
        )
    }

    /// Put the thumb back on the center ("stop")
    ///
    /// Touch and step sessions end; tilt mode stays on. Emits
    /// `on_end_moving` only if something was engaged.
    pub fn recenter(&mut self) -> bool {
        let engaged = self.is_engaged();
        if let Session::Tilt(session) = &mut self.session {
            session.recenter(&self.geometry);
        } else {
            let mut thumb = self.take_thumb();
            thumb.reset(&self.geometry);
            self.session = Session::Idle(thumb);
        }
        if engaged {
            self.delegate.on_end_moving();
        }
        engaged
    }

    fn take_thumb(&mut self) -> ThumbState {
        let placeholder = Session::Idle(ThumbState::at_rest(&self.geometry));
        std::mem::replace(&mut self.session, placeholder).into_thumb()
    }

    fn switch_to(&mut self, mode: InputMode) {
        let from = self.mode();
        let mut thumb = self.take_thumb();
        thumb.reset(&self.geometry);
        self.delegate.on_end_moving();

        self.session = match mode {
            InputMode::Idle => Session::Idle(thumb),
            InputMode::Touch => Session::Touch(TouchSession::new(thumb)),
            InputMode::Tilt => Session::Tilt(TiltSession::new(thumb)),
            InputMode::Step => Session::Step(StepSession::new(thumb)),
        };
        info!(%from, to = %mode, "joystick input mode switched");
    }
}
