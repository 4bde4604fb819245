//! ControllerActor - single owner of the joystick
//!
//! Every input (touch, step, configuration, accelerometer readings) arrives as
//! a [`ControllerCommand`] on one unbounded queue and is applied in order, so
//! thumb state and delegate notifications never race.
//!
//! ```text
//!  ControllerHandle ──┐
//!  ControllerHandle ──┼──► command_rx ──► ControllerActor ──► Joystick ──► delegate
//!  sampler (epoch n) ─┘                      │
//!                                            └── spawns / aborts sampler
//! ```
//!
//! Readings carry the tilt epoch of the sampler that produced them. Turning
//! tilt off aborts the sampler and bumps the epoch, so readings still queued
//! behind the switch are discarded.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::actor_handle::ControllerHandle;
use super::commands::ControllerCommand;
use super::ControllerSnapshot;
use crate::engine::JoystickGeometry;
use crate::error::JoystickError;
use crate::joystick::{Joystick, JoystickDelegate, JoystickSettings, SampleOutcome};
use crate::sensor::{spawn_sampler, Acceleration, SourceFactory, MIN_SAMPLE_INTERVAL};

/// Delegate type the controller drives
pub type BoxedDelegate = Box<dyn JoystickDelegate + Send>;

pub struct ControllerActor {
    joystick: Joystick<BoxedDelegate>,

    /// Builds the accelerometer for each tilt session
    sources: SourceFactory,
    sample_interval: Duration,
    sampler: Option<JoinHandle<()>>,
    tilt_epoch: u64,

    /// Weak so the sampler never keeps the queue open on its own
    command_tx: mpsc::WeakUnboundedSender<ControllerCommand>,
    command_rx: mpsc::UnboundedReceiver<ControllerCommand>,

    processed: u64,
    dropped_samples: u64,
}

impl ControllerActor {
    /// Spawn the actor on the current runtime and return a handle to it
    ///
    /// `sample_interval` is raised to [`MIN_SAMPLE_INTERVAL`] if shorter.
    pub fn spawn(
        geometry: JoystickGeometry,
        settings: JoystickSettings,
        delegate: BoxedDelegate,
        sources: SourceFactory,
        sample_interval: Duration,
    ) -> ControllerHandle {
        let (actor, cmd_tx) = Self::new(geometry, settings, delegate, sources, sample_interval);

        tokio::spawn(actor.run());

        info!(
            center = %geometry.center(),
            outer_radius = geometry.outer_radius(),
            thumb_radius = geometry.thumb_radius(),
            "joystick controller spawned"
        );

        ControllerHandle::new(cmd_tx)
    }

    fn new(
        geometry: JoystickGeometry,
        settings: JoystickSettings,
        delegate: BoxedDelegate,
        sources: SourceFactory,
        sample_interval: Duration,
    ) -> (Self, mpsc::UnboundedSender<ControllerCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let actor = ControllerActor {
            joystick: Joystick::new(geometry, settings, delegate),
            sources,
            sample_interval: sample_interval.max(MIN_SAMPLE_INTERVAL),
            sampler: None,
            tilt_epoch: 0,
            command_tx: cmd_tx.downgrade(),
            command_rx: cmd_rx,
            processed: 0,
            dropped_samples: 0,
        };

        (actor, cmd_tx)
    }

    async fn run(mut self) {
        debug!("joystick controller run loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            if !self.handle_command(cmd) {
                break;
            }
        }

        self.stop_sampler();
        self.joystick.recenter();

        info!(
            processed = self.processed,
            dropped_samples = self.dropped_samples,
            "joystick controller run loop terminated"
        );
    }

    /// Apply one command; returns `false` on shutdown
    fn handle_command(&mut self, cmd: ControllerCommand) -> bool {
        trace!(kind = cmd.kind(), "processing command");
        self.processed += 1;

        match cmd {
            ControllerCommand::TouchBegan { touches } => {
                self.joystick.touch_began(&touches);
            }
            ControllerCommand::TouchMoved { touches } => {
                self.joystick.touch_moved(&touches);
            }
            ControllerCommand::TouchEnded => {
                self.joystick.touch_ended();
            }
            ControllerCommand::TouchCancelled => {
                self.joystick.touch_cancelled();
            }
            ControllerCommand::Step { direction } => {
                self.joystick.step(direction);
            }
            ControllerCommand::Recenter => {
                self.joystick.recenter();
            }
            ControllerCommand::Sample { epoch, sample } => {
                self.handle_sample(epoch, sample);
            }
            ControllerCommand::SetTiltMode { enabled, response } => {
                let _ = response.send(self.handle_set_tilt_mode(enabled));
            }
            ControllerCommand::Configure { geometry, response } => {
                let _ = response.send(self.joystick.configure(geometry));
            }
            ControllerCommand::UpdateSettings {
                settings,
                sample_interval_ms,
            } => {
                self.handle_update_settings(settings, sample_interval_ms);
            }
            ControllerCommand::Snapshot { response } => {
                let _ = response.send(self.snapshot());
            }
            ControllerCommand::Shutdown => {
                info!("joystick controller received shutdown command");
                return false;
            }
        }
        true
    }

    fn handle_sample(&mut self, epoch: u64, sample: Acceleration) {
        if epoch != self.tilt_epoch {
            self.dropped_samples += 1;
            trace!(epoch, current = self.tilt_epoch, "stale accelerometer sample dropped");
            return;
        }
        match self.joystick.on_sample(sample) {
            Some(SampleOutcome::Saturated) => {
                debug!(%sample, "accelerometer sample saturated");
            }
            Some(_) => {}
            None => {
                self.dropped_samples += 1;
            }
        }
    }

    fn handle_set_tilt_mode(&mut self, enabled: bool) -> Result<(), JoystickError> {
        if enabled == self.joystick.is_tilt_mode() {
            return Ok(());
        }

        if !enabled {
            self.stop_sampler();
            self.joystick.set_tilt_mode(false);
            return Ok(());
        }

        let source = (self.sources)();
        if !source.is_available() {
            warn!(source = source.name(), "tilt mode requested but no accelerometer");
            return Err(JoystickError::SensorUnavailable(source.name().to_string()));
        }

        self.joystick.set_tilt_mode(true);
        self.tilt_epoch += 1;
        let epoch = self.tilt_epoch;
        self.sampler = Some(spawn_sampler(
            source,
            self.sample_interval,
            self.command_tx.clone(),
            move |sample| ControllerCommand::Sample { epoch, sample },
        ));
        info!(epoch, interval = ?self.sample_interval, "tilt sampling started");
        Ok(())
    }

    fn handle_update_settings(&mut self, settings: JoystickSettings, sample_interval_ms: u64) {
        self.joystick.set_settings(settings);

        let interval = Duration::from_millis(sample_interval_ms).max(MIN_SAMPLE_INTERVAL);
        if interval == self.sample_interval {
            return;
        }
        self.sample_interval = interval;
        debug!(?interval, "accelerometer interval updated");

        // Restart sampling at the new cadence without leaving tilt mode.
        // A sampler whose source already ran dry stays finished.
        if self.is_sampling() {
            self.stop_sampler();
            let source = (self.sources)();
            self.tilt_epoch += 1;
            let epoch = self.tilt_epoch;
            self.sampler = Some(spawn_sampler(
                source,
                self.sample_interval,
                self.command_tx.clone(),
                move |sample| ControllerCommand::Sample { epoch, sample },
            ));
        }
    }

    fn stop_sampler(&mut self) {
        if let Some(task) = self.sampler.take() {
            task.abort();
            self.tilt_epoch += 1;
            debug!(epoch = self.tilt_epoch, "tilt sampling stopped");
        }
    }

    fn is_sampling(&self) -> bool {
        self.sampler.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            joystick: self.joystick.snapshot(),
            tilt_epoch: self.tilt_epoch,
            sampling: self.is_sampling(),
        }
    }
}
