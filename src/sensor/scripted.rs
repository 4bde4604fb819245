//! In-process accelerometer sources (scripted, channel fed, absent)

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use super::{AccelerometerSource, Acceleration};

/// Plays back a fixed list of readings, optionally forever
#[derive(Debug, Clone)]
pub struct ScriptedAccelerometer {
    samples: Vec<Acceleration>,
    cursor: usize,
    looping: bool,
}

impl ScriptedAccelerometer {
    pub fn new(samples: Vec<Acceleration>, looping: bool) -> Self {
        Self {
            samples,
            cursor: 0,
            looping,
        }
    }

    /// Same reading on every tick
    pub fn constant(sample: Acceleration) -> Self {
        Self::new(vec![sample], true)
    }
}

#[async_trait]
impl AccelerometerSource for ScriptedAccelerometer {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        !self.samples.is_empty()
    }

    async fn read(&mut self) -> Option<Acceleration> {
        if self.cursor >= self.samples.len() {
            if !self.looping || self.samples.is_empty() {
                return None;
            }
            debug!(len = self.samples.len(), "scripted accelerometer looping");
            self.cursor = 0;
        }
        let sample = self.samples[self.cursor];
        self.cursor += 1;
        Some(sample)
    }
}

/// Device without motion hardware
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableAccelerometer;

#[async_trait]
impl AccelerometerSource for UnavailableAccelerometer {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn read(&mut self) -> Option<Acceleration> {
        None
    }
}

/// Readings pushed from elsewhere through a channel
///
/// Clones share the same queue, so a factory can hand out a clone each time
/// tilt mode is turned on.
#[derive(Debug, Clone)]
pub struct ChannelAccelerometer {
    rx: Arc<Mutex<mpsc::UnboundedReceiver<Acceleration>>>,
}

impl ChannelAccelerometer {
    pub fn channel() -> (mpsc::UnboundedSender<Acceleration>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            tx,
            Self {
                rx: Arc::new(Mutex::new(rx)),
            },
        )
    }
}

#[async_trait]
impl AccelerometerSource for ChannelAccelerometer {
    fn name(&self) -> &str {
        "channel"
    }

    async fn read(&mut self) -> Option<Acceleration> {
        self.rx.lock().await.recv().await
    }
}
