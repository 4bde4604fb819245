//! Fixed-cadence polling task

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;
use tracing::{debug, trace};

use super::{AccelerometerSource, Acceleration};

/// 40 Hz
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 25;

/// Shortest cadence the sampler will run at
pub const MIN_SAMPLE_INTERVAL: Duration = Duration::from_millis(1);

/// Poll `source` every `period` and forward each reading through `tx`
///
/// The task holds only a weak sender: it stops when the receiving side is
/// gone, when the source is exhausted, or when the returned handle is
/// aborted. `wrap` turns a reading into the receiver's message type.
/// Periods below [`MIN_SAMPLE_INTERVAL`] are raised to it.
pub fn spawn_sampler<T, F>(
    mut source: Box<dyn AccelerometerSource>,
    period: Duration,
    tx: mpsc::WeakUnboundedSender<T>,
    wrap: F,
) -> JoinHandle<()>
where
    T: Send + 'static,
    F: Fn(Acceleration) -> T + Send + 'static,
{
    tokio::spawn(async move {
        let period = period.max(MIN_SAMPLE_INTERVAL);
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ticks = IntervalStream::new(ticker);
        let mut forwarded: u64 = 0;

        debug!(source = source.name(), ?period, "accelerometer sampler started");

        while ticks.next().await.is_some() {
            let Some(sample) = source.read().await else {
                debug!(source = source.name(), "accelerometer source exhausted");
                break;
            };
            let Some(tx) = tx.upgrade() else {
                break;
            };
            if tx.send(wrap(sample)).is_err() {
                break;
            }
            forwarded += 1;
            trace!(%sample, "accelerometer sample forwarded");
        }

        debug!(forwarded, "accelerometer sampler stopped");
    })
}
