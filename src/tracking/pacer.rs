//! Fixed-period pacing for the worker loops.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};

/// Sleeps out the remainder of a loop period.
///
/// The sleep is a `recv_timeout` on the shutdown channel, so dropping the
/// matching sender wakes every waiting loop at once.
pub struct Pacer {
    interval: Duration,
    shutdown: Receiver<()>,
}

impl Pacer {
    pub fn new(interval: Duration, shutdown: Receiver<()>) -> Self {
        Self { interval, shutdown }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until `interval` has elapsed since `started`.
    ///
    /// Returns `false` if shutdown was signalled while waiting.
    pub fn wait(&self, started: Instant) -> bool {
        let remaining = self.interval.saturating_sub(started.elapsed());
        match self.shutdown.recv_timeout(remaining) {
            Err(RecvTimeoutError::Timeout) => true,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }
}
