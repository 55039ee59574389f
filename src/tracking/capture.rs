//! Capture thread: pulls frames from the source into the shared frame slot.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, trace, warn};

use crate::io::FrameSource;
use crate::system::shared_state::SharedState;

use super::pacer::Pacer;

/// Capture thread state.
pub struct CaptureLoop<S: FrameSource> {
    source: S,
    shared: Arc<SharedState<S::Image>>,
    pacer: Pacer,
}

impl<S: FrameSource> CaptureLoop<S> {
    pub fn new(source: S, shared: Arc<SharedState<S::Image>>, pacer: Pacer) -> Self {
        Self {
            source,
            shared,
            pacer,
        }
    }

    /// Main thread loop: pull, publish on success, wait out the period.
    ///
    /// Runs until the running flag is cleared or shutdown is signalled.
    pub fn run(&mut self) {
        info!(
            "Capture thread started (period {} ms)",
            self.pacer.interval().as_millis()
        );

        while self.shared.is_running() {
            let started = Instant::now();
            self.step();
            if !self.pacer.wait(started) {
                break;
            }
        }

        let stats = self.shared.stats();
        info!(
            "Capture thread exiting. Stats: captured={}, failures={}",
            stats.frames_captured, stats.capture_failures
        );
    }

    /// One pull attempt. Failures are skipped; the next period retries.
    fn step(&mut self) {
        match self.source.pull() {
            Ok(Some(image)) => {
                let sequence = self.shared.frames.publish(image);
                trace!("Captured frame {}", sequence);
            }
            Ok(None) => {
                self.shared.record_capture_failure();
                trace!("No frame available");
            }
            Err(e) => {
                self.shared.record_capture_failure();
                warn!("Frame pull failed: {:#}", e);
            }
        }
    }
}
