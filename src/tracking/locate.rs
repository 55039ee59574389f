//! Locate thread: runs detection on new frames and publishes the marker pose.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::detection::{MarkerDetector, MarkerId, MarkerObservation};
use crate::geometry::{Pose, estimate_pose};
use crate::system::shared_state::SharedState;

use super::pacer::Pacer;

/// Pick the observation to publish for `tracked`.
///
/// When the detector reports the tracked id more than once, the last one in
/// detector order wins.
pub fn select_tracked(
    observations: &[MarkerObservation],
    tracked: MarkerId,
) -> Option<&MarkerObservation> {
    observations.iter().rev().find(|obs| obs.id == tracked)
}

/// Locate thread state.
pub struct LocateLoop<I, D> {
    detector: D,
    shared: Arc<SharedState<I>>,
    pacer: Pacer,
    tracked: MarkerId,

    /// Sequence number of the last frame handed to the detector.
    last_seen: u64,
}

impl<I, D> LocateLoop<I, D>
where
    I: Clone + Send + 'static,
    D: MarkerDetector<I>,
{
    pub fn new(detector: D, shared: Arc<SharedState<I>>, pacer: Pacer, tracked: MarkerId) -> Self {
        Self {
            detector,
            shared,
            pacer,
            tracked,
            last_seen: 0,
        }
    }

    /// Main thread loop: locate on the newest frame, then wait out the period.
    pub fn run(&mut self) {
        info!(
            "Locate thread started (tracking {}, period {} ms)",
            self.tracked,
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
            "Locate thread exiting. Stats: located={}, published={}, last_frame={}",
            stats.frames_located, stats.poses_published, self.last_seen
        );
    }

    /// Process the newest frame if one arrived since the last step.
    ///
    /// Returns the pose published in this step, if any.
    fn step(&mut self) -> Option<Pose> {
        // frame lock is held only for the comparison and the copy
        let frame = self.shared.frames.newer_than(self.last_seen)?;
        self.last_seen = frame.sequence;
        self.shared.record_frame_located();

        let observations = match self.detector.detect(&frame.image) {
            Ok(observations) => observations,
            Err(e) => {
                warn!("Marker detection failed on frame {}: {:#}", frame.sequence, e);
                return None;
            }
        };

        let observation = select_tracked(&observations, self.tracked)?;
        let pose = estimate_pose(&observation.corners);
        debug!(
            "[{}] POS:{:.1},{:.1} HDG:{:.1} FRM:{}",
            self.tracked, pose.x, pose.y, pose.heading_deg, frame.sequence
        );
        self.shared.publish_pose(pose);
        Some(pose)
    }
}
