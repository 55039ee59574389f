//! Deterministic source and detector used by the pipeline tests.
//!
//! Every image is a `Vec<u64>` filled with one value: the number of
//! successful pulls so far. A torn frame would therefore show up as a buffer
//! with mixed values, or one whose value differs from its sequence number.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use nalgebra::Point2;
use parking_lot::Mutex;

use crate::detection::{MarkerDetector, MarkerId, MarkerObservation};
use crate::geometry::{Pose, estimate_pose};
use crate::io::FrameSource;

pub(crate) struct SyntheticSource {
    len: usize,
    pulls: u64,
    successes: u64,
    fail_every: Option<u64>,
    delay: Duration,
}

impl SyntheticSource {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            len,
            pulls: 0,
            successes: 0,
            fail_every: None,
            delay: Duration::ZERO,
        }
    }

    /// Make every `n`-th pull fail, alternating between an error and an
    /// empty read.
    pub(crate) fn failing_every(mut self, n: u64) -> Self {
        self.fail_every = Some(n);
        self
    }

    /// Block inside every pull, like a camera waiting for its next frame.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl FrameSource for SyntheticSource {
    type Image = Vec<u64>;

    fn pull(&mut self) -> Result<Option<Vec<u64>>> {
        self.pulls += 1;
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if let Some(n) = self.fail_every {
            if self.pulls % n == 0 {
                if (self.pulls / n) % 2 == 0 {
                    return Ok(None);
                }
                bail!("synthetic dropout at pull {}", self.pulls);
            }
        }
        self.successes += 1;
        Ok(Some(vec![self.successes; self.len]))
    }
}

/// Corners whose pose is `(v, 2v, 0)`.
pub(crate) fn corners_for(value: u64) -> [Point2<f64>; 4] {
    let x = value as f64;
    let y = 2.0 * value as f64;
    [
        Point2::new(x - 1.0, y - 1.0),
        Point2::new(x + 1.0, y - 1.0),
        Point2::new(x + 1.0, y + 1.0),
        Point2::new(x - 1.0, y + 1.0),
    ]
}

/// Pose the synthetic detector yields for an image filled with `value`.
pub(crate) fn expected_pose(value: u64) -> Pose {
    estimate_pose(&corners_for(value))
}

/// Reports one marker per image, placed according to the image payload, and
/// records every payload it was given.
pub(crate) struct SyntheticDetector {
    id: MarkerId,
    seen: Arc<Mutex<Vec<u64>>>,
}

impl SyntheticDetector {
    pub(crate) fn new(id: u32) -> Self {
        Self {
            id: MarkerId(id),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared log of processed payloads, readable after the detector has
    /// moved into the locate thread.
    pub(crate) fn seen_log(&self) -> Arc<Mutex<Vec<u64>>> {
        Arc::clone(&self.seen)
    }

    pub(crate) fn seen(&self) -> Vec<u64> {
        self.seen.lock().clone()
    }
}

impl MarkerDetector<Vec<u64>> for SyntheticDetector {
    fn detect(&mut self, image: &Vec<u64>) -> Result<Vec<MarkerObservation>> {
        let Some(&value) = image.first() else {
            bail!("empty synthetic image");
        };
        if image.iter().any(|&v| v != value) {
            bail!("torn synthetic image");
        }
        self.seen.lock().push(value);
        Ok(vec![MarkerObservation::new(self.id, corners_for(value))])
    }
}

/// True if `pose` is one the synthetic detector can produce.
pub(crate) fn is_consistent_pose(pose: &Pose) -> bool {
    pose.x >= 1.0 && pose.x.fract() == 0.0 && *pose == expected_pose(pose.x as u64)
}

/// Poll `condition` until it holds or `timeout` expires.
pub(crate) fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = std::time::Instant::now() + timeout;
    while std::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}
