//! Shared state between the Capture and Locate threads.
//!
//! The `SharedState` struct holds the two "latest value" slots and the
//! lifecycle flag. Each slot has its own lock; no code path ever holds both,
//! and every read hands out an owned copy.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::geometry::Pose;

/// A captured image tagged with its capture sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<I> {
    /// 1 for the first successful capture, +1 for each one after.
    pub sequence: u64,
    pub image: I,
}

/// Latest captured frame plus the sequence counter, under one lock.
pub struct FrameState<I> {
    inner: Mutex<FrameSlot<I>>,
}

struct FrameSlot<I> {
    sequence: u64,
    latest: Option<I>,
}

impl<I: Clone> FrameState<I> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(FrameSlot {
                sequence: 0,
                latest: None,
            }),
        }
    }

    /// Replace the stored image and bump the sequence counter.
    ///
    /// Returns the sequence number assigned to `image`. The previous image is
    /// dropped after the lock is released.
    pub fn publish(&self, image: I) -> u64 {
        let (sequence, _previous) = {
            let mut slot = self.inner.lock();
            slot.sequence += 1;
            (slot.sequence, slot.latest.replace(image))
        };
        sequence
    }

    /// Copy of the stored frame if its sequence is greater than `last_seen`.
    pub fn newer_than(&self, last_seen: u64) -> Option<Frame<I>> {
        let slot = self.inner.lock();
        if slot.sequence <= last_seen {
            return None;
        }
        slot.latest.as_ref().map(|image| Frame {
            sequence: slot.sequence,
            image: image.clone(),
        })
    }

    /// Copy of the stored frame, if any capture has succeeded yet.
    pub fn latest(&self) -> Option<Frame<I>> {
        self.newer_than(0)
    }

    /// Number of frames published so far.
    pub fn sequence(&self) -> u64 {
        self.inner.lock().sequence
    }
}

impl<I: Clone> Default for FrameState<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Last published marker pose. Never cleared once set.
#[derive(Default)]
pub struct PoseState {
    inner: Mutex<Option<Pose>>,
}

impl PoseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, pose: Pose) {
        *self.inner.lock() = Some(pose);
    }

    pub fn latest(&self) -> Option<Pose> {
        *self.inner.lock()
    }
}

/// Counters maintained by the loops, readable from any thread.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrackerStats {
    /// Successful pulls published into the frame slot.
    pub frames_captured: u64,

    /// Pulls that returned no frame or an error.
    pub capture_failures: u64,

    /// New frames handed to the detector.
    pub frames_located: u64,

    /// Poses written into the pose slot.
    pub poses_published: u64,
}

/// Shared state accessible by the Capture and Locate threads and by readers.
pub struct SharedState<I> {
    /// Latest frame. Written by Capture, copied by Locate and readers.
    pub frames: FrameState<I>,

    /// Latest pose. Written by Locate, copied by readers.
    pub pose: PoseState,

    /// Loops run while this is true; checked once per iteration.
    running: AtomicBool,

    capture_failures: AtomicU64,
    frames_located: AtomicU64,
    poses_published: AtomicU64,
}

impl<I: Clone> SharedState<I> {
    /// Create a new SharedState with empty slots.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn set_running(&self, value: bool) {
        self.running.store(value, Ordering::SeqCst);
    }

    pub fn record_capture_failure(&self) {
        self.capture_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_frame_located(&self) {
        self.frames_located.fetch_add(1, Ordering::Relaxed);
    }

    /// Publish a pose and count it.
    pub fn publish_pose(&self, pose: Pose) {
        self.pose.publish(pose);
        self.poses_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> TrackerStats {
        TrackerStats {
            frames_captured: self.frames.sequence(),
            capture_failures: self.capture_failures.load(Ordering::Relaxed),
            frames_located: self.frames_located.load(Ordering::Relaxed),
            poses_published: self.poses_published.load(Ordering::Relaxed),
        }
    }
}

impl<I: Clone> Default for SharedState<I> {
    fn default() -> Self {
        Self {
            frames: FrameState::new(),
            pose: PoseState::new(),
            running: AtomicBool::new(false),
            capture_failures: AtomicU64::new(0),
            frames_located: AtomicU64::new(0),
            poses_published: AtomicU64::new(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_state_empty() {
        let frames = FrameState::<Vec<u8>>::new();
        assert_eq!(frames.sequence(), 0);
        assert!(frames.latest().is_none());
        assert!(frames.newer_than(0).is_none());
    }

    #[test]
    fn test_frame_state_sequence_increments_by_one() {
        let frames = FrameState::new();
        for expected in 1..=5u64 {
            assert_eq!(frames.publish(vec![expected as u8]), expected);
            assert_eq!(frames.sequence(), expected);
        }
        let latest = frames.latest().unwrap();
        assert_eq!(latest.sequence, 5);
        assert_eq!(latest.image, vec![5u8]);
    }

    #[test]
    fn test_newer_than_only_returns_unseen_frames() {
        let frames = FrameState::new();
        frames.publish("a".to_string());

        let first = frames.newer_than(0).unwrap();
        assert_eq!(first.sequence, 1);
        assert!(frames.newer_than(first.sequence).is_none());

        frames.publish("b".to_string());
        frames.publish("c".to_string());
        let next = frames.newer_than(first.sequence).unwrap();
        assert_eq!(next.sequence, 3);
        assert_eq!(next.image, "c");
    }

    #[test]
    fn test_frame_copies_are_independent() {
        let frames = FrameState::new();
        frames.publish(vec![1u8, 2, 3]);

        let mut copy = frames.latest().unwrap();
        copy.image[0] = 99;

        assert_eq!(frames.latest().unwrap().image, vec![1u8, 2, 3]);
    }

    #[test]
    fn test_pose_state_keeps_last_value() {
        let pose = PoseState::new();
        assert!(pose.latest().is_none());

        pose.publish(Pose::new(1.0, 2.0, 3.0));
        assert_eq!(pose.latest(), Some(Pose::new(1.0, 2.0, 3.0)));
        assert_eq!(pose.latest(), Some(Pose::new(1.0, 2.0, 3.0)));

        pose.publish(Pose::new(4.0, 5.0, 6.0));
        assert_eq!(pose.latest(), Some(Pose::new(4.0, 5.0, 6.0)));
    }

    #[test]
    fn test_shared_state_stats() {
        let shared = SharedState::<u32>::new();
        assert!(!shared.is_running());
        assert_eq!(shared.stats(), TrackerStats::default());

        shared.frames.publish(1);
        shared.frames.publish(2);
        shared.record_capture_failure();
        shared.record_frame_located();
        shared.publish_pose(Pose::new(0.0, 0.0, 0.0));

        let stats = shared.stats();
        assert_eq!(stats.frames_captured, 2);
        assert_eq!(stats.capture_failures, 1);
        assert_eq!(stats.frames_located, 1);
        assert_eq!(stats.poses_published, 1);
    }
}
