//! Marker Tracker - Main entry point and thread orchestration.
//!
//! The `MarkerTracker` is the top-level struct that users interact with.
//! It owns the shared state and spawns the Capture and Locate threads.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result, bail};
use crossbeam_channel::{Sender, bounded};
use tracing::error;

use crate::detection::{MarkerDetector, MarkerId};
use crate::geometry::Pose;
use crate::io::FrameSource;
use crate::tracking::{CaptureLoop, LocateLoop, Pacer, TrackerState};

use super::config::TrackerConfig;
use super::shared_state::{Frame, SharedState, TrackerStats};

/// Independent copies of the latest frame and pose.
///
/// The two halves are read under separate locks, so the frame may be newer
/// than the frame the pose was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSnapshot<I> {
    pub frame: Option<Frame<I>>,
    pub pose: Option<Pose>,
}

/// Read-only view of a tracker's shared state.
///
/// Cheap to clone and safe to use from any thread, including while the owner
/// starts or stops the tracker.
pub struct TrackerHandle<I> {
    shared: Arc<SharedState<I>>,
}

impl<I> Clone for TrackerHandle<I> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<I: Clone> TrackerHandle<I> {
    pub fn snapshot(&self) -> TrackerSnapshot<I> {
        TrackerSnapshot {
            frame: self.frame(),
            pose: self.pose(),
        }
    }

    pub fn frame(&self) -> Option<Frame<I>> {
        self.shared.frames.latest()
    }

    pub fn pose(&self) -> Option<Pose> {
        self.shared.pose.latest()
    }

    pub fn stats(&self) -> TrackerStats {
        self.shared.stats()
    }

    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }
}

/// Tracks one fiducial marker with a Capture thread and a Locate thread.
pub struct MarkerTracker<S: FrameSource, D> {
    /// Shared state (frame slot, pose slot, flags) accessible by all threads.
    shared: Arc<SharedState<S::Image>>,

    config: TrackerConfig,
    state: TrackerState,

    /// Moved into their threads on start.
    source: Option<S>,
    detector: Option<D>,

    /// Dropped on stop to wake both loops out of their wait.
    shutdown_tx: Option<Sender<()>>,

    capture_handle: Option<JoinHandle<()>>,
    locate_handle: Option<JoinHandle<()>>,
}

impl<S, D> MarkerTracker<S, D>
where
    S: FrameSource,
    D: MarkerDetector<S::Image>,
{
    /// Create a tracker around an already-opened source.
    ///
    /// Nothing runs until [`start`](Self::start) is called.
    pub fn new(source: S, detector: D, config: TrackerConfig) -> Result<Self> {
        config.validate().context("invalid tracker configuration")?;

        Ok(Self {
            shared: SharedState::new(),
            config,
            state: TrackerState::Created,
            source: Some(source),
            detector: Some(detector),
            shutdown_tx: None,
            capture_handle: None,
            locate_handle: None,
        })
    }

    /// Spawn the Capture and Locate threads.
    ///
    /// Only valid once, from `Created`. If a thread cannot be spawned the
    /// tracker is stopped before the error is returned.
    pub fn start(&mut self) -> Result<()> {
        if self.state != TrackerState::Created {
            bail!("tracker cannot be started from state {:?}", self.state);
        }
        let source = self.source.take().context("frame source already consumed")?;
        let detector = self.detector.take().context("detector already consumed")?;

        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        self.shutdown_tx = Some(shutdown_tx);
        self.shared.set_running(true);
        self.state = TrackerState::Running;

        match Self::spawn_capture(
            source,
            self.shared.clone(),
            Pacer::new(self.config.capture_interval, shutdown_rx.clone()),
        ) {
            Ok(handle) => self.capture_handle = Some(handle),
            Err(e) => {
                self.stop();
                return Err(e);
            }
        }

        match Self::spawn_locate(
            detector,
            self.shared.clone(),
            Pacer::new(self.config.locate_interval, shutdown_rx),
            self.config.tracked_marker_id,
        ) {
            Ok(handle) => self.locate_handle = Some(handle),
            Err(e) => {
                self.stop();
                return Err(e);
            }
        }

        Ok(())
    }

    /// Spawn the Capture thread.
    fn spawn_capture(
        source: S,
        shared: Arc<SharedState<S::Image>>,
        pacer: Pacer,
    ) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("marker-capture".into())
            .spawn(move || {
                let mut capture = CaptureLoop::new(source, shared, pacer);
                capture.run();
            })
            .context("failed to spawn capture thread")
    }

    /// Spawn the Locate thread.
    fn spawn_locate(
        detector: D,
        shared: Arc<SharedState<S::Image>>,
        pacer: Pacer,
        tracked: MarkerId,
    ) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("marker-locate".into())
            .spawn(move || {
                let mut locate = LocateLoop::new(detector, shared, pacer, tracked);
                locate.run();
            })
            .context("failed to spawn locate thread")
    }
}

impl<S: FrameSource, D> MarkerTracker<S, D> {
    /// Stop both threads and wait for them to finish.
    ///
    /// Once this returns, the shared state is no longer mutated. A thread
    /// blocked inside `pull` or `detect` delays the return until that call
    /// completes. Calling it again is a no-op.
    pub fn stop(&mut self) {
        match self.state {
            TrackerState::Created => {
                self.state = TrackerState::Stopped;
                return;
            }
            TrackerState::Stopped => return,
            TrackerState::Running => {}
        }

        // Signal shutdown, then close the channel so sleeping loops wake now
        self.shared.set_running(false);
        self.shutdown_tx = None;

        let handles = [
            ("capture", self.capture_handle.take()),
            ("locate", self.locate_handle.take()),
        ];
        for (name, handle) in handles {
            if let Some(handle) = handle {
                if handle.join().is_err() {
                    error!("{} thread panicked", name);
                }
            }
        }

        self.state = TrackerState::Stopped;
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Copy of the latest frame and pose. Valid in every state.
    pub fn snapshot(&self) -> TrackerSnapshot<S::Image> {
        self.handle().snapshot()
    }

    pub fn stats(&self) -> TrackerStats {
        self.shared.stats()
    }

    /// Read-only handle for other threads.
    pub fn handle(&self) -> TrackerHandle<S::Image> {
        TrackerHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: FrameSource, D> Drop for MarkerTracker<S, D> {
    fn drop(&mut self) {
        self.stop();
    }
}
