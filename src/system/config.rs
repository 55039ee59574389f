//! Tracker configuration.

use std::time::Duration;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::detection::MarkerId;

/// Default capture period (~100 Hz).
pub const DEFAULT_CAPTURE_INTERVAL: Duration = Duration::from_millis(10);

/// Default locate period (~10 Hz).
pub const DEFAULT_LOCATE_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for the MarkerTracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Marker whose pose gets published. Other ids are ignored.
    pub tracked_marker_id: MarkerId,

    /// Period of the Capture thread.
    pub capture_interval: Duration,

    /// Period of the Locate thread.
    pub locate_interval: Duration,
}

impl TrackerConfig {
    pub fn with_tracked_marker(mut self, id: MarkerId) -> Self {
        self.tracked_marker_id = id;
        self
    }

    pub fn with_intervals(mut self, capture: Duration, locate: Duration) -> Self {
        self.capture_interval = capture;
        self.locate_interval = locate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.capture_interval.is_zero() {
            bail!("capture_interval must be non-zero");
        }
        if self.locate_interval.is_zero() {
            bail!("locate_interval must be non-zero");
        }
        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tracked_marker_id: MarkerId(0),
            capture_interval: DEFAULT_CAPTURE_INTERVAL,
            locate_interval: DEFAULT_LOCATE_INTERVAL,
        }
    }
}
