pub mod detection;
pub mod geometry;
pub mod io;
pub mod system;
pub mod tracking;

#[cfg(test)]
pub(crate) mod test_utils;

pub use detection::{MarkerDetector, MarkerId, MarkerObservation};
pub use geometry::{Pose, estimate_pose};
pub use io::FrameSource;
pub use system::{
    Frame, MarkerTracker, TrackerConfig, TrackerHandle, TrackerSnapshot, TrackerStats,
};
pub use tracking::TrackerState;
