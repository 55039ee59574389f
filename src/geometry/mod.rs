//! Geometry utilities: marker pose estimation.

pub mod pose;

pub use pose::{Pose, estimate_pose};
