//! Tracker orchestration and thread management.
//!
//! This module contains the top-level `MarkerTracker` that spawns and
//! coordinates the Capture and Locate threads, along with the shared state
//! they publish into and the tracker configuration.

pub mod config;
mod marker_tracker;
pub mod shared_state;

pub use config::TrackerConfig;
pub use marker_tracker::{MarkerTracker, TrackerHandle, TrackerSnapshot};
pub use shared_state::{Frame, SharedState, TrackerStats};
