//! Worker threads of the pipeline.
//!
//! - Capture: pulls frames at a high rate into the shared frame slot
//! - Locate: detects the tracked marker on new frames at a lower rate and
//!   publishes its pose

pub mod capture;
pub mod locate;
pub mod pacer;
pub mod state;

pub use capture::CaptureLoop;
pub use locate::{LocateLoop, select_tracked};
pub use pacer::Pacer;
pub use state::TrackerState;
