//! Lifecycle state machine of the tracker.

/// Lifecycle of a `MarkerTracker`: `Created -> Running -> Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Built but threads not spawned yet.
    Created,
    /// Capture and Locate threads are live.
    Running,
    /// Threads joined. Terminal; a new tracker is needed to run again.
    Stopped,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self::Created
    }
}
