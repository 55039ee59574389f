//! Marker detection boundary.
//!
//! The detection algorithm itself is supplied from outside the pipeline:
//! anything that turns an image into a list of [`MarkerObservation`]s can be
//! plugged in through [`MarkerDetector`].

#[cfg(feature = "opencv")]
mod aruco;

#[cfg(feature = "opencv")]
pub use aruco::ArucoMarkerDetector;

use anyhow::{Result, bail};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Identifier encoded in a fiducial marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MarkerId(pub u32);

impl MarkerId {
    /// Create a new MarkerId with the given value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// A single marker found in one detection call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerObservation {
    pub id: MarkerId,
    /// Corners in detector order: `corners[0]`-`corners[2]` is a diagonal,
    /// `corners[0]`-`corners[3]` is an edge.
    pub corners: [Point2<f64>; 4],
}

impl MarkerObservation {
    pub fn new(id: MarkerId, corners: [Point2<f64>; 4]) -> Self {
        Self { id, corners }
    }

    /// Build an observation from a corner list of unknown length.
    ///
    /// Fails unless exactly four corners are given.
    pub fn from_slice(id: MarkerId, corners: &[Point2<f64>]) -> Result<Self> {
        let Ok(corners) = <[Point2<f64>; 4]>::try_from(corners) else {
            bail!("marker {} has {} corners, expected 4", id, corners.len());
        };
        Ok(Self { id, corners })
    }
}

/// Turn raw detector output into observations.
///
/// Entries with a negative id or a corner count other than four are logged
/// and skipped; the remaining entries are kept in detector order.
pub fn collect_observations<C>(raw: impl IntoIterator<Item = (i32, C)>) -> Vec<MarkerObservation>
where
    C: AsRef<[Point2<f64>]>,
{
    let mut observations = Vec::new();
    for (id, corners) in raw {
        let Ok(id) = u32::try_from(id) else {
            warn!("Ignoring marker with negative id {}", id);
            continue;
        };
        match MarkerObservation::from_slice(MarkerId(id), corners.as_ref()) {
            Ok(observation) => observations.push(observation),
            Err(e) => warn!("Ignoring malformed marker: {:#}", e),
        }
    }
    observations
}

/// Produces marker observations for a frame.
///
/// Implementations may return an empty list. They are called from the locate
/// thread only, so `&mut self` is never contended.
pub trait MarkerDetector<I>: Send + 'static {
    fn detect(&mut self, image: &I) -> Result<Vec<MarkerObservation>>;
}

impl<I, F> MarkerDetector<I> for F
where
    F: FnMut(&I) -> Result<Vec<MarkerObservation>> + Send + 'static,
{
    fn detect(&mut self, image: &I) -> Result<Vec<MarkerObservation>> {
        self(image)
    }
}
