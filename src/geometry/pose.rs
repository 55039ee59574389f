//! Planar marker pose from the four detected corners.
//!
//! Corner order follows the detector contract: `c0`-`c2` is a diagonal and
//! `c0`-`c3` is an edge. Coordinates are image pixels with y pointing down.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Position and heading of the tracked marker in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Bearing relative to image "up", in degrees.
    pub heading_deg: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, heading_deg: f64) -> Self {
        Self { x, y, heading_deg }
    }

    /// Marker center as a point.
    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// Estimate the marker pose from its four ordered corners.
///
/// The position is the midpoint of the `c0`-`c2` diagonal. The heading is
/// `90 - atan2(-(y0 - y3), x0 - x3)` in degrees, so the `c3 -> c0` edge
/// pointing straight up in the image gives a heading of 0.
pub fn estimate_pose(corners: &[Point2<f64>; 4]) -> Pose {
    let c0 = corners[0];
    let c2 = corners[2];
    let c3 = corners[3];

    let heading_deg = 90.0 - (-(c0.y - c3.y)).atan2(c0.x - c3.x).to_degrees();

    Pose {
        x: (c0.x + c2.x) / 2.0,
        y: (c0.y + c2.y) / 2.0,
        heading_deg,
    }
}
