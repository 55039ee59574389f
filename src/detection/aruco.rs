//! ArUco detection backed by OpenCV's `objdetect` module.

use anyhow::{Context, Result};
use nalgebra::Point2;
use opencv::core::{Mat, Point2f, Vector};
use opencv::objdetect::{
    self, ArucoDetector, DetectorParameters, PredefinedDictionaryType, RefineParameters,
};
use opencv::prelude::*;

use super::{MarkerDetector, MarkerObservation, collect_observations};

/// ArUco detector for a single predefined dictionary.
pub struct ArucoMarkerDetector {
    detector: ArucoDetector,
}

impl ArucoMarkerDetector {
    pub fn new(dictionary: PredefinedDictionaryType) -> Result<Self> {
        let dictionary = objdetect::get_predefined_dictionary(dictionary)
            .context("failed to load ArUco dictionary")?;
        let params = DetectorParameters::default()?;
        let refine = RefineParameters::new_def()?;
        let detector = ArucoDetector::new(&dictionary, &params, refine)
            .context("failed to create ArUco detector")?;
        Ok(Self { detector })
    }

    /// Detector for the 4x4 dictionary with 100 ids used on the robot.
    pub fn dict_4x4_100() -> Result<Self> {
        Self::new(PredefinedDictionaryType::DICT_4X4_100)
    }
}

impl MarkerDetector<Mat> for ArucoMarkerDetector {
    fn detect(&mut self, image: &Mat) -> Result<Vec<MarkerObservation>> {
        let mut corners = Vector::<Vector<Point2f>>::new();
        let mut ids = Vector::<i32>::new();
        let mut rejected = Vector::<Vector<Point2f>>::new();
        self.detector
            .detect_markers(image, &mut corners, &mut ids, &mut rejected)?;

        let raw = ids.iter().zip(corners.iter()).map(|(id, quad)| {
            let points: Vec<Point2<f64>> = quad
                .iter()
                .map(|p| Point2::new(f64::from(p.x), f64::from(p.y)))
                .collect();
            (id, points)
        });
        Ok(collect_observations(raw))
    }
}
