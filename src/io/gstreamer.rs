//! OpenCV `VideoCapture` source using the GStreamer backend.

use anyhow::{Context, Result, bail};
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use super::{FrameSource, rtsp_pipeline};

pub struct GstreamerSource {
    capture: VideoCapture,
}

impl GstreamerSource {
    /// Open a raw GStreamer pipeline description ending in an appsink.
    pub fn open_pipeline(pipeline: &str) -> Result<Self> {
        let capture = VideoCapture::from_file(pipeline, videoio::CAP_GSTREAMER)
            .with_context(|| format!("failed to create capture for pipeline: {pipeline}"))?;
        if !capture.is_opened()? {
            bail!("video source could not be opened: {pipeline}");
        }
        Ok(Self { capture })
    }

    /// Open an H.264 RTSP stream.
    pub fn open_rtsp(url: &str) -> Result<Self> {
        Self::open_pipeline(&rtsp_pipeline(url))
    }
}

impl FrameSource for GstreamerSource {
    type Image = Mat;

    fn pull(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }
        Ok(Some(frame))
    }
}
