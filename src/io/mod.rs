//! Frame acquisition boundary.
//!
//! The pipeline only needs something it can pull images from. Decoding and
//! reconnect logic stay behind the [`FrameSource`] implementation.

#[cfg(feature = "opencv")]
mod gstreamer;
mod pipeline;

#[cfg(feature = "opencv")]
pub use gstreamer::GstreamerSource;
pub use pipeline::rtsp_pipeline;

use anyhow::Result;

/// A video source polled by the capture thread.
///
/// Opening the underlying device belongs in the implementation's constructor,
/// which must return an error if the source is unusable.
pub trait FrameSource: Send + 'static {
    /// Image type handed to the detector. `clone()` must produce an
    /// independent copy.
    type Image: Clone + Send + 'static;

    /// Grab the next frame.
    ///
    /// `Ok(None)` means no frame was available this cycle. Both `Ok(None)`
    /// and `Err(_)` are treated as transient by the capture thread.
    fn pull(&mut self) -> Result<Option<Self::Image>>;
}
