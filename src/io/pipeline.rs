/// GStreamer pipeline for a low-latency H.264 RTSP camera feed.
///
/// Decodes to BGR and lets the appsink drop stale buffers so reads always
/// return the newest frame.
pub fn rtsp_pipeline(url: &str) -> String {
    format!(
        "rtspsrc location={url} latency=0 ! \
         rtph264depay ! \
         avdec_h264 ! \
         videoconvert ! \
         video/x-raw,format=(string)BGR ! \
         appsink drop=1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtsp_pipeline() {
        let pipeline = rtsp_pipeline("rtsp://10.0.0.2/stream");
        assert_eq!(
            pipeline,
            "rtspsrc location=rtsp://10.0.0.2/stream latency=0 ! rtph264depay ! avdec_h264 ! \
             videoconvert ! video/x-raw,format=(string)BGR ! appsink drop=1"
        );
    }
}
