//! Video capture alongside sensor recording.
//!
//! The camera is an optional data source: a session with the camera enabled
//! and no sensors is still a valid recording.

use crate::error::HardwareError;
use std::path::{Path, PathBuf};

/// File name of the video recorded next to the sensor records.
pub const VIDEO_FILE_NAME: &str = "video.h264";

/// A camera that records to a file between `start` and `stop`.
pub trait VideoCapture {
    fn start(&mut self, path: &Path) -> Result<(), HardwareError>;

    fn stop(&mut self) -> Result<(), HardwareError>;

    fn is_recording(&self) -> bool;
}

/// A capture backend that records nothing.
///
/// Used when no camera is attached; it tracks state and logs so the session
/// lifecycle behaves the same as with a real camera.
#[derive(Debug, Default)]
pub struct NoopCapture {
    target: Option<PathBuf>,
}

impl NoopCapture {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VideoCapture for NoopCapture {
    fn start(&mut self, path: &Path) -> Result<(), HardwareError> {
        if self.target.is_some() {
            return Err(HardwareError::Unavailable(
                "camera is already recording".to_string(),
            ));
        }
        tracing::info!(path = %path.display(), "camera capture started (no camera attached)");
        self.target = Some(path.to_path_buf());
        Ok(())
    }

    fn stop(&mut self) -> Result<(), HardwareError> {
        if let Some(path) = self.target.take() {
            tracing::info!(path = %path.display(), "camera capture stopped");
        }
        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.target.is_some()
    }
}
