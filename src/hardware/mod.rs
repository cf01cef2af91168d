//! Hardware collaborators for the activity recorder.
//!
//! This module defines the device contracts the sensors sample through,
//! plus a simulated backend and a no-op camera for running without hardware.

pub mod capture;
pub mod simulated;
pub mod types;

// Re-export commonly used types
pub use capture::{NoopCapture, VideoCapture, VIDEO_FILE_NAME};
pub use simulated::{SimulatedAdc, SimulatedBackend, SimulatedImu};
pub use types::{
    AdcReader, FusionImu, FusionReading, FusionSettings, HardwareBackend, SharedAdc,
    PROXIMITY_ADC_GAIN,
};
