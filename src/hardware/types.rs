//! Contracts for the hardware the recorder samples from.
//!
//! The recorder never talks to a bus directly. Each sensor is handed a
//! collaborator implementing one of these traits, which keeps the sampling
//! logic testable with fake devices.

use crate::error::HardwareError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Gain setting used for every proximity channel read.
pub const PROXIMITY_ADC_GAIN: u8 = 1;

/// A multi-channel analog-to-digital converter.
///
/// One converter is shared by all proximity sensors; each sensor reads the
/// channel matching its index.
pub trait AdcReader {
    /// Read one conversion from `channel` with the given programmable gain.
    fn read_channel(&self, channel: u8, gain: u8) -> Result<i32, HardwareError>;
}

/// Handle to the converter shared by every proximity sensor of a session.
pub type SharedAdc = Arc<dyn AdcReader>;

/// One fused orientation sample, in radians and radians per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionReading {
    /// Roll, pitch and yaw from the fusion filter
    pub fusion_pose: [f64; 3],
    /// Angular rate around the same axes
    pub gyro: [f64; 3],
}

/// Initialization parameters for a fusion IMU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionSettings {
    /// Name of the device settings profile (one per unit)
    pub settings_name: String,
    /// Weight of the accel/compass correction in the fusion filter
    pub slerp_power: f64,
    pub gyro_enabled: bool,
    pub accel_enabled: bool,
    pub compass_enabled: bool,
}

impl FusionSettings {
    /// Settings for orientation unit `index` with full gyro/accel/compass fusion.
    pub fn for_unit(index: usize, slerp_power: f64) -> Self {
        Self {
            settings_name: format!("RTIMULib{index}"),
            slerp_power,
            gyro_enabled: true,
            accel_enabled: true,
            compass_enabled: true,
        }
    }
}

/// A sensor-fusion IMU producing orientation and angular rate.
pub trait FusionImu {
    /// Bring the device up with the given fusion settings.
    fn init(&mut self, settings: &FusionSettings) -> Result<(), HardwareError>;

    /// Fetch the latest fused reading, or `None` when no new data is ready.
    fn poll(&mut self) -> Result<Option<FusionReading>, HardwareError>;
}

/// Factory for the devices a session needs.
pub trait HardwareBackend {
    /// The converter shared by all proximity sensors.
    fn adc(&self) -> SharedAdc;

    /// Open (but do not initialize) the IMU for orientation unit `index`.
    fn open_imu(&self, index: usize) -> Result<Box<dyn FusionImu>, HardwareError>;
}
