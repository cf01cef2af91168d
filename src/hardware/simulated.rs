//! Simulated hardware backend.
//!
//! This exists so the recorder (and binary) can run on machines without the
//! sensor board attached. Readings are deterministic waveforms derived from a
//! per-device read counter.

use crate::error::HardwareError;
use crate::hardware::types::{
    AdcReader, FusionImu, FusionReading, FusionSettings, HardwareBackend, SharedAdc,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Midpoint of the simulated converter output.
const ADC_BASELINE: f64 = 12_000.0;

/// Peak deviation of the simulated converter output.
const ADC_SWING: f64 = 6_000.0;

/// Every Nth IMU poll reports that no new data is ready.
const IMU_STALL_EVERY: u64 = 4;

/// A converter producing a slow sine wave per channel.
#[derive(Debug, Default)]
pub struct SimulatedAdc {
    reads: AtomicU64,
}

impl SimulatedAdc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversions performed so far, across all channels.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }
}

impl AdcReader for SimulatedAdc {
    fn read_channel(&self, channel: u8, gain: u8) -> Result<i32, HardwareError> {
        if channel > 3 {
            return Err(HardwareError::Read(format!(
                "ADC channel {channel} out of range (0-3)"
            )));
        }
        let n = self.reads.fetch_add(1, Ordering::Relaxed) as f64;
        let phase = n * 0.05 + f64::from(channel);
        let value = ADC_BASELINE + ADC_SWING * phase.sin() / f64::from(gain.max(1));
        Ok(value.round() as i32)
    }
}

/// A fusion IMU producing gently oscillating orientation.
#[derive(Debug)]
pub struct SimulatedImu {
    index: usize,
    fail_init: bool,
    initialized: bool,
    polls: u64,
}

impl SimulatedImu {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            fail_init: false,
            initialized: false,
            polls: 0,
        }
    }

    /// An IMU whose initialization always fails, as with a missing device.
    pub fn failing(index: usize) -> Self {
        Self {
            fail_init: true,
            ..Self::new(index)
        }
    }
}

impl FusionImu for SimulatedImu {
    fn init(&mut self, settings: &FusionSettings) -> Result<(), HardwareError> {
        if self.fail_init {
            return Err(HardwareError::Init(format!(
                "no IMU responded for profile {}",
                settings.settings_name
            )));
        }
        self.initialized = true;
        Ok(())
    }

    fn poll(&mut self) -> Result<Option<FusionReading>, HardwareError> {
        if !self.initialized {
            return Err(HardwareError::Unavailable(format!(
                "IMU {} polled before initialization",
                self.index
            )));
        }

        self.polls += 1;
        if self.polls % IMU_STALL_EVERY == 0 {
            return Ok(None);
        }

        let t = self.polls as f64 * 0.02 + self.index as f64;
        Ok(Some(FusionReading {
            fusion_pose: [0.4 * t.sin(), 0.25 * (1.3 * t).cos(), 1.5 * (0.2 * t).sin()],
            gyro: [0.4 * t.cos(), -0.325 * (1.3 * t).sin(), 0.3 * (0.2 * t).cos()],
        }))
    }
}

/// Backend handing out simulated devices.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    adc: Arc<SimulatedAdc>,
    failing_imus: Vec<usize>,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self {
            adc: Arc::new(SimulatedAdc::new()),
            failing_imus: Vec::new(),
        }
    }

    /// Make orientation unit `index` fail during initialization.
    pub fn with_failing_imu(mut self, index: usize) -> Self {
        self.failing_imus.push(index);
        self
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareBackend for SimulatedBackend {
    fn adc(&self) -> SharedAdc {
        self.adc.clone()
    }

    fn open_imu(&self, index: usize) -> Result<Box<dyn FusionImu>, HardwareError> {
        if self.failing_imus.contains(&index) {
            Ok(Box::new(SimulatedImu::failing(index)))
        } else {
            Ok(Box::new(SimulatedImu::new(index)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adc_stays_in_range() {
        let adc = SimulatedAdc::new();
        for _ in 0..200 {
            let value = adc.read_channel(2, 1).unwrap();
            assert!((6_000..=18_000).contains(&value));
        }
        assert_eq!(adc.read_count(), 200);
    }

    #[test]
    fn test_adc_rejects_unknown_channel() {
        let adc = SimulatedAdc::new();
        assert!(matches!(adc.read_channel(4, 1), Err(HardwareError::Read(_))));
    }

    #[test]
    fn test_imu_requires_init() {
        let mut imu = SimulatedImu::new(0);
        assert!(imu.poll().is_err());

        imu.init(&FusionSettings::for_unit(0, 0.02)).unwrap();
        assert!(imu.poll().unwrap().is_some());
    }

    #[test]
    fn test_imu_periodically_has_no_new_data() {
        let mut imu = SimulatedImu::new(0);
        imu.init(&FusionSettings::for_unit(0, 0.02)).unwrap();

        let readings: Vec<_> = (0..8).map(|_| imu.poll().unwrap()).collect();
        assert!(readings[3].is_none());
        assert!(readings[7].is_none());
        assert_eq!(readings.iter().filter(|r| r.is_some()).count(), 6);
    }

    #[test]
    fn test_backend_failing_imu() {
        let backend = SimulatedBackend::new().with_failing_imu(1);
        let mut ok = backend.open_imu(0).unwrap();
        let mut bad = backend.open_imu(1).unwrap();

        assert!(ok.init(&FusionSettings::for_unit(0, 0.02)).is_ok());
        let err = bad.init(&FusionSettings::for_unit(1, 0.02)).unwrap_err();
        assert!(err.to_string().contains("RTIMULib1"));
    }
}
