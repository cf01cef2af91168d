//! Orientation sensor backed by a sensor-fusion IMU.
//!
//! Records roll, pitch and yaw plus their angular rates, all in degrees
//! rounded to one decimal. Only the three angles are plotted; all six
//! channels are exported.

use crate::core::labels::{Label, LabelPalette};
use crate::core::segment::CategoryInterval;
use crate::error::{HardwareError, SensorError};
use crate::hardware::{FusionImu, FusionReading, FusionSettings};
use crate::render::RenderSurface;
use crate::sensor::samples::{
    plot_channel, shade_categories, ChannelSummary, SampleLog, TIME_AXIS_LABEL,
};
use crate::sensor::{PlotSlot, Sensor, SensorId, SensorKind};

/// Exported channel names, in column order.
pub const ORIENTATION_CHANNELS: [&str; 6] = [
    "Roll",
    "Pitch",
    "Yaw",
    "Roll Rate",
    "Pitch Rate",
    "Yaw Rate",
];

/// Channels drawn on the plot, one row each.
const PLOTTED_CHANNELS: usize = 3;

pub struct OrientationSensor {
    id: SensorId,
    imu: Box<dyn FusionImu>,
    samples: SampleLog<6>,
}

impl std::fmt::Debug for OrientationSensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrientationSensor")
            .field("id", &self.id)
            .field("samples", &self.samples)
            .finish_non_exhaustive()
    }
}

impl OrientationSensor {
    /// Initialize `imu` for orientation unit `index` with gyro, accelerometer
    /// and compass fusion enabled.
    ///
    /// Fails if the device does not come up; a sensor is never constructed
    /// around an uninitialized IMU.
    pub fn new(
        index: usize,
        mut imu: Box<dyn FusionImu>,
        slerp_power: f64,
    ) -> Result<Self, HardwareError> {
        let settings = FusionSettings::for_unit(index, slerp_power);
        imu.init(&settings)?;
        tracing::debug!(unit = index, profile = %settings.settings_name, "IMU initialized");

        Ok(Self {
            id: SensorId::new(SensorKind::Orientation, index),
            imu,
            samples: SampleLog::new(),
        })
    }

    pub fn samples(&self) -> &SampleLog<6> {
        &self.samples
    }
}

/// Convert radians to degrees rounded to one decimal place.
fn degrees(radians: f64) -> f64 {
    round_tenth(radians.to_degrees())
}

/// Round to one decimal, ties to even.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

fn to_channels(reading: &FusionReading) -> [f64; 6] {
    let [roll, pitch, yaw] = reading.fusion_pose;
    let [roll_rate, pitch_rate, yaw_rate] = reading.gyro;
    [roll, pitch, yaw, roll_rate, pitch_rate, yaw_rate].map(degrees)
}

impl Sensor for OrientationSensor {
    fn id(&self) -> SensorId {
        self.id
    }

    fn read(&mut self, elapsed: f64, label: &Label) -> Result<bool, SensorError> {
        match self.imu.poll()? {
            Some(reading) => {
                self.samples.push(elapsed, label, to_channels(&reading));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn row_count(&self) -> usize {
        PLOTTED_CHANNELS
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn finalize_plot(
        &self,
        surface: &mut dyn RenderSurface,
        slot: PlotSlot,
        palette: &LabelPalette,
    ) {
        let name = self.name();
        let rows = slot.rows(PLOTTED_CHANNELS);

        for (channel, &at) in rows.iter().enumerate() {
            let title = format!("{name} {}", ORIENTATION_CHANNELS[channel]);
            surface.region(at, &title, TIME_AXIS_LABEL, "");
            plot_channel(surface, at, self.samples.time(), self.samples.channel(channel));
        }

        shade_categories(surface, &rows, &self.samples.intervals(), palette);
    }

    fn export_records(&self) -> Result<String, SensorError> {
        self.samples.to_csv(&ORIENTATION_CHANNELS)
    }

    fn intervals(&self) -> Vec<CategoryInterval<Label>> {
        self.samples.intervals()
    }

    fn channel_summaries(&self) -> Vec<ChannelSummary> {
        ORIENTATION_CHANNELS
            .iter()
            .enumerate()
            .map(|(i, name)| ChannelSummary::from_values(name, self.samples.channel(i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Figure;
    use std::collections::VecDeque;
    use std::f64::consts::PI;

    /// IMU replaying a fixed sequence of poll results.
    struct ReplayImu {
        init_ok: bool,
        polls: VecDeque<Option<FusionReading>>,
    }

    impl ReplayImu {
        fn new(polls: Vec<Option<FusionReading>>) -> Self {
            Self {
                init_ok: true,
                polls: polls.into(),
            }
        }
    }

    impl FusionImu for ReplayImu {
        fn init(&mut self, settings: &FusionSettings) -> Result<(), HardwareError> {
            assert!(settings.gyro_enabled && settings.accel_enabled && settings.compass_enabled);
            if self.init_ok {
                Ok(())
            } else {
                Err(HardwareError::Init("IMU unable to initialize".to_string()))
            }
        }

        fn poll(&mut self) -> Result<Option<FusionReading>, HardwareError> {
            self.polls
                .pop_front()
                .ok_or_else(|| HardwareError::Read("replay exhausted".to_string()))
        }
    }

    fn reading(angle: f64) -> FusionReading {
        FusionReading {
            fusion_pose: [angle, -angle, angle / 2.0],
            gyro: [angle, 0.0, -angle],
        }
    }

    #[test]
    fn test_init_failure_is_propagated() {
        let mut imu = ReplayImu::new(vec![]);
        imu.init_ok = false;

        let err = OrientationSensor::new(1, Box::new(imu), 0.02).unwrap_err();
        assert!(matches!(err, HardwareError::Init(_)));
    }

    #[test]
    fn test_converts_to_rounded_degrees() {
        let imu = ReplayImu::new(vec![Some(reading(PI / 2.0)), Some(reading(0.001))]);
        let mut sensor = OrientationSensor::new(0, Box::new(imu), 0.02).unwrap();

        sensor.read(0.0, &Label::from("nothing")).unwrap();
        sensor.read(0.1, &Label::from("nothing")).unwrap();

        let samples = sensor.samples();
        assert_eq!(samples.channel(0), &[90.0, 0.1]);
        assert_eq!(samples.channel(1), &[-90.0, -0.1]);
        assert_eq!(samples.channel(2), &[45.0, 0.0]);
        assert_eq!(samples.channel(5), &[-90.0, -0.1]);
    }

    #[test]
    fn test_rounding_ties_go_to_even() {
        assert_eq!(round_tenth(0.25), 0.2);
        assert_eq!(round_tenth(0.75), 0.8);
        assert_eq!(round_tenth(-0.25), -0.2);
        assert_eq!(round_tenth(12.34), 12.3);
    }

    #[test]
    fn test_no_new_data_skips_append() {
        let imu = ReplayImu::new(vec![Some(reading(0.1)), None, Some(reading(0.2))]);
        let mut sensor = OrientationSensor::new(0, Box::new(imu), 0.02).unwrap();

        assert!(sensor.read(0.0, &Label::from("nothing")).unwrap());
        assert!(!sensor.read(0.1, &Label::from("eating")).unwrap());
        assert!(sensor.read(0.2, &Label::from("eating")).unwrap());

        assert_eq!(sensor.len(), 2);
        assert_eq!(sensor.samples().time(), &[0.0, 0.2]);
        assert_eq!(sensor.samples().labels().len(), 2);
    }

    #[test]
    fn test_export_records_schema() {
        let imu = ReplayImu::new(vec![Some(reading(0.5)); 3]);
        let mut sensor = OrientationSensor::new(0, Box::new(imu), 0.02).unwrap();
        for i in 0..3 {
            sensor.read(i as f64 * 0.1, &Label::from("talking")).unwrap();
        }

        let records = sensor.export_records().unwrap();
        let lines: Vec<&str> = records.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Time,Label,Roll,Pitch,Yaw,Roll Rate,Pitch Rate,Yaw Rate"
        );
        assert!(lines[1..].iter().all(|l| l.split(',').count() == 8));
    }

    #[test]
    fn test_finalize_plot_shades_all_three_rows() {
        let imu = ReplayImu::new(vec![Some(reading(0.1)), Some(reading(0.2)), Some(reading(0.3))]);
        let mut sensor = OrientationSensor::new(0, Box::new(imu), 0.02).unwrap();
        sensor.read(0.0, &Label::from("nothing")).unwrap();
        sensor.read(0.1, &Label::from("eating")).unwrap();
        sensor.read(0.2, &Label::from("eating")).unwrap();

        let mut figure = Figure::new();
        sensor.finalize_plot(&mut figure, PlotSlot::new(1, 4), &LabelPalette::default());

        assert_eq!(figure.title_of(1), Some("orientation 0 Roll"));
        assert_eq!(figure.title_of(2), Some("orientation 0 Pitch"));
        assert_eq!(figure.title_of(3), Some("orientation 0 Yaw"));
        assert_eq!(figure.title_of(0), None);
        for row in 1..=3 {
            assert_eq!(figure.lines_in(row).len(), 1);
            assert_eq!(figure.bands_in(row).len(), 2);
        }
    }

    #[test]
    fn test_channel_summaries_cover_all_channels() {
        let imu = ReplayImu::new(vec![Some(reading(0.1))]);
        let mut sensor = OrientationSensor::new(0, Box::new(imu), 0.02).unwrap();
        sensor.read(0.0, &Label::from("nothing")).unwrap();

        let summaries = sensor.channel_summaries();
        assert_eq!(summaries.len(), 6);
        assert_eq!(summaries[3].name, "Roll Rate");
    }
}
