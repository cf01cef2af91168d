//! Sensors that can be sampled, plotted and exported.
//!
//! Every sensor, whatever its channel layout, implements [`Sensor`]; the
//! session and exporter only ever work through that trait.
//!
//! - [`ProximitySensor`]: one ADC channel, one plot row
//! - [`OrientationSensor`]: six fused IMU channels, three plot rows

pub mod orientation;
pub mod proximity;
pub mod samples;

pub use orientation::{OrientationSensor, ORIENTATION_CHANNELS};
pub use proximity::ProximitySensor;
pub use samples::{ChannelSummary, SampleLog};

use crate::core::labels::{Label, LabelPalette};
use crate::core::segment::CategoryInterval;
use crate::error::SensorError;
use crate::render::{RenderSurface, RowAddress};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of sensor a session can record from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Proximity,
    Orientation,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Proximity => write!(f, "proximity"),
            SensorKind::Orientation => write!(f, "orientation"),
        }
    }
}

/// Identity of a sensor within a session: its kind and position within that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorId {
    pub kind: SensorKind,
    pub index: usize,
}

impl SensorId {
    pub fn new(kind: SensorKind, index: usize) -> Self {
        Self { kind, index }
    }

    /// File name the sensor's records are persisted under.
    pub fn file_name(&self) -> String {
        format!("{self}.csv")
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.index)
    }
}

/// The block of plot rows assigned to one sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotSlot {
    pub first_row: usize,
    pub total_rows: usize,
}

impl PlotSlot {
    pub fn new(first_row: usize, total_rows: usize) -> Self {
        Self {
            first_row,
            total_rows,
        }
    }

    /// Address of the `offset`-th row of this slot.
    pub fn row(&self, offset: usize) -> RowAddress {
        RowAddress::new(self.total_rows, self.first_row + offset)
    }

    /// Addresses of the first `count` rows of this slot.
    pub fn rows(&self, count: usize) -> Vec<RowAddress> {
        (0..count).map(|offset| self.row(offset)).collect()
    }
}

/// The capability set shared by all sensor variants.
pub trait Sensor {
    fn id(&self) -> SensorId;

    /// Display name, `"{kind} {index}"`.
    fn name(&self) -> String {
        self.id().to_string()
    }

    /// Take one reading and append it with the given time and label.
    ///
    /// Returns `Ok(false)` when the device had no new data; nothing is
    /// appended in that case.
    fn read(&mut self, elapsed: f64, label: &Label) -> Result<bool, SensorError>;

    /// Number of stacked plot rows this sensor draws into.
    fn row_count(&self) -> usize;

    /// Number of samples recorded so far.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Draw normalized channels and category bands into the assigned rows.
    fn finalize_plot(
        &self,
        surface: &mut dyn RenderSurface,
        slot: PlotSlot,
        palette: &LabelPalette,
    );

    /// Header plus one CSV row per sample.
    fn export_records(&self) -> Result<String, SensorError>;

    /// Labeled intervals over the recording.
    fn intervals(&self) -> Vec<CategoryInterval<Label>>;

    /// Per-channel statistics of the raw (unnormalized) values.
    fn channel_summaries(&self) -> Vec<ChannelSummary>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_names() {
        let id = SensorId::new(SensorKind::Proximity, 2);
        assert_eq!(id.to_string(), "proximity 2");
        assert_eq!(id.file_name(), "proximity 2.csv");

        let id = SensorId::new(SensorKind::Orientation, 0);
        assert_eq!(id.to_string(), "orientation 0");
    }

    #[test]
    fn test_plot_slot_rows() {
        let slot = PlotSlot::new(1, 4);
        assert_eq!(
            slot.rows(3),
            vec![
                RowAddress::new(4, 1),
                RowAddress::new(4, 2),
                RowAddress::new(4, 3)
            ]
        );
    }
}
