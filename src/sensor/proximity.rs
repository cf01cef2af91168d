//! Single-channel proximity sensor read through a shared ADC.

use crate::core::labels::{Label, LabelPalette};
use crate::core::segment::CategoryInterval;
use crate::error::SensorError;
use crate::hardware::{SharedAdc, PROXIMITY_ADC_GAIN};
use crate::render::RenderSurface;
use crate::sensor::samples::{
    plot_channel, shade_categories, ChannelSummary, SampleLog, TIME_AXIS_LABEL,
};
use crate::sensor::{PlotSlot, Sensor, SensorId, SensorKind};

/// Column header of the single data channel.
const DATA_COLUMN: &str = "Data";

/// A proximity sensor wired to one channel of the shared converter.
pub struct ProximitySensor {
    id: SensorId,
    adc: SharedAdc,
    samples: SampleLog<1>,
}

impl ProximitySensor {
    /// Sensor `index` reads ADC channel `index`.
    pub fn new(index: usize, adc: SharedAdc) -> Self {
        Self {
            id: SensorId::new(SensorKind::Proximity, index),
            adc,
            samples: SampleLog::new(),
        }
    }

    pub fn samples(&self) -> &SampleLog<1> {
        &self.samples
    }

    fn channel(&self) -> Result<u8, SensorError> {
        u8::try_from(self.id.index).map_err(|_| {
            SensorError::Encoding(format!("{} has no ADC channel", self.id))
        })
    }
}

impl Sensor for ProximitySensor {
    fn id(&self) -> SensorId {
        self.id
    }

    fn read(&mut self, elapsed: f64, label: &Label) -> Result<bool, SensorError> {
        let raw = self.adc.read_channel(self.channel()?, PROXIMITY_ADC_GAIN)?;
        self.samples.push(elapsed, label, [f64::from(raw)]);
        Ok(true)
    }

    fn row_count(&self) -> usize {
        1
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
        let at = slot.row(0);
        surface.region(at, &self.name(), TIME_AXIS_LABEL, "");
        plot_channel(surface, at, self.samples.time(), self.samples.channel(0));
        shade_categories(surface, &[at], &self.samples.intervals(), palette);
    }

    fn export_records(&self) -> Result<String, SensorError> {
        self.samples.to_csv(&[DATA_COLUMN])
    }

    fn intervals(&self) -> Vec<CategoryInterval<Label>> {
        self.samples.intervals()
    }

    fn channel_summaries(&self) -> Vec<ChannelSummary> {
        vec![ChannelSummary::from_values(
            DATA_COLUMN,
            self.samples.channel(0),
        )]
    }
}
