//! Sample storage and the helpers every sensor variant shares.

use crate::core::labels::{Label, LabelPalette};
use crate::core::normalize::normalize;
use crate::core::segment::{segment, CategoryInterval};
use crate::error::SensorError;
use crate::render::{RenderSurface, RowAddress};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// X axis label used on every plot row.
pub const TIME_AXIS_LABEL: &str = "Time";

/// Parallel time / label / channel sequences for one sensor.
///
/// A sample is appended to every sequence at once, so all of them always
/// have the same length.
#[derive(Debug, Clone)]
pub struct SampleLog<const N: usize> {
    time: Vec<f64>,
    labels: Vec<Label>,
    channels: [Vec<f64>; N],
}

impl<const N: usize> SampleLog<N> {
    pub fn new() -> Self {
        Self {
            time: Vec::new(),
            labels: Vec::new(),
            channels: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Append one sample across all sequences.
    pub fn push(&mut self, time: f64, label: &Label, values: [f64; N]) {
        self.time.push(time);
        self.labels.push(label.clone());
        for (channel, value) in self.channels.iter_mut().zip(values) {
            channel.push(value);
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn channel(&self, index: usize) -> &[f64] {
        &self.channels[index]
    }

    /// Maximal runs of identical labels over the recorded time span.
    pub fn intervals(&self) -> Vec<CategoryInterval<Label>> {
        segment(&self.labels, &self.time)
    }

    /// Render the log as CSV: `Time,Label` followed by one column per channel.
    ///
    /// Numbers are fixed-point with six decimals; labels are written verbatim
    /// (quoted only if they contain CSV metacharacters).
    pub fn to_csv(&self, channel_headers: &[&str; N]) -> Result<String, SensorError> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec!["Time", "Label"];
        header.extend_from_slice(channel_headers);
        writer.write_record(&header)?;

        for i in 0..self.len() {
            let mut row = Vec::with_capacity(N + 2);
            row.push(format!("{:.6}", self.time[i]));
            row.push(self.labels[i].to_string());
            row.extend(self.channels.iter().map(|c| format!("{:.6}", c[i])));
            writer.write_record(&row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| SensorError::Encoding(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| SensorError::Encoding(e.to_string()))
    }
}

impl<const N: usize> Default for SampleLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Descriptive statistics for one channel of a finished recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub name: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

impl ChannelSummary {
    pub fn from_values(name: &str, values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                name: name.to_string(),
                min: None,
                max: None,
                mean: None,
                std_dev: None,
            };
        }

        Self {
            name: name.to_string(),
            min: Some(Statistics::min(values)),
            max: Some(Statistics::max(values)),
            mean: Some(Statistics::mean(values)),
            std_dev: Some(Statistics::population_std_dev(values)),
        }
    }
}

/// Normalize a channel and draw it against time in one plot row.
pub fn plot_channel(
    surface: &mut dyn RenderSurface,
    at: RowAddress,
    time: &[f64],
    values: &[f64],
) {
    if values.is_empty() {
        return;
    }
    surface.line(at, time, &normalize(values));
}

/// Shade every category interval on each of the given rows.
pub fn shade_categories(
    surface: &mut dyn RenderSurface,
    rows: &[RowAddress],
    intervals: &[CategoryInterval<Label>],
    palette: &LabelPalette,
) {
    for interval in intervals {
        let color = palette.color_for(&interval.label);
        for &at in rows {
            surface.band(at, interval.start, interval.end, color, palette.alpha());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Figure;

    fn log_with(samples: &[(f64, &str, f64)]) -> SampleLog<1> {
        let mut log = SampleLog::new();
        for (t, label, value) in samples {
            log.push(*t, &Label::from(*label), [*value]);
        }
        log
    }

    #[test]
    fn test_push_keeps_sequences_aligned() {
        let mut log: SampleLog<3> = SampleLog::new();
        log.push(0.0, &Label::from("nothing"), [1.0, 2.0, 3.0]);
        log.push(0.1, &Label::from("eating"), [4.0, 5.0, 6.0]);

        assert_eq!(log.len(), 2);
        assert_eq!(log.labels().len(), 2);
        for c in 0..3 {
            assert_eq!(log.channel(c).len(), 2);
        }
        assert_eq!(log.channel(2), &[3.0, 6.0]);
    }

    #[test]
    fn test_csv_layout() {
        let log = log_with(&[(0.0, "nothing", 100.0), (0.1, "eating", 250.5)]);
        let csv = log.to_csv(&["Data"]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Time,Label,Data");
        assert_eq!(lines[1], "0.000000,nothing,100.000000");
        assert_eq!(lines[2], "0.100000,eating,250.500000");
    }

    #[test]
    fn test_csv_header_only_when_empty() {
        let log: SampleLog<1> = SampleLog::new();
        assert_eq!(log.to_csv(&["Data"]).unwrap(), "Time,Label,Data\n");
    }

    #[test]
    fn test_channel_summary() {
        let summary = ChannelSummary::from_values("Roll", &[1.0, 2.0, 3.0]);
        assert_eq!(summary.min, Some(1.0));
        assert_eq!(summary.max, Some(3.0));
        assert_eq!(summary.mean, Some(2.0));
        let std_dev = summary.std_dev.unwrap();
        assert!((std_dev - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);

        let empty = ChannelSummary::from_values("Roll", &[]);
        assert_eq!(empty.mean, None);
    }

    #[test]
    fn test_shading_replicates_across_rows() {
        let log = log_with(&[
            (0.0, "nothing", 1.0),
            (0.1, "eating", 2.0),
            (0.2, "eating", 3.0),
        ]);
        let rows = [
            RowAddress::new(3, 0),
            RowAddress::new(3, 1),
            RowAddress::new(3, 2),
        ];
        let mut figure = Figure::new();

        shade_categories(&mut figure, &rows, &log.intervals(), &LabelPalette::default());

        for row in 0..3 {
            assert_eq!(
                figure.bands_in(row),
                vec![(0.0, 0.1, "blue"), (0.1, 0.2, "green")]
            );
        }
    }

    #[test]
    fn test_plot_channel_normalizes() {
        let log = log_with(&[(0.0, "nothing", 10.0), (0.1, "nothing", 20.0)]);
        let mut figure = Figure::new();
        plot_channel(&mut figure, RowAddress::new(1, 0), log.time(), log.channel(0));

        let lines = figure.lines_in(0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].1, &[-1.0, 1.0]);
    }
}
