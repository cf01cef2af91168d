//! End-of-session export: plot layout, per-sensor records and the manifest.
//!
//! Runs once, when a session stops. Every sensor is plotted first (each into
//! its own block of rows), then every sensor's records are persisted as
//! `"{sensor name}.csv"`.

use crate::core::labels::{Label, LabelPalette};
use crate::core::segment::CategoryInterval;
use crate::error::ExportError;
use crate::render::RenderSurface;
use crate::sensor::{ChannelSummary, PlotSlot, Sensor, SensorId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File name of the session manifest.
pub const MANIFEST_FILE_NAME: &str = "session.json";

/// File name of the rendered figure.
pub const FIGURE_FILE_NAME: &str = "plot.svg";

/// Durable destination for exported files.
pub trait RecordSink {
    fn persist(&mut self, file_name: &str, contents: &str) -> io::Result<()>;
}

/// Writes each file into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RecordSink for DirectorySink {
    fn persist(&mut self, file_name: &str, contents: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(file_name), contents)
    }
}

/// Keeps exported files in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.files.get(file_name).map(String::as_str)
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl RecordSink for MemorySink {
    fn persist(&mut self, file_name: &str, contents: &str) -> io::Result<()> {
        self.files.insert(file_name.to_string(), contents.to_string());
        Ok(())
    }
}

/// Assign each sensor a block of rows in one shared stack.
///
/// Blocks are laid out in sensor order with no overlap; every slot carries
/// the total height of the stack.
pub fn assign_slots(row_counts: &[usize]) -> Vec<PlotSlot> {
    let total_rows = row_counts.iter().sum();
    let mut next = 0;
    row_counts
        .iter()
        .map(|&count| {
            let slot = PlotSlot::new(next, total_rows);
            next += count;
            slot
        })
        .collect()
}

/// What was exported for one sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorExport {
    pub id: SensorId,
    pub name: String,
    pub file: String,
    pub samples: usize,
    pub first_row: usize,
    pub rows: usize,
    pub intervals: Vec<CategoryInterval<Label>>,
    pub channels: Vec<ChannelSummary>,
}

/// Result of exporting a session's sensors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportReport {
    pub total_rows: usize,
    pub sensors: Vec<SensorExport>,
}

/// Plot every sensor into `surface`, then persist every sensor's records.
pub fn export_sensors(
    sensors: &[Box<dyn Sensor>],
    surface: &mut dyn RenderSurface,
    sink: &mut dyn RecordSink,
    palette: &LabelPalette,
) -> Result<ExportReport, ExportError> {
    let row_counts: Vec<usize> = sensors.iter().map(|s| s.row_count()).collect();
    let slots = assign_slots(&row_counts);
    let total_rows = row_counts.iter().sum();

    for (sensor, slot) in sensors.iter().zip(&slots) {
        tracing::info!(
            sensor = %sensor.name(),
            first_row = slot.first_row,
            rows = sensor.row_count(),
            samples = sensor.len(),
            "plotting sensor"
        );
        sensor.finalize_plot(surface, *slot, palette);
    }

    let mut exports = Vec::with_capacity(sensors.len());
    for (sensor, slot) in sensors.iter().zip(&slots) {
        let name = sensor.name();
        let file = sensor.id().file_name();

        let records = sensor
            .export_records()
            .map_err(|source| ExportError::Records {
                sensor: name.clone(),
                source,
            })?;
        sink.persist(&file, &records)
            .map_err(|source| ExportError::Persist {
                file: file.clone(),
                source,
            })?;
        tracing::info!(sensor = %name, file = %file, samples = sensor.len(), "exported records");

        exports.push(SensorExport {
            id: sensor.id(),
            name,
            file,
            samples: sensor.len(),
            first_row: slot.first_row,
            rows: sensor.row_count(),
            intervals: sensor.intervals(),
            channels: sensor.channel_summaries(),
        });
    }

    Ok(ExportReport {
        total_rows,
        sensors: exports,
    })
}

/// Summary of a finished recording, persisted as `session.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionManifest {
    pub session_id: Uuid,
    pub host: String,
    pub producer: String,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
    pub ticks: u64,
    pub camera: bool,
    pub total_rows: usize,
    pub sensors: Vec<SensorExport>,
}

impl SessionManifest {
    /// Serialize and persist the manifest.
    pub fn persist(&self, sink: &mut dyn RecordSink) -> Result<(), ExportError> {
        let json = serde_json::to_string_pretty(self)?;
        sink.persist(MANIFEST_FILE_NAME, &json)
            .map_err(|source| ExportError::Persist {
                file: MANIFEST_FILE_NAME.to_string(),
                source,
            })
    }
}

/// Name of the machine the recording was made on.
pub fn host_name() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}
