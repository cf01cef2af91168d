//! Error types for the activity recorder.

use std::io;
use thiserror::Error;

use crate::sensor::SensorKind;

/// Failures reported by a hardware collaborator (ADC, fusion IMU, camera).
#[derive(Debug, Error)]
pub enum HardwareError {
    #[error("device failed to initialize: {0}")]
    Init(String),

    #[error("device read failed: {0}")]
    Read(String),

    #[error("device unavailable: {0}")]
    Unavailable(String),
}

/// Failures of a single sensor while sampling or exporting.
#[derive(Debug, Error)]
pub enum SensorError {
    #[error(transparent)]
    Hardware(#[from] HardwareError),

    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("record encoding error: {0}")]
    Encoding(String),
}

/// Failures while finalizing and persisting a stopped session.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not build records for {sensor}: {source}")]
    Records {
        sensor: String,
        #[source]
        source: SensorError,
    },

    #[error("could not write {file}: {source}")]
    Persist {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("could not serialize session manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Failures while drawing a figure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not render figure: {0}")]
    Draw(String),
}

/// Failures of the recording session state machine.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Must select at least one sensor or enable the camera before recording")]
    NoSources,

    #[error("Requested {requested} {kind} sensors, but at most {max} are supported")]
    TooManySensors {
        kind: SensorKind,
        requested: usize,
        max: usize,
    },

    #[error("A recording is already in progress; stop it before starting another")]
    AlreadyRecording,

    #[error("{sensor} unable to initialize: {source}")]
    SensorInit {
        sensor: String,
        #[source]
        source: HardwareError,
    },

    #[error("camera capture failed: {0}")]
    Capture(#[source] HardwareError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Configuration load/save failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
