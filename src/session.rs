//! Recording session: sensor ownership and the `idle → recording → idle` cycle.
//!
//! A session is driven from outside. The caller starts it with the requested
//! data sources, calls [`Session::tick`] at a fixed interval with the elapsed
//! time and the currently selected label, and finally calls
//! [`Session::stop`], which plots and exports everything that was recorded.

use crate::config::{Config, SessionRequest};
use crate::core::labels::{Label, LabelPalette};
use crate::error::{HardwareError, SessionError};
use crate::export::{export_sensors, host_name, RecordSink, SessionManifest};
use crate::hardware::{HardwareBackend, VideoCapture, VIDEO_FILE_NAME};
use crate::render::RenderSurface;
use crate::sensor::{OrientationSensor, ProximitySensor, Sensor, SensorId, SensorKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Recording,
    /// Sampling has ended but export has not succeeded yet
    Stopping,
}

/// Settings a session needs from the surrounding application.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub max_proximity: usize,
    pub max_orientation: usize,
    pub fusion_slerp_power: f64,
    pub palette: LabelPalette,
    /// Where the camera, if requested, records to
    pub video_path: PathBuf,
}

impl SessionOptions {
    pub fn from_config(config: &Config, video_path: PathBuf) -> Self {
        Self {
            max_proximity: config.max_proximity,
            max_orientation: config.max_orientation,
            fusion_slerp_power: config.fusion_slerp_power,
            palette: config.palette(),
            video_path,
        }
    }

    fn max_sensors(&self, kind: SensorKind) -> usize {
        match kind {
            SensorKind::Proximity => self.max_proximity,
            SensorKind::Orientation => self.max_orientation,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default(), PathBuf::from(VIDEO_FILE_NAME))
    }
}

/// Outcome of one tick across all sensors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Sensors that appended a sample
    pub sampled: usize,
    /// Sensors whose device had no new data
    pub skipped: usize,
    /// Sensors whose read failed
    pub failed: usize,
}

/// One recording run.
pub struct Session {
    options: SessionOptions,
    state: SessionState,
    sensors: Vec<Box<dyn Sensor>>,
    capture: Option<Box<dyn VideoCapture>>,
    session_id: Uuid,
    started_at: Option<DateTime<Utc>>,
    origin: Option<Instant>,
    ticks: u64,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            state: SessionState::Idle,
            sensors: Vec::new(),
            capture: None,
            session_id: Uuid::new_v4(),
            started_at: None,
            origin: None,
            ticks: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Identifier of the current (or most recent) recording.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Sensors owned by the running recording; empty while idle.
    pub fn sensors(&self) -> &[Box<dyn Sensor>] {
        &self.sensors
    }

    /// Ticks processed since the recording started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn palette(&self) -> &LabelPalette {
        &self.options.palette
    }

    /// Seconds since `start`, or 0 while idle.
    pub fn elapsed_secs(&self) -> f64 {
        self.origin
            .map(|origin| origin.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Construct the requested sensors and begin recording.
    ///
    /// All-or-nothing: on any error the session stays idle, no sensor is kept
    /// and the camera is not left running. Starting while already recording
    /// fails with [`SessionError::AlreadyRecording`] and leaves the running
    /// recording untouched.
    pub fn start(
        &mut self,
        request: &SessionRequest,
        backend: &dyn HardwareBackend,
        capture: Option<Box<dyn VideoCapture>>,
    ) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyRecording);
        }
        if request.is_empty() {
            return Err(SessionError::NoSources);
        }
        for kind in [SensorKind::Proximity, SensorKind::Orientation] {
            let requested = request.count(kind);
            let max = self.options.max_sensors(kind);
            if requested > max {
                return Err(SessionError::TooManySensors {
                    kind,
                    requested,
                    max,
                });
            }
        }

        let mut capture = if request.camera {
            Some(capture.ok_or_else(|| {
                SessionError::Capture(HardwareError::Unavailable(
                    "camera requested but no capture backend is attached".to_string(),
                ))
            })?)
        } else {
            None
        };

        let sensors = self.build_sensors(request, backend)?;

        if let Some(camera) = capture.as_mut() {
            camera
                .start(&self.options.video_path)
                .map_err(SessionError::Capture)?;
        }

        self.sensors = sensors;
        self.capture = capture;
        self.session_id = Uuid::new_v4();
        self.started_at = Some(Utc::now());
        self.origin = Some(Instant::now());
        self.ticks = 0;
        self.state = SessionState::Recording;

        tracing::info!(
            session = %self.session_id,
            sensors = self.sensors.len(),
            camera = request.camera,
            "recording started"
        );
        Ok(())
    }

    fn build_sensors(
        &self,
        request: &SessionRequest,
        backend: &dyn HardwareBackend,
    ) -> Result<Vec<Box<dyn Sensor>>, SessionError> {
        let mut sensors: Vec<Box<dyn Sensor>> = Vec::new();

        if request.proximity > 0 {
            let adc = backend.adc();
            for index in 0..request.proximity {
                let id = SensorId::new(SensorKind::Proximity, index);
                sensors.push(Box::new(ProximitySensor::new(index, adc.clone())));
                tracing::debug!(sensor = %id, "sensor ready");
            }
        }

        for index in 0..request.orientation {
            let id = SensorId::new(SensorKind::Orientation, index);
            let sensor = backend
                .open_imu(index)
                .and_then(|imu| {
                    OrientationSensor::new(index, imu, self.options.fusion_slerp_power)
                })
                .map_err(|source| SessionError::SensorInit {
                    sensor: id.to_string(),
                    source,
                })?;
            sensors.push(Box::new(sensor));
            tracing::debug!(sensor = %id, "sensor ready");
        }

        Ok(sensors)
    }

    /// Sample every sensor once with the same time and label.
    ///
    /// A failing sensor is logged and counted; the others are still sampled.
    /// Does nothing while idle.
    pub fn tick(&mut self, elapsed: f64, label: &Label) -> TickReport {
        let mut report = TickReport::default();
        if !self.is_recording() {
            return report;
        }

        for sensor in self.sensors.iter_mut() {
            match sensor.read(elapsed, label) {
                Ok(true) => report.sampled += 1,
                Ok(false) => {
                    report.skipped += 1;
                    tracing::trace!(sensor = %sensor.name(), "no new data");
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(sensor = %sensor.name(), error = %e, "sensor read failed");
                }
            }
        }

        self.ticks += 1;
        report
    }

    /// Stop recording, then plot and export everything that was recorded.
    ///
    /// Returns the persisted manifest, or `None` if the session was already
    /// idle. If exporting fails the session stays in
    /// [`SessionState::Stopping`] with all samples kept: ticks are ignored
    /// and `stop` can be called again, typically with another sink.
    pub fn stop(
        &mut self,
        surface: &mut dyn RenderSurface,
        sink: &mut dyn RecordSink,
    ) -> Result<Option<SessionManifest>, SessionError> {
        match self.state {
            SessionState::Idle => {
                tracing::debug!("stop requested while idle");
                return Ok(None);
            }
            SessionState::Recording => {
                self.state = SessionState::Stopping;
                self.origin = None;
                if let Some(capture) = self.capture.as_mut() {
                    if let Err(e) = capture.stop() {
                        tracing::warn!(error = %e, "camera did not stop cleanly");
                    }
                }
            }
            SessionState::Stopping => {
                tracing::info!(session = %self.session_id, "retrying export");
            }
        }

        let report = export_sensors(&self.sensors, surface, sink, &self.options.palette)?;

        let manifest = SessionManifest {
            session_id: self.session_id,
            host: host_name(),
            producer: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            started_at: self.started_at.unwrap_or_else(Utc::now),
            stopped_at: Utc::now(),
            ticks: self.ticks,
            camera: self.capture.is_some(),
            total_rows: report.total_rows,
            sensors: report.sensors,
        };
        manifest.persist(sink)?;

        tracing::info!(
            session = %self.session_id,
            ticks = self.ticks,
            sensors = self.sensors.len(),
            "recording stopped and exported"
        );

        self.sensors.clear();
        self.capture = None;
        self.started_at = None;
        self.state = SessionState::Idle;
        Ok(Some(manifest))
    }
}
