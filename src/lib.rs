//! Activity Recorder - labeled multi-sensor recording for activity studies.
//!
//! This library samples heterogeneous sensors on a fixed tick, tags every
//! sample with the activity label selected live by the operator, and when the
//! recording stops renders normalized, category-shaded plots and writes one
//! CSV file per sensor.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Activity Recorder                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  tick(t, label)                                              │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────────┐     │
//! │  │   Session   │──▶│   Sensors   │◀──│    Hardware     │     │
//! │  │ (lifecycle) │   │ (prox, IMU) │   │ (ADC, IMU, cam) │     │
//! │  └─────────────┘   └─────────────┘   └─────────────────┘     │
//! │        │ stop()           │                                  │
//! │        ▼                  ▼                                  │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────────┐     │
//! │  │  Exporter   │──▶│ Normalize + │──▶│ Figure / CSV /  │     │
//! │  │ (row slots) │   │  Segment    │   │    manifest     │     │
//! │  └─────────────┘   └─────────────┘   └─────────────────┘     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use activity_recorder::{
//!     core::Label, export::DirectorySink, hardware::SimulatedBackend, render::Figure,
//!     Session, SessionOptions, SessionRequest,
//! };
//!
//! let mut session = Session::new(SessionOptions::default());
//! let request = SessionRequest::new(1, 1, false);
//! session
//!     .start(&request, &SimulatedBackend::new(), None)
//!     .expect("Failed to start session");
//!
//! for i in 0..100 {
//!     session.tick(i as f64 * 0.01, &Label::from("eating"));
//! }
//!
//! let mut figure = Figure::new();
//! let mut sink = DirectorySink::new("recording");
//! session.stop(&mut figure, &mut sink).expect("Failed to export");
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod hardware;
pub mod render;
pub mod sensor;
pub mod session;

// Re-export key types at crate root for convenience
pub use config::{Config, SessionRequest};
pub use crate::core::{normalize, segment, CategoryInterval, Label, LabelPalette, LabelStyle};
pub use error::{
    ConfigError, ExportError, HardwareError, RenderError, SensorError, SessionError,
};
pub use export::{DirectorySink, MemorySink, RecordSink, SessionManifest};
pub use render::{Figure, RenderSurface, RowAddress};
pub use sensor::{OrientationSensor, PlotSlot, ProximitySensor, Sensor, SensorId, SensorKind};
pub use session::{Session, SessionOptions, SessionState, TickReport};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
