//! Record a short scripted session on simulated hardware.
//!
//! Run with: cargo run --example simulated_session -- [OUTPUT_DIR]

use activity_recorder::export::FIGURE_FILE_NAME;
use activity_recorder::hardware::{SimulatedBackend, VIDEO_FILE_NAME};
use activity_recorder::{
    Config, DirectorySink, Figure, Label, RecordSink, Session, SessionOptions, SessionRequest,
};
use std::path::PathBuf;

/// Label script as `(from_second, label)`.
const SCRIPT: &[(f64, &str)] = &[
    (0.0, "nothing"),
    (1.0, "eating"),
    (2.5, "talking"),
    (4.0, "nothing"),
];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("activity-recorder-demo"));

    let config = Config::default();
    let options = SessionOptions::from_config(&config, output.join(VIDEO_FILE_NAME));
    let mut session = Session::new(options);
    session.start(&SessionRequest::new(2, 1, false), &SimulatedBackend::new(), None)?;

    // 5 simulated seconds at the configured tick, without sleeping
    let step = config.tick_interval.as_secs_f64();
    let ticks = (5.0 / step) as usize;
    for i in 0..ticks {
        let t = i as f64 * step;
        let label = SCRIPT
            .iter()
            .rev()
            .find(|(from, _)| t >= *from)
            .map(|(_, label)| Label::from(*label))
            .unwrap_or_else(|| config.default_label());
        session.tick(t, &label);
    }

    let mut figure = Figure::new();
    let mut sink = DirectorySink::new(&output);
    if let Some(manifest) = session.stop(&mut figure, &mut sink)? {
        sink.persist(FIGURE_FILE_NAME, &figure.to_svg()?)?;
        for sensor in &manifest.sensors {
            println!("{}: {} samples", sensor.name, sensor.samples);
            for interval in &sensor.intervals {
                println!(
                    "  {:<8} {:6.2}s - {:6.2}s",
                    interval.label.as_str(),
                    interval.start,
                    interval.end
                );
            }
        }
    }
    println!("Wrote {}", output.display());

    Ok(())
}
