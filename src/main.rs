//! Activity Recorder CLI
//!
//! Records labeled sensor data from the terminal: the operator types a label
//! (or its first letter) while the recorder samples on a fixed tick.

use activity_recorder::{
    config::{Config, SessionRequest},
    export::{DirectorySink, RecordSink, FIGURE_FILE_NAME},
    hardware::{NoopCapture, SimulatedBackend, VideoCapture, VIDEO_FILE_NAME},
    render::Figure,
    session::{Session, SessionOptions},
    VERSION,
};
use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use crossbeam_channel::{unbounded, Receiver};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "activity-recorder")]
#[command(version = VERSION)]
#[command(about = "Record labeled proximity and orientation sensor data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a labeled session
    Record {
        /// Number of proximity sensors
        #[arg(long, default_value = "0")]
        proximity: usize,

        /// Number of orientation (IMU) sensors
        #[arg(long, default_value = "0")]
        orientation: usize,

        /// Record video alongside the sensors
        #[arg(long)]
        camera: bool,

        /// Data sources as a list, e.g. "proximity=2,orientation=1,camera"
        #[arg(long, conflicts_with_all = ["proximity", "orientation", "camera"])]
        sources: Option<String>,

        /// Directory to create the session folder in
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Stop automatically after this many seconds
        #[arg(long)]
        duration: Option<f64>,

        /// Sampling interval in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Label selected at start
        #[arg(long)]
        label: Option<String>,
    },

    /// List the selectable labels and their colors
    Labels,

    /// Show configuration
    Config,

    /// Write the default configuration file
    InitConfig,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Record {
            proximity,
            orientation,
            camera,
            sources,
            output,
            duration,
            tick_ms,
            label,
        } => {
            let request = match sources {
                Some(sources) => SessionRequest::parse(&sources).map_err(anyhow::Error::from),
                None => Ok(SessionRequest::new(proximity, orientation, camera)),
            };
            request.and_then(|request| cmd_record(request, output, duration, tick_ms, label))
        }
        Commands::Labels => cmd_labels(),
        Commands::Config => cmd_config(),
        Commands::InitConfig => cmd_init_config(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn load_config() -> Config {
    Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not load configuration, using defaults");
        Config::default()
    })
}

fn cmd_record(
    request: SessionRequest,
    output: Option<PathBuf>,
    duration: Option<f64>,
    tick_ms: Option<u64>,
    label: Option<String>,
) -> anyhow::Result<()> {
    let mut config = load_config();
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(ms) = tick_ms {
        config.tick_interval = Duration::from_millis(ms.max(1));
    }

    let palette = config.palette();
    let mut current = match label {
        Some(input) => palette
            .resolve(&input)
            .with_context(|| format!("'{input}' is not a configured label"))?,
        None => config.default_label(),
    };

    let session_dir = config
        .output_dir
        .join(format!("session_{}", Utc::now().format("%Y%m%d_%H%M%S")));
    let options = SessionOptions::from_config(&config, session_dir.join(VIDEO_FILE_NAME));

    let capture: Option<Box<dyn VideoCapture>> = if request.camera {
        Some(Box::new(NoopCapture::new()))
    } else {
        None
    };

    let mut session = Session::new(options);
    session
        .start(&request, &SimulatedBackend::new(), capture)
        .context("Could not start recording")?;

    println!("Activity Recorder v{VERSION}");
    println!();
    println!(
        "Recording {} sensor(s) every {}ms",
        session.sensors().len(),
        config.tick_interval.as_millis()
    );
    println!("Session directory: {}", session_dir.display());
    println!();
    println!("Labels (type a name or its first letter, then Enter):");
    for style in palette.styles() {
        println!("  {} ({})", style.name, style.color);
    }
    println!("Current label: {current}");
    println!("Press Ctrl+C to stop");
    println!();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl+C handler")?;

    let labels = spawn_label_reader();
    let ticker = crossbeam_channel::tick(config.tick_interval);
    let mut failed_reads: u64 = 0;

    while running.load(Ordering::SeqCst) {
        if ticker.recv().is_err() {
            break;
        }

        while let Ok(line) = labels.try_recv() {
            match palette.resolve(&line) {
                Some(label) => {
                    println!("[{:8.2}s] label: {label}", session.elapsed_secs());
                    current = label;
                }
                None if line.trim().is_empty() => {}
                None => eprintln!("Unknown label '{}'", line.trim()),
            }
        }

        let elapsed = session.elapsed_secs();
        let report = session.tick(elapsed, &current);
        failed_reads += report.failed as u64;

        if duration.is_some_and(|limit| elapsed >= limit) {
            break;
        }
    }

    println!();
    println!("Stopping recording...");

    let mut figure = Figure::new();
    let mut sink = DirectorySink::new(&session_dir);
    let stopped = match session.stop(&mut figure, &mut sink) {
        Ok(stopped) => stopped,
        Err(e) => {
            // the session keeps its samples after a failed export
            let fallback = std::env::temp_dir().join(session_dir.file_name().unwrap_or_default());
            tracing::warn!(error = %e, fallback = %fallback.display(), "export failed, retrying");
            figure = Figure::new();
            sink = DirectorySink::new(fallback);
            session
                .stop(&mut figure, &mut sink)
                .context("Could not export recording")?
        }
    };
    let manifest = stopped.context("Session was not recording")?;

    if !figure.is_empty() {
        let svg = figure.to_svg().context("Could not render plot")?;
        sink.persist(FIGURE_FILE_NAME, &svg)
            .with_context(|| format!("Could not write {FIGURE_FILE_NAME}"))?;
    }

    println!();
    println!("Session {} ({} ticks)", manifest.session_id, manifest.ticks);
    for sensor in &manifest.sensors {
        println!(
            "  {}: {} samples, {} labeled interval(s) -> {}",
            sensor.name,
            sensor.samples,
            sensor.intervals.len(),
            sensor.file
        );
    }
    if failed_reads > 0 {
        eprintln!("Warning: {failed_reads} sensor read(s) failed during recording");
    }
    println!("Saved to {}", sink.dir().display());

    Ok(())
}

/// Forward stdin lines to the recording loop.
fn spawn_label_reader() -> Receiver<String> {
    let (sender, receiver) = unbounded();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn cmd_labels() -> anyhow::Result<()> {
    let config = load_config();
    println!("Labels");
    println!("======");
    for style in &config.labels {
        let marker = if style.name == config.default_label {
            " (default)"
        } else {
            ""
        };
        println!("  {:<12} {}{}", style.name, style.color, marker);
    }
    println!("  {:<12} {}", "<other>", config.fallback_color);
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    let config = load_config();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_init_config() -> anyhow::Result<()> {
    let config = Config::default();
    config.save().context("Could not save configuration")?;
    config
        .ensure_directories()
        .context("Could not create output directory")?;
    println!("Wrote default configuration to {:?}", Config::config_path());
    Ok(())
}
