//! Rep tracker CLI
//!
//! Replays pose landmarks from a JSON Lines file (or stdin) through the rep
//! counter and prints per-limb progress for every frame.
//!
//! Usage:
//!     reptrack frames.jsonl
//!     pose-detector | reptrack --format json
//!     reptrack --config reptrack.toml frames.jsonl

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reptrack_app::{format_frame, AppConfig, FrameReader, OutputFormat, Session};
use reptrack_core::Error;

/// Count arm repetitions from a stream of pose landmarks
#[derive(Parser)]
#[command(name = "reptrack")]
#[command(version)]
#[command(about = "Count left/right arm repetitions from pose landmarks", long_about = None)]
struct Cli {
    /// JSON Lines landmark file; reads stdin when omitted
    input: Option<PathBuf>,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-frame output format, overriding the configuration
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Skip the session summary
    #[arg(long)]
    no_summary: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries frame output, so logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::from_env().context("Failed to load config from environment")?,
    };

    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if cli.no_summary {
        config.output.summary = false;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let processor = config.build_processor()?;
    let mut session = Session::new(processor);

    let reader = FrameReader::new(open_input(cli.input.as_ref())?);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    session.start();

    for frame in reader {
        let frame = match frame {
            Ok(frame) => frame,
            Err(Error::Serialization(msg)) => {
                tracing::warn!("Skipping frame: {msg}");
                continue;
            }
            Err(e) => return Err(e).context("Failed to read landmarks"),
        };

        let Some(result) = session.process(&frame) else {
            continue;
        };

        match config.output.format {
            OutputFormat::Text => writeln!(out, "{}", format_frame(&result))?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&result)?)?,
        }
    }

    session.stop();

    if config.output.summary {
        let summary = session.summary();
        match config.output.format {
            OutputFormat::Text => {
                let totals: Vec<String> = summary
                    .reps
                    .iter()
                    .map(|(limb, count)| format!("{limb}: {} reps", *count as u32))
                    .collect();
                writeln!(
                    out,
                    "Session: {} frames, {}",
                    summary.frames_processed,
                    totals.join(", ")
                )?;
            }
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&summary)?)?,
        }
    }

    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run(cli)
}
