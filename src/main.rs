//! Imustream - IMU streaming control loop
//!
//! Runs the read -> filter -> encode -> transmit loop against a simulated
//! sensor and sends each frame as UDP chunks to the configured target.

use anyhow::{bail, Context, Result};
use imustream::config::StreamConfig;
use imustream::filter::median::MedianFilter;
use imustream::sensor::SimulatedSensor;
use imustream::transport::UdpTransport;
use imustream::{StreamPipeline, FILTER_WINDOW};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Upper bound on a single blocking transport write
const WRITE_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    target: Option<String>,
    sample_rate_hz: Option<u32>,
    max_chunk_size: Option<usize>,
    seed: Option<u64>,
    cycles: Option<u64>,
    save: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("imustream=info".parse()?)
                .add_directive("imustream_core=info".parse()?),
        )
        .init();

    let Some(args) = parse_args()? else {
        return Ok(());
    };

    let config_path = args.config.clone().unwrap_or_else(StreamConfig::path);
    let mut config = StreamConfig::load_from(&config_path);
    apply_overrides(&mut config, &args);
    config.validate().context("Invalid configuration")?;

    if args.save {
        config.save(&config_path)?;
    }

    run(&config, args.cycles)
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    match args.get(i + 1) {
        Some(v) => Ok(v.as_str()),
        None => bail!("{} requires a value", flag),
    }
}

/// Parse command line; `None` means the process should exit successfully
fn parse_args() -> Result<Option<Args>> {
    let argv: Vec<String> = std::env::args().collect();
    let mut args = Args::default();
    let mut i = 1;

    while i < argv.len() {
        match argv[i].as_str() {
            "--version" | "-v" => {
                println!("imustream {}", imustream::VERSION);
                return Ok(None);
            }
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            "--save" => {
                args.save = true;
                i += 1;
                continue;
            }
            flag @ ("--config" | "-c") => {
                args.config = Some(PathBuf::from(value(&argv, i, flag)?));
            }
            flag @ ("--target" | "-t") => {
                args.target = Some(value(&argv, i, flag)?.to_string());
            }
            flag @ ("--rate" | "-r") => {
                let raw = value(&argv, i, flag)?;
                args.sample_rate_hz = Some(
                    raw.parse()
                        .with_context(|| format!("Invalid sample rate: {}", raw))?,
                );
            }
            flag @ "--chunk" => {
                let raw = value(&argv, i, flag)?;
                args.max_chunk_size = Some(
                    raw.parse()
                        .with_context(|| format!("Invalid chunk size: {}", raw))?,
                );
            }
            flag @ "--seed" => {
                let raw = value(&argv, i, flag)?;
                args.seed = Some(raw.parse().with_context(|| format!("Invalid seed: {}", raw))?);
            }
            flag @ ("--cycles" | "-n") => {
                let raw = value(&argv, i, flag)?;
                args.cycles = Some(
                    raw.parse()
                        .with_context(|| format!("Invalid cycle count: {}", raw))?,
                );
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                return Ok(None);
            }
        }
        i += 2;
    }

    Ok(Some(args))
}

fn apply_overrides(config: &mut StreamConfig, args: &Args) {
    if let Some(target) = &args.target {
        config.target = target.clone();
    }
    if let Some(rate) = args.sample_rate_hz {
        config.sample_rate_hz = rate;
    }
    if let Some(chunk) = args.max_chunk_size {
        config.max_chunk_size = chunk;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
}

fn print_help() {
    println!("Usage: imustream [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config PATH     Config file (default: <data_dir>/imustream/config.json)");
    println!("  -t, --target ADDR     UDP peer receiving the chunks");
    println!("  -r, --rate HZ         Sample rate of the control loop");
    println!("      --chunk BYTES     Maximum bytes per transport write");
    println!("      --seed N          Fixed seed for filter pivots and simulated noise");
    println!("  -n, --cycles N        Stop after N cycles (default: run until Ctrl+C)");
    println!("      --save            Write the effective config back to the config file");
    println!("  -v, --version         Show version");
    println!("  -h, --help            Show this help");
    println!();
    println!("Examples:");
    println!("  imustream -t 192.168.1.20:5556 -r 100");
    println!("  imustream --seed 42 --cycles 500");
}

fn run(config: &StreamConfig, cycles: Option<u64>) -> Result<()> {
    info!(
        version = imustream::VERSION,
        target = %config.target,
        rate_hz = config.sample_rate_hz,
        chunk = config.max_chunk_size,
        window = FILTER_WINDOW,
        "Starting imustream"
    );

    let transport = UdpTransport::connect(config.target.as_str())
        .with_context(|| format!("Could not open UDP transport to {}", config.target))?;
    transport.set_write_timeout(Some(WRITE_TIMEOUT))?;

    let sensor = SimulatedSensor::new(config.seed, config.noise_counts, config.spike_probability);
    let filter = match config.seed {
        Some(seed) => MedianFilter::<i16, FILTER_WINDOW>::with_seed(seed),
        None => MedianFilter::<i16, FILTER_WINDOW>::from_entropy(),
    };
    let mut pipeline = StreamPipeline::new(sensor, transport, filter, config.max_chunk_size);

    // Halt between cycles on Ctrl+C
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl+C handler")?;

    pipeline.run(config.sample_interval(), cycles, &running);

    let stats = pipeline.stats();
    info!(
        frames = stats.frames_sent,
        chunks = stats.chunks_sent,
        bytes = stats.bytes_sent,
        sensor_errors = stats.sensor_errors,
        transport_errors = stats.transport_errors,
        fps = stats.frames_per_second(),
        "Done"
    );

    Ok(())
}
