use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flock_core::{Coords, Frame, Scenario, ScenarioConfig};
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

const WARMUP_TICKS: usize = 10;
const BENCHMARK_TICKS: usize = 200;
/// One tick per rendered frame at 60 frames per second.
const TARGET_TPS: f64 = 60.0;

#[derive(Parser)]
#[command(name = "flock")]
#[command(about = "Boids simulation over planar and toroidal worlds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and stream position frames as JSON lines
    Run {
        /// Path to config file (JSON). Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file for the frame stream (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Number of frames to produce
        #[arg(long, default_value_t = 600)]
        frames: usize,

        /// Frames per emitted line
        #[arg(long, default_value_t = 60)]
        batch: usize,

        /// Decimal places of every coordinate
        #[arg(long, default_value_t = 2)]
        digits: usize,
    },
    /// Measure tick throughput across populations
    Benchmark,
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

/// A number written with exactly `digits` decimal places.
#[derive(Clone, Copy, Debug)]
struct FixedDecimal {
    value: f64,
    digits: usize,
}

impl Serialize for FixedDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = format!("{:.*}", self.digits, self.value);
        let raw = RawValue::from_string(text).map_err(serde::ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

#[derive(Serialize)]
struct FixedCoords {
    x: FixedDecimal,
    y: FixedDecimal,
}

impl FixedCoords {
    fn new(coords: &Coords, digits: usize) -> Self {
        Self {
            x: FixedDecimal {
                value: coords.x,
                digits,
            },
            y: FixedDecimal {
                value: coords.y,
                digits,
            },
        }
    }
}

fn fixed_frame(frame: &Frame, digits: usize) -> Vec<FixedCoords> {
    frame.iter().map(|c| FixedCoords::new(c, digits)).collect()
}

fn load_config(path: Option<&PathBuf>) -> Result<ScenarioConfig> {
    let config: ScenarioConfig = match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open config file {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file)).context("failed to parse config")?
        }
        None => ScenarioConfig::default(),
    };
    config.validate().context("Config validation error")?;
    Ok(config)
}

fn run(
    config: ScenarioConfig,
    frames: usize,
    batch: usize,
    digits: usize,
    out: &mut dyn Write,
) -> Result<()> {
    anyhow::ensure!(batch > 0, "batch must be positive");
    let mut scenario = Scenario::new(config).context("failed to initialise scenario")?;

    let mut pending = Vec::with_capacity(batch);
    for _ in 0..frames {
        let frame = scenario.next_frame().context("tick failed")?;
        pending.push(fixed_frame(&frame, digits));
        if pending.len() == batch {
            serde_json::to_writer(&mut *out, &pending).context("failed to write frames")?;
            writeln!(out)?;
            pending.clear();
        }
    }
    if !pending.is_empty() {
        serde_json::to_writer(&mut *out, &pending).context("failed to write frames")?;
        writeln!(out)?;
    }
    out.flush()?;

    info!(
        ticks = scenario.tick(),
        time = scenario.time().as_secs_f64(),
        "run complete"
    );
    Ok(())
}

fn run_benchmark(population: usize) -> Result<()> {
    let config = ScenarioConfig {
        population,
        ..ScenarioConfig::default()
    };
    let mut scenario = Scenario::new(config).context("Benchmark scenario init error")?;

    for _ in 0..WARMUP_TICKS {
        scenario.evolve()?;
    }

    let start = Instant::now();
    for _ in 0..BENCHMARK_TICKS {
        scenario.evolve()?;
    }
    let total_us = start.elapsed().as_micros() as f64;

    let avg_tick_us = total_us / BENCHMARK_TICKS as f64;
    let ticks_per_sec = 1_000_000.0 / avg_tick_us.max(f64::EPSILON);

    println!("--- {population} agents ---");
    println!("  Avg tick:      {avg_tick_us:.0} us ({ticks_per_sec:.1} ticks/sec)");
    let verdict = if ticks_per_sec >= TARGET_TPS {
        "GO"
    } else {
        "NO-GO"
    };
    println!("  Verdict:       {verdict} (target: >={TARGET_TPS} ticks/sec)");
    println!();
    Ok(())
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::DumpDefaultConfig => {
            let config = ScenarioConfig::default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Benchmark => {
            if cfg!(debug_assertions) {
                eprintln!("WARNING: running in debug mode. Results are not representative.");
                eprintln!("         Use: cargo run -p flock-cli --release -- benchmark");
                eprintln!();
            }
            println!("=== Flock Tick Benchmark ===");
            println!("Warmup: {WARMUP_TICKS} ticks, Benchmark: {BENCHMARK_TICKS} ticks");
            println!("Target: >={TARGET_TPS} ticks/sec");
            println!();

            for population in [100, 400, 1000, 2000] {
                run_benchmark(population)?;
            }
        }
        Commands::Run {
            config,
            out,
            frames,
            batch,
            digits,
        } => {
            let scenario_config = load_config(config.as_ref())?;
            info!(frames, batch, "running scenario");
            match out {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    run(scenario_config, frames, batch, digits, &mut BufWriter::new(file))?;
                }
                None => {
                    let stdout = io::stdout();
                    run(
                        scenario_config,
                        frames,
                        batch,
                        digits,
                        &mut BufWriter::new(stdout.lock()),
                    )?;
                }
            }
        }
    }
    Ok(())
}
