use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flock_cli::driver::{DriverOptions, FrameSink, JsonLinesSink, NullSink, TickDriver};
use flock_cli::settings::{load_settings, Overrides};
use flock_cli::{DEFAULT_POPULATION, MAX_POPULATION};
use flock_core::{Flock, FlockConfig, Seed};
use flock_shared::SimulationSettings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless boid flocking simulation", long_about = None)]
struct Args {
    /// JSON settings file (camelCase field names, all optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of agents
    #[arg(short = 'n', long, default_value_t = DEFAULT_POPULATION)]
    count: usize,

    /// Boundary width, overrides the settings file
    #[arg(long)]
    width: Option<f32>,

    /// Boundary height, overrides the settings file
    #[arg(long)]
    height: Option<f32>,

    #[arg(long)]
    max_speed: Option<f32>,

    #[arg(long)]
    max_force: Option<f32>,

    #[arg(long)]
    alignment_weight: Option<f32>,

    #[arg(long)]
    cohesion_weight: Option<f32>,

    #[arg(long)]
    separation_weight: Option<f32>,

    /// Seed for initial positions and velocities; random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Target ticks per second
    #[arg(long, default_value_t = 60.0)]
    rate: f64,

    /// Run as fast as possible instead of at the target rate
    #[arg(long)]
    unthrottled: bool,

    /// Write a frame every N ticks
    #[arg(long, default_value_t = 1)]
    frame_every: u64,

    /// Frame output file (JSON lines); '-' for stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Update agents in parallel
    #[arg(long)]
    parallel: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            width: self.width,
            height: self.height,
            max_speed: self.max_speed,
            max_force: self.max_force,
            alignment_weight: self.alignment_weight,
            cohesion_weight: self.cohesion_weight,
            separation_weight: self.separation_weight,
        }
    }
}

fn open_sink(output: Option<&PathBuf>) -> Result<Box<dyn FrameSink>> {
    let sink: Box<dyn FrameSink> = match output {
        None => Box::new(NullSink),
        Some(path) if path.as_os_str() == "-" => Box::new(JsonLinesSink::new(io::stdout().lock())),
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Box::new(JsonLinesSink::new(BufWriter::new(file)))
        }
    };
    Ok(sink)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    if args.count > MAX_POPULATION {
        anyhow::bail!(
            "Population {} is larger than the supported maximum of {}",
            args.count,
            MAX_POPULATION
        );
    }
    if args.parallel && !cfg!(feature = "parallel") {
        anyhow::bail!("--parallel requires flock-cli to be built with the `parallel` feature");
    }

    let settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => SimulationSettings::default(),
    };
    let config = FlockConfig::from(args.overrides().apply(settings));
    config.validate().context("Invalid simulation settings")?;

    let seed = match args.seed {
        Some(seed) => Seed(seed),
        None => Seed::from_entropy().context("Failed to draw a random seed")?,
    };
    log::info!("Seed: {}", seed.0);

    let flock = Flock::<MAX_POPULATION>::seeded(args.count, config, seed)
        .context("Failed to initialize flock")?;

    let options = DriverOptions {
        ticks: args.ticks,
        tick_rate: if args.unthrottled { None } else { Some(args.rate) },
        frame_every: args.frame_every,
        parallel: args.parallel,
    };
    let mut driver = TickDriver::new(flock, options);
    let mut sink = open_sink(args.output.as_ref())?;

    let summary = driver.run(sink.as_mut()).context("Simulation error")?;

    log::info!(
        "Finished: {} agents, {} ticks, mean speed {:.3}, max speed {:.3}",
        summary.population,
        summary.ticks,
        summary.mean_speed,
        summary.max_speed_observed
    );

    Ok(())
}
