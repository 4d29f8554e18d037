//! # Tilewalk Command Line Driver
//!
//! Finds a route across the floor, walks it at a fixed tick and prints the
//! traced positions. Stands in for the game loop that would normally render them.

use clap::Parser;
use serde::Serialize;
use tilewalk::{
    GridCoordinate, Heading, TilewalkError, TilewalkResult, TravelConfig, Traveller, Waypoint,
};
#[cfg(feature = "dev-tools")]
use tracing::{error, info, Level};

#[cfg(not(feature = "dev-tools"))]
use log::{error, info};

/// Command line arguments for the Tilewalk driver.
#[derive(Parser, Debug)]
#[command(name = "tilewalk")]
#[command(about = "Find and trace a route across an isometric tile floor")]
#[command(version)]
struct Args {
    /// Cell to start from, as x,y
    #[arg(long, value_parser = parse_cell, default_value = "0,0")]
    from: GridCoordinate,

    /// Cell to travel to, as x,y
    #[arg(long, value_parser = parse_cell)]
    to: GridCoordinate,

    /// Largest valid x cell index (overrides the config file)
    #[arg(long)]
    width: Option<u32>,

    /// Largest valid y cell index (overrides the config file)
    #[arg(long)]
    height: Option<u32>,

    /// Travel speed in world units per second (overrides the config file)
    #[arg(long)]
    velocity: Option<f32>,

    /// JSON file with a travel configuration
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Simulation tick in seconds
    #[arg(long, default_value_t = tilewalk::config::DEFAULT_TICK_SECONDS)]
    tick: f32,

    /// Give up after this many simulated seconds
    #[arg(long, default_value_t = 600.0)]
    max_seconds: f32,

    /// Print the whole trace as JSON instead of one line per tick
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// One sampled tick of a walk.
#[derive(Debug, Serialize)]
struct TraceSample {
    time: f32,
    position: Waypoint,
    heading: Option<Heading>,
}

/// Everything the driver reports about a walk.
#[derive(Debug, Serialize)]
struct TraceReport {
    route: Vec<GridCoordinate>,
    waypoints: Vec<Waypoint>,
    samples: Vec<TraceSample>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = initialize_logging(&args.log_level) {
        eprintln!("{}", e);
        std::process::exit(2);
    }

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> TilewalkResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        let level: log::LevelFilter = log_level.parse().map_err(|_| {
            TilewalkError::InvalidConfig(format!("unknown log level '{}'", log_level))
        })?;

        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .init();
    }

    Ok(())
}

/// Builds the travel configuration from the optional file and flag overrides.
fn load_config(args: &Args) -> TilewalkResult<TravelConfig> {
    let mut config = match &args.config {
        Some(path) => TravelConfig::from_json_file(path)?,
        None => TravelConfig::new(),
    };

    if let Some(width) = args.width {
        config.map_width = width;
    }
    if let Some(height) = args.height {
        config.map_height = height;
    }
    if let Some(velocity) = args.velocity {
        config.velocity = velocity;
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> TilewalkResult<()> {
    if !(args.tick.is_finite() && args.tick > 0.0) {
        return Err(TilewalkError::InvalidConfig(format!(
            "tick must be positive, got {}",
            args.tick
        )));
    }

    let config = load_config(args)?;
    info!("Starting Tilewalk v{}", tilewalk::VERSION);
    info!(
        "Floor {}x{} cells, {} units per cell, {} units/s",
        config.map_width + 1,
        config.map_height + 1,
        config.cell_size,
        config.velocity
    );

    let mut traveller = Traveller::new(config, args.from)?;
    let route = traveller.travel_to(args.to)?.to_vec();
    let waypoints = traveller.transform().route_to_world(&route);

    let mut samples = vec![TraceSample {
        time: 0.0,
        position: traveller.position()?,
        heading: traveller.heading()?,
    }];
    let mut time = 0.0;

    while traveller.is_moving() {
        if time >= args.max_seconds {
            return Err(TilewalkError::InvalidState(format!(
                "walk did not finish within {}s",
                args.max_seconds
            )));
        }

        let position = traveller.tick(args.tick)?;
        time += args.tick;
        samples.push(TraceSample {
            time,
            position,
            heading: traveller.heading()?,
        });
    }

    info!("Arrived at {} after {:.2}s", traveller.cell(), time);

    if args.json {
        let report = TraceReport {
            route,
            waypoints,
            samples,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let cells: Vec<String> = route.iter().map(ToString::to_string).collect();
        println!("route: {}", cells.join(" -> "));
        for sample in &samples {
            let heading = sample
                .heading
                .map(|h| format!("{:?}", h))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:8.3}s  ({:8.2}, {:8.2}, {:8.2})  {}",
                sample.time, sample.position.x, sample.position.y, sample.position.z, heading
            );
        }
    }

    Ok(())
}

/// Parses a cell given as `x,y`.
fn parse_cell(value: &str) -> Result<GridCoordinate, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", value))?;
    let x = x.trim().parse::<i32>().map_err(|e| format!("bad x in '{}': {}", value, e))?;
    let y = y.trim().parse::<i32>().map_err(|e| format!("bad y in '{}': {}", value, e))?;
    Ok(GridCoordinate::new(x, y))
}
