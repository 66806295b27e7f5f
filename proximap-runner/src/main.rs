mod events;

use clap::Parser;
use log::{error, info, warn};
use proximap_config::{load_config, Config};
use proximap_simulation::{AlertLog, Jitter, Session};
use proximap_transport::TransportController;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use crate::events::{apply, parse_line, Flow};

#[derive(Parser, Debug)]
#[command(author, version, about = "Proximity alerts over a live roster of user positions", long_about = None)]
struct Args {
    /// Path to the session configuration file (JSON, or TOML by extension).
    /// The built-in demo seed is used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read host events from this file instead of standard input
    #[arg(short, long, conflicts_with = "clicks")]
    script: Option<PathBuf>,

    /// Run a demo of N random marker clicks instead of reading events
    #[arg(long)]
    clicks: Option<u32>,

    /// Pause between demo clicks, in milliseconds
    #[arg(long, default_value_t = 500)]
    interval_ms: u64,

    /// Seed for the click jitter, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => {
                info!("Using configuration from {}", path.display());
                config
            }
            Err(e) => {
                error!("Failed to load config: {}", e);
                process::exit(1);
            }
        },
        None => {
            info!("No configuration given, using the demo seed");
            Config::default()
        }
    };

    let mut session = match build_session(&config) {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to start session: {}", e);
            process::exit(1);
        }
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Publish the starting state before any event arrives
    session.refresh();

    let result = match (args.clicks, &args.script) {
        (Some(clicks), _) => {
            run_demo(&mut session, &mut rng, clicks, Duration::from_millis(args.interval_ms));
            Ok(())
        }
        (None, Some(path)) => File::open(path).and_then(|file| run_events(&mut session, &mut rng, BufReader::new(file))),
        (None, None) => run_events(&mut session, &mut rng, io::stdin().lock()),
    };

    if let Err(e) = result {
        error!("Failed to read events: {}", e);
        process::exit(1);
    }

    info!("Session finished after {} recompute(s)", session.revision());
}

fn build_session(config: &Config) -> Result<Session, Box<dyn std::error::Error>> {
    let roster = config.build_roster()?;
    let mut session = Session::new(roster, config.threshold_distance)?
        .with_jitter(Jitter::new(config.jitter.span_degrees));

    session.subscribe(AlertLog::new());
    session.subscribe(TransportController::from_config(&config.transport)?);

    Ok(session)
}

/// Reads host events line by line until end of input or `quit`.
/// Bad lines, including ones that are not valid UTF-8, are reported and skipped.
fn run_events<R: BufRead>(session: &mut Session, rng: &mut StdRng, mut input: R) -> io::Result<()> {
    let mut buf = Vec::new();
    let mut number = 0usize;

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        number += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                warn!("Line {}: {}", number, e);
                continue;
            }
        };

        let event = match parse_line(line) {
            None => continue,
            Some(Ok(event)) => event,
            Some(Err(e)) => {
                warn!("Line {}: {}", number, e);
                continue;
            }
        };

        match apply(session, &event, rng) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Stop) => break,
            Err(e) => warn!("Line {}: {}", number, e),
        }
    }
    Ok(())
}

/// Clicks random markers, one every `interval`.
fn run_demo(session: &mut Session, rng: &mut StdRng, clicks: u32, interval: Duration) {
    info!("Running {} random clicks, one every {:?}", clicks, interval);

    for _ in 0..clicks {
        let index = rng.gen_range(0..session.roster().len());
        let id = session.roster().as_slice()[index].id().clone();

        if let Err(e) = session.nudge(&id, rng) {
            warn!("Click on {} failed: {}", id, e);
        }

        if !interval.is_zero() {
            spin_sleep::sleep(interval);
        }
    }
}
