//! Runs a four-module swerve drivetrain against simulated hardware
//!
//! Loads a drivetrain configuration, binds one module controller per
//! configured module, and drives a short scripted sequence while logging
//! module states.

mod config;
mod runner;

use clap::Parser;
use log::{error, info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::AppConfig;
use crate::runner::Runner;

#[derive(Parser, Debug)]
#[command(name = "swerve-module-app", about = "Swerve module controller on simulated hardware")]
struct Args {
    /// Drivetrain configuration (JSON); defaults to a square four-module robot
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of control periods to run
    #[arg(short, long, default_value_t = 200)]
    ticks: usize,

    /// Log per-tick controller output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { LevelFilter::Trace } else { LevelFilter::Info };
    if let Err(err) = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto) {
        eprintln!("failed to initialise logger: {}", err);
    }

    let config = match &args.config {
        Some(path) => match AppConfig::load(path) {
            Ok(config) => {
                info!("loaded {}", path.display());
                config
            }
            Err(err) => {
                error!("{}", err);
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };

    let mut runner = match Runner::new(&config) {
        Ok(runner) => runner,
        Err(err) => {
            error!("failed to bind modules: {}", err);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "running {} modules for {} ticks at {:.0} Hz",
        config.modules.len(),
        args.ticks,
        1.0 / config.period
    );
    for report in runner.run(args.ticks) {
        match (report.state, report.position) {
            (Some(state), Some(position)) => info!(
                "{}: final {:+.2} m/s @ {:+.1} deg, travelled {:+.3} m, {} faults",
                report.name,
                state.speed,
                state.angle.degrees(),
                position.distance,
                report.faults
            ),
            _ => warn!("{}: final state unreadable, {} faults", report.name, report.faults),
        }
    }
    ExitCode::SUCCESS
}
