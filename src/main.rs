use std::{
    io::{BufRead, Write},
    path::PathBuf,
    process::exit,
    time::{Duration, SystemTime},
};

use clap::Parser;
use config::EngineConfig;
use console::{CommandResult, ConsoleInterface};
use log::{LevelFilter, debug, error, info};

mod board;
mod computer;
mod config;
mod console;
mod error;
mod game;
mod human_turn;
mod move_validation;
mod moves;

build_info::build_info!(fn build_info);

#[derive(Parser, Debug)]
#[command(version, about = "Play checkers against a greedy computer opponent")]
struct Args {
    /// Board size, overrides the config file
    #[arg(short, long)]
    board_size: Option<usize>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Also write the log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = setup_logging(&args) {
        eprintln!("Failed to set up logging: {e}");
        exit(1);
    }
    log_panics::init();

    let info = build_info();
    let built = SystemTime::UNIX_EPOCH + Duration::from_secs(info.timestamp.timestamp().max(0) as u64);
    let banner = format!(
        "{} {} ({}, built {})",
        info.crate_info.name,
        info.crate_info.version,
        info.profile,
        humantime::format_rfc3339_seconds(built)
    );
    info!("Starting {banner}");

    let mut config = match &args.config {
        Some(path) => EngineConfig::load_or_default(path),
        None => Ok(EngineConfig::default()),
    }
    .unwrap_or_else(|e| {
        error!("{e}");
        exit(1);
    });
    if let Some(board_size) = args.board_size {
        config.board_size = board_size;
    }
    if let Err(e) = config.validate() {
        error!("{e}");
        exit(1);
    }
    debug!("Using {config:?}");

    let mut console = ConsoleInterface::new(config, banner.clone()).unwrap_or_else(|e| {
        error!("{e}");
        exit(1);
    });

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let _ = writeln!(out, "{banner}\nYou are light (l), moving up. Type 'help' for commands.\n");
    let _ = writeln!(out, "{}", console.game().board());
    let _ = out.flush();

    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read from stdin: {e}");
                break;
            }
        };

        match console.process_command(&line, &mut out) {
            Ok(CommandResult::Quit) => break,
            Ok(CommandResult::Continue) => {}
            Err(e) => {
                let _ = writeln!(out, "{e}");
            }
        }
        let _ = out.flush();
    }

    info!("Exiting");
}

fn setup_logging(args: &Args) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(args.log_level)
        .chain(std::io::stderr());

    if let Some(path) = &args.log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}
