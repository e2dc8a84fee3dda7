use std::io;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use indicatif::HumanDuration;
use log::{debug, info, warn};

use dupe_finder::signal::{self, EXIT_CODE_INTERRUPTED};
use dupe_finder::{Cli, ConfigError, find_duplicates, init_logging};

fn run(cli: Cli) -> Result<ExitCode> {
    let start_time = Instant::now();
    let config = cli.search_config()?;
    init_logging(config.verbose, cli.json).context("Failed to initialize logger")?;

    info!("Starting dupe-finder v{}", env!("CARGO_PKG_VERSION"));
    debug!("Command line arguments: {:?}", cli);

    let roots = match cli.search_roots() {
        Ok(roots) => roots,
        Err(e @ ConfigError::NoValidRoots) => {
            Cli::command().print_help()?;
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    info!("Recursive depth: {}", config.max_depth);
    info!(
        "File filter: {}",
        config.suffix.as_ref().map_or("none", |s| s.as_str())
    );
    debug!("Hash algorithm: {:?}, threads: {}", config.hash, config.threads);

    let shutdown_flag =
        signal::install_handler().context("Failed to install Ctrl+C handler")?;
    let report = find_duplicates(&roots, config, Some(shutdown_flag))?;

    let mut stdout = io::stdout().lock();
    if cli.json {
        report.write_json(&mut stdout)?;
    } else {
        report.write_text(&mut stdout)?;
    }

    info!("Completed in {}", HumanDuration(start_time.elapsed()));
    if report.interrupted {
        warn!("Scan was interrupted, results are partial");
        return Ok(ExitCode::from(EXIT_CODE_INTERRUPTED));
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    run(Cli::parse())
}
