use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt::{self},
    prelude::*,
};

/// Target prefix shared by the engine library and this binary.
const MELTING_TARGET: &str = "melting";

/// Installs the global subscriber for a `melting` run.
///
/// `-v` raises the `melting` targets from WARN to INFO, DEBUG and TRACE.
/// Other crates never log below WARN and `--quiet` silences everything.
/// With `--log-file` every event is also written, without colours, to that file.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let level_filter = if quiet {
        LevelFilter::OFF
    } else {
        match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(melting_targets(level_filter))
        .with(stderr_layer);

    if let Some(path) = log_file {
        let file = File::create(&path).map_err(CliError::Io)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_target(true);

        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }

    Ok(())
}

fn melting_targets(level: LevelFilter) -> Targets {
    Targets::new()
        .with_target(MELTING_TARGET, level)
        .with_default(level.min(LevelFilter::WARN))
}
