use std::fs;

use clap::Parser;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};

use ghstamp::cli::Cli;
use ghstamp::services::config::{project_dirs, Config};

/// File logger under the platform data dir; the TUI keeps stderr clean
fn init_logging(spec: &str, to_stderr: bool) -> Option<LoggerHandle> {
    let log_dir = project_dirs()?.data_dir().join("logs");
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create log dir {}: {}", log_dir.display(), e);
        return None;
    }

    let duplicate = if to_stderr {
        Duplicate::Warn
    } else {
        Duplicate::None
    };
    let started = Logger::try_with_env_or_str(spec).and_then(|logger| {
        logger
            .log_to_file(
                FileSpec::default()
                    .directory(&log_dir)
                    .basename("ghstamp")
                    .suffix("log")
                    .suppress_timestamp(),
            )
            .rotate(
                Criterion::Size(64 * 1024),
                Naming::Numbers,
                Cleanup::KeepLogFiles(3),
            )
            .duplicate_to_stderr(duplicate)
            .start()
    });
    match started {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Failed to start logger: {}", e);
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let _logger = init_logging(&config.log_level, !cli.is_tui());
    if let Some(e) = config_error {
        log::warn!("Using default config: {}", e);
    }
    log::info!("Starting ghstamp {}", env!("CARGO_PKG_VERSION"));

    cli.run(&config)
}
