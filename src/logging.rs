use std::{fs::File, path::Path};

use env_logger::{Builder, Logger, Target, WriteStyle};
use log::{LevelFilter, Log, Metadata, Record, info};

use crate::clients::errors::Result;

const CRATE_TARGET: &str = "likesync";

/// Console level for the number of `-v` flags given
pub fn console_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

// Sends every record to the console logger and, when configured, to the log file
struct TeeLogger {
    console: Logger,
    file: Option<Logger>,
}

impl TeeLogger {
    fn max_level(&self) -> LevelFilter {
        let console = self.console.filter();
        self.file
            .as_ref()
            .map_or(console, |f| console.max(f.filter()))
    }
}

impl Log for TeeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.console.enabled(metadata) || self.file.as_ref().is_some_and(|f| f.enabled(metadata))
    }

    fn log(&self, record: &Record) {
        self.console.log(record);
        if let Some(file) = &self.file {
            file.log(record);
        }
    }

    fn flush(&self) {
        self.console.flush();
        if let Some(file) = &self.file {
            file.flush();
        }
    }
}

fn build_logger(verbosity: u8, log_file: Option<&Path>) -> Result<TeeLogger> {
    // RUST_LOG, when set, wins over the verbosity flags
    let console = Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module(CRATE_TARGET, console_level(verbosity))
        .parse_default_env()
        .build();

    let file = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let f = File::create(path)?;
            Some(
                Builder::new()
                    .filter_level(LevelFilter::Info)
                    .filter_module(CRATE_TARGET, LevelFilter::Trace)
                    .write_style(WriteStyle::Never)
                    .target(Target::Pipe(Box::new(f)))
                    .build(),
            )
        }
        None => None,
    };

    Ok(TeeLogger { console, file })
}

/// Install the global logger.
///
/// The console shows `info` by default, `-v` adds debug and `-vv` trace.
/// A log file, if given, always receives trace output of this crate.
pub fn init_logging(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
    let logger = build_logger(verbosity, log_file)?;
    let max_level = logger.max_level();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(max_level);

    info!(
        "Console verbosity set to {verbosity} ({}).",
        console_level(verbosity)
    );
    if let Some(path) = log_file {
        info!("Writing trace log to {path:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use tempfile::TempDir;

    #[test]
    fn test_console_level() {
        assert_eq!(console_level(0), LevelFilter::Info);
        assert_eq!(console_level(1), LevelFilter::Debug);
        assert_eq!(console_level(2), LevelFilter::Trace);
        assert_eq!(console_level(7), LevelFilter::Trace);
    }

    #[test]
    fn test_file_receives_trace_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log").join("likesync.log");
        let logger = build_logger(0, Some(&path)).unwrap();
        assert_eq!(logger.max_level(), LevelFilter::Trace);

        logger.log(
            &Record::builder()
                .args(format_args!("fetched page 2"))
                .level(Level::Trace)
                .target("likesync::syncer")
                .build(),
        );
        logger.flush();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("fetched page 2"));
    }

    #[test]
    fn test_no_file_logger_by_default() {
        let logger = build_logger(0, None).unwrap();
        assert!(logger.file.is_none());
    }
}
