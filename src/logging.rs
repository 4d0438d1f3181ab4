//! Logging through `tracing`.
//!
//! The terminal is taken over while presenting, so logs are only emitted when they're sent to a
//! file. `RUST_LOG` overrides the level picked through the command line.

use std::{fs::OpenOptions, io, path::PathBuf, sync::Mutex};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How logs should be emitted.
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: Level,
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: Level::WARN, log_file: None }
    }
}

impl LogConfig {
    /// Build a config out of the number of times `-v` was passed.
    ///
    /// No flag means warnings only, `-v` is info, `-vv` is debug and anything above is trace.
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self { level, log_file: None }
    }

    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }
}

/// Install the global subscriber.
///
/// This does nothing unless a log file is configured.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let layer = fmt::layer().with_writer(Mutex::new(file)).with_ansi(false).with_target(true);
    tracing_subscriber::registry().with(build_env_filter(config.level)).with(layer).init();
    Ok(())
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_str().to_lowercase();
        // Everyone else stays at warn.
        EnvFilter::new(format!("warn,slidedeck={level}"))
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::none(0, Level::WARN)]
    #[case::one(1, Level::INFO)]
    #[case::two(2, Level::DEBUG)]
    #[case::many(7, Level::TRACE)]
    fn verbosity_levels(#[case] verbosity: u8, #[case] expected: Level) {
        assert_eq!(LogConfig::from_verbosity(verbosity).level, expected);
    }

    #[test]
    fn no_file_is_a_noop() {
        assert!(init_logging(&LogConfig::default()).is_ok());
    }
}
