// src/logging.rs

//! Logging setup for `taskmail` using `tracing` + `tracing-subscriber`.
//!
//! The level comes from `--log-level`, then `TASKMAIL_LOG`, then `warn`.
//! taskmail usually runs unattended from a scheduler, so it is quiet unless
//! asked otherwise. Logs always go to STDERR.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "TASKMAIL_LOG";

const DEFAULT_LEVEL: Level = Level::WARN;

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Initialise the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = effective_level(cli_level, std::env::var(LOG_ENV_VAR).ok().as_deref());

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("initialising logging: {e}"))
}

fn effective_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Level {
    cli_level
        .map(Level::from)
        .or_else(|| env_value.and_then(level_from_env))
        .unwrap_or(DEFAULT_LEVEL)
}

/// `tracing`'s own names (any case), plus `warning`.
fn level_from_env(value: &str) -> Option<Level> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("warning") {
        return Some(Level::WARN);
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flag_beats_environment() {
        assert_eq!(effective_level(Some(LogLevel::Debug), Some("error")), Level::DEBUG);
    }

    #[test]
    fn environment_used_when_no_flag() {
        assert_eq!(effective_level(None, Some(" Warning ")), Level::WARN);
        assert_eq!(effective_level(None, Some("TRACE")), Level::TRACE);
        assert_eq!(effective_level(None, Some("info")), Level::INFO);
    }

    #[test]
    fn default_is_warn() {
        assert_eq!(effective_level(None, None), Level::WARN);
        assert_eq!(effective_level(None, Some("loud")), Level::WARN);
    }
}
