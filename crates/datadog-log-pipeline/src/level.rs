// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Log severity levels.
//!
//! This module defines the `LogLevel` enum and provides parsing from strings
//! (case-insensitive), rendering to the uppercase names used in log files,
//! and the ANSI color used when mirroring to the console.
//!
//! # Log Levels
//!
//! The pipeline supports four levels, ordered by increasing severity:
//! - **DEBUG**: lower priority information for debugging
//! - **INFO**: useful information about normal operations
//! - **WARN**: hazardous situations that may lead to errors
//! - **ERROR**: serious errors that prevent normal operation
//!
//! The derived ordering drives both the console threshold and the
//! flush-on-severe-batch policy.

use std::fmt;
use std::str::FromStr;

/// ANSI escape that restores the console's default color.
pub(crate) const COLOR_RESET: &str = "\x1b[0m";

/// Severity of a log record, ordered `Debug < Info < Warn < Error`.
///
/// # Parsing
///
/// Levels parse from strings case-insensitively:
/// ```
/// use datadog_log_pipeline::LogLevel;
/// use std::str::FromStr;
///
/// assert_eq!(LogLevel::from_str("warn").unwrap(), LogLevel::Warn);
/// assert_eq!(LogLevel::from_str("ERROR").unwrap(), LogLevel::Error);
/// ```
///
/// # Ordering
///
/// ```
/// use datadog_log_pipeline::LogLevel;
///
/// assert!(LogLevel::Debug < LogLevel::Info);
/// assert!(LogLevel::Warn < LogLevel::Error);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Lower priority information useful for debugging.
    Debug,
    /// Useful information about normal operations.
    Info,
    /// Hazardous situations that may lead to errors.
    Warn,
    /// Serious errors that prevent normal operation.
    Error,
}

impl LogLevel {
    /// Uppercase name as written to log files and the console.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// ANSI escape that colors this level's console line.
    pub(crate) fn color_code(self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
        }
    }

    /// Converts this level to a `log::LevelFilter` for use with the `log`
    /// crate.
    #[must_use]
    pub fn as_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl AsRef<str> for LogLevel {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses log levels from strings with case-insensitive matching.
///
/// # Errors
///
/// Returns an error string describing the invalid input and listing the
/// valid options.
impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!(
                "Invalid log level: '{s}'. Valid levels are: debug, info, warn, error",
            )),
        }
    }
}

/// Maps the `log` crate's levels onto the pipeline's four levels. `Trace`
/// has no counterpart and folds into `Debug`.
impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}
