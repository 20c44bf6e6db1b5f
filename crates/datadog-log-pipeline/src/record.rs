// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::level::LogLevel;

/// A single log record flowing through the pipeline.
///
/// The timestamp is rendered at enqueue time, inside the producer's `log()`
/// call. A record written long after it was logged still shows the time the
/// call happened, not the time the batch reached disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    /// Wall-clock time of the `log()` call, already formatted as `HH:MM:SS`.
    pub timestamp: String,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>, timestamp: String) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp,
        }
    }

    /// Renders the record as one log-file line, without a trailing newline:
    /// `[HH:MM:SS] [LEVEL]: message`.
    #[must_use]
    pub fn as_file_line(&self) -> String {
        format!(
            "[{}] [{}]: {}",
            self.timestamp,
            self.level.as_str(),
            self.message
        )
    }
}
