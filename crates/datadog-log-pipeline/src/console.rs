// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::io::{self, Write};
use std::sync::Mutex;

use crate::level::{LogLevel, COLOR_RESET};
use crate::util::lock_or_recover;

/// Synchronized, leveled, colorized mirror of log records to the error
/// stream.
///
/// The sink owns the console lock. Callers never hold it together with the
/// queue or file lock; the crash handler bypasses it entirely with a raw
/// write.
pub(crate) struct ConsoleSink {
    stream: Mutex<Box<dyn Write + Send>>,
    threshold: LogLevel,
}

impl ConsoleSink {
    pub(crate) fn stderr(threshold: LogLevel) -> Self {
        Self::new(Box::new(io::stderr()), threshold)
    }

    pub(crate) fn new(stream: Box<dyn Write + Send>, threshold: LogLevel) -> Self {
        Self {
            stream: Mutex::new(stream),
            threshold,
        }
    }

    /// Mirrors one record as `[LEVEL]: message` with the level bracket
    /// colored. Records below the threshold are skipped; stream failures
    /// are ignored, the console is best-effort.
    pub(crate) fn write(&self, level: LogLevel, message: &str) {
        if level < self.threshold {
            return;
        }
        let mut stream = lock_or_recover(&self.stream);
        let _ = writeln!(
            stream,
            "{}[{}]{}: {}",
            level.color_code(),
            level.as_str(),
            COLOR_RESET,
            message
        );
    }
}
