// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::Local;

/// Wall-clock source for rotation dates and record timestamps.
///
/// The pipeline consumes time exclusively through this trait: the writer
/// asks for the calendar date before every batch, and the facade stamps each
/// record at enqueue time. Tests substitute a manual implementation to drive
/// date-boundary rotation deterministically.
pub trait Clock: Send + Sync {
    /// Current local calendar date, formatted `YYYY-MM-DD`.
    fn date(&self) -> String;

    /// Current local time of day, formatted `HH:MM:SS`.
    fn time_of_day(&self) -> String;
}

/// System wall clock in the process's local time zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn date(&self) -> String {
        Local::now().format("%Y-%m-%d").to_string()
    }

    fn time_of_day(&self) -> String {
        Local::now().format("%H:%M:%S").to_string()
    }
}
