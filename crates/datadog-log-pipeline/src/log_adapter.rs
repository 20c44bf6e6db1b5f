// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Bridge from the [`log`] facade to the pipeline.
//!
//! Lets code written against `log::info!` and friends feed the pipeline
//! without knowing about it:
//!
//! ```no_run
//! datadog_log_pipeline::log_adapter::install().ok();
//! log::warn!("cache miss rate above 20%");
//! ```

use crate::level::LogLevel;

struct PipelineLogger;

static LOGGER: PipelineLogger = PipelineLogger;

/// Routes the global [`log`] macros into the pipeline and opens them up to
/// every level. Fails if another logger is already installed.
pub fn install() -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

impl log::Log for PipelineLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        // Level filtering happens inside the pipeline.
        true
    }

    fn log(&self, record: &log::Record) {
        // The facade only errs on first-use setup failure; a logger trait
        // method has nowhere to surface that.
        let _ = crate::log(LogLevel::from(record.level()), record.args().to_string());
    }

    fn flush(&self) {}
}
