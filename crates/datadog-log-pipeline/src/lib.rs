// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! Asynchronous logging pipeline with date-based file rotation.
//!
//! Producer threads hand records to [`log()`], which mirrors them to stderr
//! in color and enqueues them on a bounded queue; a dedicated writer thread
//! drains the queue in batches into `logs/<date>/<index>.log`. A full queue
//! blocks producers instead of dropping records, and crash signals flush
//! whatever has been accepted before the process dies.
//!
//! The process-wide pipeline starts itself on the first call:
//!
//! ```no_run
//! use datadog_log_pipeline::LogLevel;
//!
//! datadog_log_pipeline::info("engine started")?;
//! datadog_log_pipeline::log(LogLevel::Error, "device lost")?;
//! datadog_log_pipeline::shutdown();
//! # Ok::<(), datadog_log_pipeline::PipelineError>(())
//! ```
//!
//! Embedders that want their own isolated instance (or their own clock)
//! construct a [`Pipeline`] directly instead.

use std::sync::Arc;

use once_cell::sync::OnceCell;

mod clock;
mod config;
pub mod constants;
mod console;
mod crash;
mod errors;
mod file_sink;
mod level;
pub mod log_adapter;
mod pipeline;
mod queue;
mod record;
mod util;
mod writer;

pub use clock::{Clock, SystemClock};
pub use config::PipelineConfig;
pub use errors::PipelineError;
pub use level::LogLevel;
pub use pipeline::{Pipeline, PipelineState};
pub use record::LogRecord;

static PIPELINE: OnceCell<Pipeline> = OnceCell::new();

/// One-time setup for the process-wide pipeline. A failed attempt leaves
/// the cell empty, so the next caller retries instead of inheriting a
/// half-built pipeline.
fn global() -> Result<&'static Pipeline, PipelineError> {
    PIPELINE.get_or_try_init(|| {
        let pipeline = Pipeline::start(PipelineConfig::from_env()?, Arc::new(SystemClock))?;
        crash::register()?;
        Ok(pipeline)
    })
}

/// Logs one record through the process-wide pipeline, starting it if this
/// is the first call.
///
/// Mirrors the record to stderr, stamps it, and enqueues it for the writer
/// thread. Blocks only while the queue is at capacity; after shutdown has
/// begun the record is silently discarded. The only error surfaced is a
/// first-use setup failure (bad configuration, unusable logs directory,
/// writer spawn or handler registration failure).
pub fn log(level: LogLevel, message: impl Into<String>) -> Result<(), PipelineError> {
    global()?.log(level, message);
    Ok(())
}

/// Eagerly performs the one-time setup instead of deferring it to the
/// first [`log()`] call. No-op when the pipeline is already running.
pub fn init() -> Result<(), PipelineError> {
    global().map(|_| ())
}

/// Stops the process-wide pipeline, draining every accepted record to disk.
///
/// Idempotent, and a no-op when the pipeline was never started. Also runs
/// automatically at process exit and from the crash handler, so calling it
/// explicitly only makes the teardown point deterministic.
pub fn shutdown() {
    if let Some(pipeline) = PIPELINE.get() {
        pipeline.shutdown();
    }
}

/// Lifecycle state of the process-wide pipeline.
pub fn state() -> PipelineState {
    PIPELINE.get().map_or(PipelineState::Uninitialized, Pipeline::state)
}

/// [`log()`] at DEBUG.
pub fn debug(message: impl Into<String>) -> Result<(), PipelineError> {
    log(LogLevel::Debug, message)
}

/// [`log()`] at INFO.
pub fn info(message: impl Into<String>) -> Result<(), PipelineError> {
    log(LogLevel::Info, message)
}

/// [`log()`] at WARN.
pub fn warn(message: impl Into<String>) -> Result<(), PipelineError> {
    log(LogLevel::Warn, message)
}

/// [`log()`] at ERROR.
pub fn error(message: impl Into<String>) -> Result<(), PipelineError> {
    log(LogLevel::Error, message)
}

/// Logs an unrecoverable failure at ERROR, drains the pipeline to disk,
/// and aborts the process.
///
/// The abort raises `SIGABRT`, so when the crash handler is installed the
/// process still prints the crash notice and exits through the common
/// signal path.
pub fn fatal(message: impl Into<String>) -> ! {
    let _ = log(LogLevel::Error, message);
    shutdown();
    std::process::abort()
}
