// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The owning object for all pipeline state.
//!
//! One `Pipeline` bundles the bounded queue, the console and file sinks,
//! the clock, and the writer thread handle, with a strictly one-shot
//! lifecycle:
//!
//! ```text
//! Running --(shutdown() | signal)--> ShuttingDown --(writer joined,
//!                                       file closed)--> Stopped
//! ```
//!
//! There is no way back to `Running`; a stopped pipeline discards records.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::clock::Clock;
use crate::config::PipelineConfig;
use crate::console::ConsoleSink;
use crate::errors::PipelineError;
use crate::file_sink::FileSink;
use crate::level::LogLevel;
use crate::queue::BoundedQueue;
use crate::record::LogRecord;
use crate::util::lock_or_recover;
use crate::writer::WriterWorker;

const STATE_RUNNING: u8 = 1;
const STATE_SHUTTING_DOWN: u8 = 2;
const STATE_STOPPED: u8 = 3;

/// Lifecycle state of a pipeline (or of the process-wide pipeline, where
/// `Uninitialized` means no pipeline has been started yet).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// No pipeline has been started.
    Uninitialized,
    /// Accepting and writing records.
    Running,
    /// Shutdown requested; the writer is draining the queue.
    ShuttingDown,
    /// Writer joined and file closed. Terminal.
    Stopped,
}

/// Asynchronous logging pipeline: bounded queue, console mirror, one batch
/// writer thread, date-rotated file output.
///
/// Construct with [`Pipeline::start`] for an isolated instance (tests,
/// embedded use), or go through the crate-level [`crate::log`] facade for
/// the process-wide instance.
pub struct Pipeline {
    state: AtomicU8,
    queue: Arc<BoundedQueue>,
    console: Arc<ConsoleSink>,
    sink: Arc<FileSink>,
    clock: Arc<dyn Clock>,
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl Pipeline {
    /// Validates the configuration, builds the on-disk layout, spawns the
    /// writer thread, and returns a running pipeline.
    pub fn start(config: PipelineConfig, clock: Arc<dyn Clock>) -> Result<Self, PipelineError> {
        let console = Arc::new(ConsoleSink::stderr(config.console_threshold));
        Self::start_with_console(config, clock, console)
    }

    pub(crate) fn start_with_console(
        config: PipelineConfig,
        clock: Arc<dyn Clock>,
        console: Arc<ConsoleSink>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        let queue = Arc::new(BoundedQueue::new(config.queue_capacity));
        let sink = Arc::new(FileSink::new(config.log_directory, Arc::clone(&clock)));
        sink.prepare()?;

        let worker = WriterWorker::new(
            Arc::clone(&queue),
            Arc::clone(&sink),
            Arc::clone(&console),
            config.batch_size,
        );
        let handle = thread::Builder::new()
            .name("log-writer".to_string())
            .spawn(move || worker.run())
            .map_err(PipelineError::SpawnWriter)?;

        Ok(Self {
            state: AtomicU8::new(STATE_RUNNING),
            queue,
            console,
            sink,
            clock,
            writer: Mutex::new(Some(handle)),
        })
    }

    /// Logs one record: mirrors it to the console, stamps it with the
    /// current time of day, and enqueues it for the writer.
    ///
    /// Blocks only while the queue is at capacity. Once shutdown has begun
    /// the call is a silent no-op.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if self.state.load(Ordering::Acquire) != STATE_RUNNING {
            return;
        }
        let message = message.into();
        self.console.write(level, &message);
        let record = LogRecord::new(level, message, self.clock.time_of_day());
        let _ = self.queue.push(record);
    }

    /// Stops the pipeline: wakes the writer, lets it drain every record
    /// already enqueued, joins it, then flushes and closes the file.
    ///
    /// Idempotent: only the first call performs the teardown; concurrent
    /// and repeated calls return immediately. Safe to call from application
    /// code, the process-exit hook, and the crash handler.
    pub fn shutdown(&self) {
        if self
            .state
            .compare_exchange(
                STATE_RUNNING,
                STATE_SHUTTING_DOWN,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return;
        }

        self.queue.begin_shutdown();

        let handle = lock_or_recover(&self.writer).take();
        if let Some(handle) = handle {
            // A signal landing on the writer thread itself funnels here;
            // joining the current thread would deadlock the exit path.
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }

        self.sink.close();
        self.state.store(STATE_STOPPED, Ordering::Release);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PipelineState {
        match self.state.load(Ordering::Acquire) {
            STATE_RUNNING => PipelineState::Running,
            STATE_SHUTTING_DOWN => PipelineState::ShuttingDown,
            _ => PipelineState::Stopped,
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}
