// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use crate::console::ConsoleSink;
use crate::file_sink::FileSink;
use crate::level::LogLevel;
use crate::queue::BoundedQueue;

/// Dedicated background worker that drains the queue in batches and appends
/// them to the rotating file.
///
/// Exactly one instance runs per pipeline, on its own OS thread. It holds
/// at most one of the three pipeline locks at a time: the queue lock while
/// draining, the file lock while appending, the console lock only to report
/// a failed append after the file lock is released.
pub(crate) struct WriterWorker {
    queue: Arc<BoundedQueue>,
    sink: Arc<FileSink>,
    console: Arc<ConsoleSink>,
    batch_size: usize,
}

impl WriterWorker {
    pub(crate) fn new(
        queue: Arc<BoundedQueue>,
        sink: Arc<FileSink>,
        console: Arc<ConsoleSink>,
        batch_size: usize,
    ) -> Self {
        Self {
            queue,
            sink,
            console,
            batch_size,
        }
    }

    /// Runs until shutdown is requested and the queue is fully drained.
    /// Records enqueued before shutdown always reach the file sink.
    pub(crate) fn run(self) {
        let mut batch = Vec::with_capacity(self.batch_size);
        while self.queue.wait_for_records() {
            loop {
                self.queue.drain_into(&mut batch, self.batch_size);
                if batch.is_empty() {
                    break;
                }
                if let Err(err) = self.sink.append(&batch) {
                    // One attempt per batch: the records are dropped and the
                    // failure is surfaced as a console notice.
                    self.console.write(
                        LogLevel::Error,
                        &format!("log writer dropped a batch of {}: {err}", batch.len()),
                    );
                }
                batch.clear();
            }
        }
    }
}
