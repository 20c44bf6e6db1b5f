// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Bounded FIFO mailbox between producer threads and the writer thread.
//!
//! Producers block while the queue is at capacity; records are never
//! dropped to make room. The writer parks while the queue is empty. Both
//! waits end when shutdown begins, so neither side can hang a teardown.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use crate::record::LogRecord;
use crate::util::{lock_or_recover, wait_or_recover};

struct QueueState {
    records: VecDeque<LogRecord>,
    shutting_down: bool,
}

pub(crate) struct BoundedQueue {
    state: Mutex<QueueState>,
    capacity: usize,
    /// Signaled after a push; the writer waits here while the queue is empty.
    records_available: Condvar,
    /// Signaled after a drain; producers wait here while the queue is full.
    space_available: Condvar,
}

impl BoundedQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                records: VecDeque::new(),
                shutting_down: false,
            }),
            capacity,
            records_available: Condvar::new(),
            space_available: Condvar::new(),
        }
    }

    /// Enqueues one record, blocking while the queue is at capacity.
    ///
    /// Returns `false` when the record was discarded because shutdown began
    /// before space freed up; records accepted earlier are unaffected.
    pub(crate) fn push(&self, record: LogRecord) -> bool {
        let mut state = lock_or_recover(&self.state);
        while state.records.len() >= self.capacity && !state.shutting_down {
            state = wait_or_recover(&self.space_available, state);
        }
        if state.shutting_down {
            return false;
        }
        state.records.push_back(record);
        drop(state);
        self.records_available.notify_one();
        true
    }

    /// Moves up to `max` records into `batch`, preserving FIFO order, and
    /// wakes producers blocked on a full queue.
    pub(crate) fn drain_into(&self, batch: &mut Vec<LogRecord>, max: usize) {
        let mut state = lock_or_recover(&self.state);
        let take = state.records.len().min(max);
        batch.extend(state.records.drain(..take));
        drop(state);
        if take > 0 {
            self.space_available.notify_all();
        }
    }

    /// Parks the writer until a record arrives or shutdown begins.
    ///
    /// Returns `true` while records remain (even during shutdown, so the
    /// queue drains to completion) and `false` once shutdown was requested
    /// and the queue is empty.
    pub(crate) fn wait_for_records(&self) -> bool {
        let mut state = lock_or_recover(&self.state);
        loop {
            if !state.records.is_empty() {
                return true;
            }
            if state.shutting_down {
                return false;
            }
            state = wait_or_recover(&self.records_available, state);
        }
    }

    /// Marks the queue as shutting down and wakes every waiting thread.
    pub(crate) fn begin_shutdown(&self) {
        let mut state = lock_or_recover(&self.state);
        state.shutting_down = true;
        drop(state);
        self.records_available.notify_all();
        self.space_available.notify_all();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        lock_or_recover(&self.state).records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LogLevel;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn record(message: &str) -> LogRecord {
        LogRecord::new(LogLevel::Info, message, "10:00:00".to_string())
    }

    #[test]
    fn test_push_and_drain_preserve_fifo_order() {
        let queue = BoundedQueue::new(16);
        for i in 0..5 {
            assert!(queue.push(record(&format!("record {i}"))));
        }

        let mut batch = Vec::new();
        queue.drain_into(&mut batch, 16);
        let messages: Vec<&str> = batch.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(
            messages,
            ["record 0", "record 1", "record 2", "record 3", "record 4"]
        );
    }

    #[test]
    fn test_drain_respects_batch_limit() {
        let queue = BoundedQueue::new(16);
        for i in 0..10 {
            queue.push(record(&format!("record {i}")));
        }

        let mut batch = Vec::new();
        queue.drain_into(&mut batch, 4);
        assert_eq!(batch.len(), 4);
        assert_eq!(batch[0].message, "record 0");
        assert_eq!(queue.len(), 6);
    }

    #[test]
    fn test_full_queue_blocks_producer_until_drained() {
        let queue = Arc::new(BoundedQueue::new(2));
        assert!(queue.push(record("first")));
        assert!(queue.push(record("second")));

        let (tx, rx) = mpsc::channel();
        let producer_queue = Arc::clone(&queue);
        let producer = thread::spawn(move || {
            let accepted = producer_queue.push(record("third"));
            tx.send(()).unwrap();
            accepted
        });

        // The producer must stay blocked while the queue is full.
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

        let mut batch = Vec::new();
        queue.drain_into(&mut batch, 1);
        assert_eq!(batch.len(), 1);

        // Draining one record frees space and unblocks the producer.
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
        assert!(producer.join().unwrap());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_shutdown_unblocks_waiting_producer() {
        let queue = Arc::new(BoundedQueue::new(1));
        assert!(queue.push(record("only")));

        let producer_queue = Arc::clone(&queue);
        let producer = thread::spawn(move || producer_queue.push(record("rejected")));

        thread::sleep(Duration::from_millis(50));
        queue.begin_shutdown();

        // The blocked producer wakes and reports the record as discarded.
        assert!(!producer.join().unwrap());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_push_after_shutdown_is_discarded() {
        let queue = BoundedQueue::new(4);
        queue.begin_shutdown();
        assert!(!queue.push(record("late")));
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_wait_for_records_sees_pending_work_during_shutdown() {
        let queue = BoundedQueue::new(4);
        queue.push(record("pending"));
        queue.begin_shutdown();

        // Records enqueued before shutdown still count as work.
        assert!(queue.wait_for_records());

        let mut batch = Vec::new();
        queue.drain_into(&mut batch, 4);
        assert!(!queue.wait_for_records());
    }

    #[test]
    fn test_wait_for_records_wakes_on_push() {
        let queue = Arc::new(BoundedQueue::new(4));
        let waiter_queue = Arc::clone(&queue);
        let waiter = thread::spawn(move || waiter_queue.wait_for_records());

        thread::sleep(Duration::from_millis(50));
        queue.push(record("wake up"));

        assert!(waiter.join().unwrap());
    }

    #[test]
    fn test_wait_for_records_wakes_on_shutdown() {
        let queue = Arc::new(BoundedQueue::new(4));
        let waiter_queue = Arc::clone(&queue);
        let waiter = thread::spawn(move || waiter_queue.wait_for_records());

        thread::sleep(Duration::from_millis(50));
        queue.begin_shutdown();

        assert!(!waiter.join().unwrap());
    }

    #[test]
    fn test_concurrent_producers_lose_nothing() {
        let queue = Arc::new(BoundedQueue::new(8));
        let mut producers = Vec::new();
        for t in 0..4 {
            let producer_queue = Arc::clone(&queue);
            producers.push(thread::spawn(move || {
                for i in 0..100 {
                    assert!(producer_queue.push(record(&format!("producer {t} record {i}"))));
                }
            }));
        }

        let mut collected = Vec::new();
        let mut batch = Vec::new();
        while collected.len() < 400 {
            queue.drain_into(&mut batch, 32);
            if batch.is_empty() {
                thread::sleep(Duration::from_millis(1));
                continue;
            }
            collected.append(&mut batch);
        }
        for producer in producers {
            producer.join().unwrap();
        }

        assert_eq!(collected.len(), 400);
        // Each producer's records must appear in its own submission order.
        for t in 0..4 {
            let prefix = format!("producer {t} ");
            let sequence: Vec<&str> = collected
                .iter()
                .map(|r| r.message.as_str())
                .filter(|m| m.starts_with(&prefix))
                .collect();
            let expected: Vec<String> =
                (0..100).map(|i| format!("producer {t} record {i}")).collect();
            assert_eq!(sequence, expected);
        }
    }
}
