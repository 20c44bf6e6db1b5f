// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Compile-time tuning constants for the logging pipeline.

use crate::level::LogLevel;

/// Maximum number of records the queue may hold.
///
/// # Value
///
/// 10,000 records. With typical record sizes well under a kilobyte this
/// bounds queue memory to a few megabytes.
///
/// # Behavior when exceeded
///
/// A producer that would push past this depth blocks inside `log()` until
/// the writer thread frees space. Records are never dropped to make room.
pub const MAX_QUEUE_SIZE: usize = 10_000;

/// Maximum number of records the writer moves out of the queue per cycle.
///
/// # Value
///
/// 100 records. Batching amortizes the queue-lock and file-lock
/// acquisitions and the underlying write syscalls; a crash can lose at most
/// one batch of records below the flush threshold.
pub const MAX_BATCH_SIZE: usize = 100;

/// Minimum severity in a batch that forces an immediate file flush after
/// the batch is appended.
pub const FLUSH_THRESHOLD: LogLevel = LogLevel::Warn;

/// Default minimum severity mirrored to the console.
pub const DEFAULT_CONSOLE_THRESHOLD: LogLevel = LogLevel::Debug;

/// Default root directory for log output, relative to the working
/// directory. One subdirectory is created per calendar date.
pub const DEFAULT_LOG_DIRECTORY: &str = "logs";
