// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Date-rotated, append-only log file behind a single lock.
//!
//! The file lock also owns the "which day is active" decision: the date is
//! re-read from the clock once per batch, so rotation happens between
//! batches and never splits one. Layout on disk is
//! `<root>/<YYYY-MM-DD>/<index>.log`, where the index is the number of
//! entries already present in the day's directory when the file is first
//! opened. Two processes starting on the same day therefore pick distinct
//! files instead of silently replacing each other's output.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, TryLockError};

use crate::clock::Clock;
use crate::constants::FLUSH_THRESHOLD;
use crate::errors::PipelineError;
use crate::record::LogRecord;
use crate::util::lock_or_recover;

struct ActiveFile {
    date: String,
    path: PathBuf,
    writer: BufWriter<File>,
}

pub(crate) struct FileSink {
    root: PathBuf,
    clock: Arc<dyn Clock>,
    active: Mutex<Option<ActiveFile>>,
}

impl FileSink {
    pub(crate) fn new(root: PathBuf, clock: Arc<dyn Clock>) -> Self {
        Self {
            root,
            clock,
            active: Mutex::new(None),
        }
    }

    /// Creates the logs root and today's date directory, and reports the
    /// path the next opened file would use. Filesystem problems surface
    /// here, at init time, instead of later on the writer thread.
    pub(crate) fn prepare(&self) -> Result<PathBuf, PipelineError> {
        let dir = self.ensure_date_dir(&self.clock.date())?;
        self.next_file_path(&dir)
    }

    /// Appends a batch to today's file, rotating first if the calendar day
    /// changed since the file was opened. The actual open is lazy: it
    /// happens on the first batch after startup or after a rotation.
    /// Flushes when the batch carries a record at or above the flush
    /// threshold.
    pub(crate) fn append(&self, batch: &[LogRecord]) -> Result<(), PipelineError> {
        if batch.is_empty() {
            return Ok(());
        }
        let today = self.clock.date();
        let mut slot = lock_or_recover(&self.active);
        let active = self.active_for(&mut slot, &today)?;

        for record in batch {
            writeln!(active.writer, "{}", record.as_file_line()).map_err(|source| {
                PipelineError::WriteFile {
                    path: active.path.clone(),
                    source,
                }
            })?;
        }

        if batch.iter().any(|record| record.level >= FLUSH_THRESHOLD) {
            active
                .writer
                .flush()
                .map_err(|source| PipelineError::WriteFile {
                    path: active.path.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Flushes and closes the active file if one is open.
    ///
    /// Uses `try_lock`: during crash teardown the lock may still be held by
    /// the thread the signal interrupted, and a blocking acquire would
    /// deadlock the exit path. Skipping the flush then loses at most one
    /// buffered batch.
    pub(crate) fn close(&self) {
        let mut slot = match self.active.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return,
        };
        if let Some(mut active) = slot.take() {
            let _ = active.writer.flush();
        }
    }

    /// Returns the open file for `today`, closing and re-opening when the
    /// date rolled over or nothing is open yet. If the re-open fails the
    /// slot is left empty, so the next batch retries from scratch.
    fn active_for<'a>(
        &self,
        slot: &'a mut Option<ActiveFile>,
        today: &str,
    ) -> Result<&'a mut ActiveFile, PipelineError> {
        let active = match slot.take() {
            Some(active) if active.date == today => active,
            stale => {
                // Dropping a previous day's file flushes its buffer before
                // the new file opens.
                drop(stale);
                self.open_for(today)?
            }
        };
        Ok(slot.insert(active))
    }

    fn open_for(&self, today: &str) -> Result<ActiveFile, PipelineError> {
        let dir = self.ensure_date_dir(today)?;
        let path = self.next_file_path(&dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| PipelineError::OpenFile {
                path: path.clone(),
                source,
            })?;
        Ok(ActiveFile {
            date: today.to_string(),
            path,
            writer: BufWriter::new(file),
        })
    }

    fn ensure_date_dir(&self, date: &str) -> Result<PathBuf, PipelineError> {
        let dir = self.root.join(date);
        fs::create_dir_all(&dir).map_err(|source| PipelineError::CreateDirectory {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Next file path for a day: index = count of entries already in the
    /// day's directory.
    fn next_file_path(&self, dir: &Path) -> Result<PathBuf, PipelineError> {
        let entries = fs::read_dir(dir).map_err(|source| PipelineError::ScanDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
        let index = entries.count();
        Ok(dir.join(format!("{index}.log")))
    }
}
