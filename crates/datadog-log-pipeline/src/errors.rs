// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::path::PathBuf;

/// Errors raised by the logging pipeline.
///
/// Setup variants surface through one-time initialization to the first
/// caller; `WriteFile` only travels from the file sink to the writer thread,
/// which downgrades it to a console notice.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to create log directory {path:?}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to scan log directory {path:?}: {source}")]
    ScanDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open log file {path:?}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write log file {path:?}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to spawn the log writer thread: {0}")]
    SpawnWriter(#[source] io::Error),

    #[error("Failed to register the crash handler: {0}")]
    RegisterCrashHandler(#[source] nix::Error),

    #[error("Failed to register the process-exit hook")]
    RegisterExitHook,
}
