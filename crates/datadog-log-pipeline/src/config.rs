// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_CONSOLE_THRESHOLD, DEFAULT_LOG_DIRECTORY, MAX_BATCH_SIZE, MAX_QUEUE_SIZE,
};
use crate::errors::PipelineError;
use crate::level::LogLevel;

/// Configuration for the logging pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory receiving one subdirectory per calendar date.
    pub log_directory: PathBuf,
    /// Minimum severity mirrored to the console.
    pub console_threshold: LogLevel,
    /// Maximum records held in the queue before producers block.
    pub queue_capacity: usize,
    /// Maximum records the writer drains per cycle.
    pub batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            log_directory: PathBuf::from(DEFAULT_LOG_DIRECTORY),
            console_threshold: DEFAULT_CONSOLE_THRESHOLD,
            queue_capacity: MAX_QUEUE_SIZE,
            batch_size: MAX_BATCH_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Create configuration from environment variables.
    ///
    /// `DD_LOG_DIRECTORY` overrides the logs root and
    /// `DD_LOG_CONSOLE_LEVEL` the console threshold (case-insensitive level
    /// name). Queue capacity and batch size are compile-time constants.
    pub fn from_env() -> Result<Self, PipelineError> {
        let log_directory = env::var("DD_LOG_DIRECTORY")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_DIRECTORY));
        let console_threshold = match env::var("DD_LOG_CONSOLE_LEVEL") {
            Ok(raw) => LogLevel::from_str(&raw).map_err(PipelineError::InvalidConfig)?,
            Err(_) => DEFAULT_CONSOLE_THRESHOLD,
        };

        let config = Self {
            log_directory,
            console_threshold,
            ..Default::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.log_directory.as_os_str().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "log directory cannot be empty".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(PipelineError::InvalidConfig(
                "queue capacity must be greater than 0".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "batch size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
