//! Configuration for the clipboard device

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{DEFAULT_MAX_WRITE_CHUNK, DEFAULT_READ_BUFFER_SIZE, Result, StorageError};

/// Configuration for the clipboard device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the unit files
    pub base_path: PathBuf,

    /// Maximum bytes a single session write accepts
    pub max_write_chunk: usize,

    /// Maximum bytes a single session read returns
    pub read_buffer_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./units"),
            max_write_chunk: DEFAULT_MAX_WRITE_CHUNK,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl StorageConfig {
    /// Create a new configuration with the specified base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Set the per-call write limit
    #[must_use]
    pub const fn with_max_write_chunk(mut self, size: usize) -> Self {
        self.max_write_chunk = size;
        self
    }

    /// Set the per-call read limit
    #[must_use]
    pub const fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Reject settings the device cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.max_write_chunk == 0 {
            return Err(StorageError::Config(
                "max_write_chunk must be at least 1".to_string(),
            ));
        }
        if self.read_buffer_size == 0 {
            return Err(StorageError::Config(
                "read_buffer_size must be at least 1".to_string(),
            ));
        }
        if self.base_path.as_os_str().is_empty() {
            return Err(StorageError::Config("base_path is empty".to_string()));
        }
        Ok(())
    }
}
