//! Directory-backed clipboard device

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::StorageConfig;
use crate::lock::UnitLock;
use crate::session::{ReadSession, WriteSession};
use crate::{Result, StorageError, Unit};

/// Extension of committed content files
pub const CONTENT_EXTENSION: &str = "clip";

/// Extension of claim lock files
pub const LOCK_EXTENSION: &str = "lock";

/// Extension of uncommitted write files
pub const TEMP_EXTENSION: &str = "tmp";

/// The set of clipboard units living in one directory
#[derive(Debug, Clone)]
pub struct ClipboardDevice {
    config: StorageConfig,
}

impl ClipboardDevice {
    /// Open the device, creating its directory if needed
    pub fn open(config: StorageConfig) -> Result<Self> {
        config.validate()?;
        std::fs::create_dir_all(&config.base_path).map_err(|e| {
            StorageError::Config(format!(
                "cannot create clipboard directory {}: {e}",
                config.base_path.display()
            ))
        })?;
        debug!(path = %config.base_path.display(), "opened clipboard device");
        Ok(Self { config })
    }

    /// Device configuration
    pub const fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Directory holding the unit files
    pub fn base_path(&self) -> &Path {
        &self.config.base_path
    }

    /// Path of a unit's committed content
    pub fn content_path(&self, unit: Unit) -> PathBuf {
        self.unit_path(unit, CONTENT_EXTENSION)
    }

    /// Path of a unit's claim lock
    pub fn lock_path(&self, unit: Unit) -> PathBuf {
        self.unit_path(unit, LOCK_EXTENSION)
    }

    /// Path of the temp file for one write generation
    pub fn temp_path(&self, unit: Unit, generation: u32) -> PathBuf {
        self.unit_path(unit, &format!("{generation:08x}.{TEMP_EXTENSION}"))
    }

    /// Claim `unit` for reading.
    ///
    /// Fails with `UnitUnavailable` when another session holds the unit. An
    /// empty unit opens fine and reads as zero bytes.
    pub fn open_read(&self, unit: Unit) -> Result<ReadSession> {
        let lock = UnitLock::acquire(unit, &self.lock_path(unit))?;
        ReadSession::open(self, unit, lock)
    }

    /// Claim `unit` for writing a new generation of content
    pub fn open_write(&self, unit: Unit) -> Result<WriteSession> {
        let lock = UnitLock::acquire(unit, &self.lock_path(unit))?;
        WriteSession::create(self, unit, lock)
    }

    fn unit_path(&self, unit: Unit, extension: &str) -> PathBuf {
        self.config
            .base_path
            .join(format!("{}.{extension}", unit.file_stem()))
    }
}
