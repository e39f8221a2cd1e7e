//! Unit claim locks
//!
//! A claim is an exclusive OS advisory lock on the unit's `unit-NNN.lock`
//! file, so exactly one session can hold a unit. The lock goes away with the
//! holding process, which means a file left behind by a crashed session never
//! blocks the unit. The file itself stays in place between claims.
//!
//! There is no retry loop: a unit that is already claimed is reported as
//! unavailable straight away.

use std::fs::{File, OpenOptions, TryLockError};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{Result, StorageError, Unit};

/// Claim on a unit, released when dropped
#[derive(Debug)]
pub struct UnitLock {
    /// The locked file handle (kept open while the claim is held).
    file: File,
    /// Path to the lock file.
    path: PathBuf,
    unit: Unit,
}

impl UnitLock {
    /// Claim `unit` by locking the file at `path`, creating it if needed.
    ///
    /// Makes a single attempt; a lock held elsewhere is `UnitUnavailable`.
    pub fn acquire(unit: Unit, path: &Path) -> Result<Self> {
        let unavailable = |reason: String| StorageError::UnitUnavailable { unit, reason };

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| unavailable(e.to_string()))?;
        match file.try_lock() {
            Ok(()) => {}
            Err(TryLockError::WouldBlock) => {
                return Err(unavailable(format!(
                    "claimed by another session ({})",
                    path.display()
                )));
            }
            Err(TryLockError::Error(e)) => return Err(unavailable(e.to_string())),
        }

        // owner pid, informational only
        if file.set_len(0).is_ok() {
            let _ = writeln!(file, "{}", std::process::id());
        }
        debug!(%unit, path = %path.display(), "claimed unit");
        Ok(Self {
            file,
            path: path.to_path_buf(),
            unit,
        })
    }

    /// Get the lock file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for UnitLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            warn!(unit = %self.unit, error = %e, "failed to release unit lock");
        } else {
            debug!(unit = %self.unit, "released unit");
        }
    }
}
