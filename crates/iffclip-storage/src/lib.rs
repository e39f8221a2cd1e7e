//! Clipboard units backed by a directory of slot files.
//!
//! Each numbered unit (0-255) holds at most one content blob. Access goes
//! through sessions:
//!
//! - **Read sessions** stream the committed content and always drain it
//!   before the unit is released.
//! - **Write sessions** stream into a temp file tagged with a generation
//!   number and become visible in one rename on commit.
//!
//! A unit is claimed by exactly one session at a time through an advisory
//! lock on a file next to the content.
//!
//! # Layout
//!
//! ```text
//! <base>/unit-000.clip             committed content of unit 0
//! <base>/unit-000.lock             locked while a session holds the unit
//! <base>/unit-000.1a2b3c4d.tmp     uncommitted write, generation 1a2b3c4d
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use iffclip_storage::{ClipboardDevice, StorageConfig, Unit};
//! use std::io::Read;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let device = ClipboardDevice::open(StorageConfig::new("/tmp/clips"))?;
//! let mut session = device.open_write(Unit::PRIMARY)?;
//! session.write_chunk(b"data")?;
//! session.commit()?;
//! session.close();
//!
//! let mut reader = device.open_read(Unit::PRIMARY)?;
//! let mut content = Vec::new();
//! reader.read_to_end(&mut content)?;
//! reader.close()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

use thiserror::Error;

// Storage configuration
pub mod config;

// Clipboard device (directory of units)
pub mod device;

// Session drain helper
pub mod drain;

// Unit claim lock files
pub mod lock;

// Tag to unit routing
pub mod router;

// Read and write sessions
pub mod session;

// Unit identifiers
pub mod unit;

pub use config::StorageConfig;
pub use device::ClipboardDevice;
pub use drain::drain;
pub use router::{RouterVersion, UnitRouter, route_tag};
pub use session::{ReadChunk, ReadSession, WriteSession};
pub use unit::Unit;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while accessing clipboard units.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The unit could not be claimed.
    #[error("clipboard unit {unit} is unavailable: {reason}")]
    UnitUnavailable {
        /// Unit that was requested
        unit: Unit,
        /// Why the claim failed
        reason: String,
    },

    /// Reading unit content failed.
    #[error("read from clipboard unit {unit} failed: {source}")]
    ReadFailed {
        /// Unit being read
        unit: Unit,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Writing or committing unit content failed.
    #[error("write to clipboard unit {unit} failed: {source}")]
    WriteFailed {
        /// Unit being written
        unit: Unit,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Unit number outside 0..=255.
    #[error("invalid clipboard unit {0}: must be between 0 and 255")]
    InvalidUnit(u32),

    /// The write session was already committed.
    #[error("write session for clipboard unit {0} was already committed")]
    AlreadyCommitted(Unit),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<StorageError> for std::io::Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ReadFailed { source: e, .. }
            | StorageError::WriteFailed { source: e, .. } => e,
            other => Self::other(other),
        }
    }
}

/// Largest payload a unit may hold; sizes travel as 32-bit values.
pub const MAX_CONTENT_SIZE: u64 = u32::MAX as u64;

/// Default cap on bytes accepted by a single session write.
pub const DEFAULT_MAX_WRITE_CHUNK: usize = 64 * 1024;

/// Default cap on bytes returned by a single session read.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

/// Buffer size used when draining a read session.
pub const DRAIN_BUFFER_SIZE: usize = 256;
