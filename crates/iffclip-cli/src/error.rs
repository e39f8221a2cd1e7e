//! Error type for clipboard operations

use std::path::PathBuf;

use iffclip_formats::IffError;
use iffclip_storage::StorageError;
use thiserror::Error;

/// Failure class reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The unit could not be opened
    UnitUnavailable,
    /// Fewer header or payload bytes than declared
    TruncatedStream,
    /// Chunk nesting violated while encoding
    MalformedNesting,
    /// A write or commit was rejected
    WriteFailed,
    /// A read was rejected
    ReadFailed,
    /// Content is neither text nor convertible
    UnsupportedContent,
    /// Destination exists and overwriting was not requested
    AlreadyExists,
    /// Invalid configuration
    Config,
}

/// Errors surfaced by the clipboard commands
#[derive(Debug, Error)]
pub enum ClipError {
    /// Chunk codec failure
    #[error(transparent)]
    Iff(#[from] IffError),

    /// Clipboard device failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Destination file exists and `--force` was not given
    #[error("{} already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    /// Content the tool cannot copy or paste
    #[error("{0}")]
    UnsupportedContent(String),

    /// Configuration file problem
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading a local file failed
    #[error("cannot read {}", path.display())]
    ReadFile {
        /// File being read
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Writing a local file failed
    #[error("cannot write {}", path.display())]
    WriteFile {
        /// File being written
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Other I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClipError {
    /// Failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Iff(e) => match e {
                IffError::TruncatedStream(_) => ErrorKind::TruncatedStream,
                IffError::MalformedNesting(_)
                | IffError::ChunkOverflow { .. }
                | IffError::SizeMismatch { .. } => ErrorKind::MalformedNesting,
                IffError::MalformedChunk(_) | IffError::InvalidTag(_) | IffError::BinRw(_) => {
                    ErrorKind::UnsupportedContent
                }
                IffError::ChunkTooLarge(_) | IffError::WriteFailed(_) => ErrorKind::WriteFailed,
                IffError::ReadFailed(_) => ErrorKind::ReadFailed,
            },
            Self::Storage(e) => match e {
                StorageError::UnitUnavailable { .. } => ErrorKind::UnitUnavailable,
                StorageError::ReadFailed { .. } => ErrorKind::ReadFailed,
                StorageError::WriteFailed { .. } | StorageError::AlreadyCommitted(_) => {
                    ErrorKind::WriteFailed
                }
                StorageError::InvalidUnit(_) | StorageError::Config(_) => ErrorKind::Config,
            },
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::UnsupportedContent(_) => ErrorKind::UnsupportedContent,
            Self::Config(_) => ErrorKind::Config,
            Self::ReadFile { .. } => ErrorKind::ReadFailed,
            Self::WriteFile { .. } | Self::Io(_) => ErrorKind::WriteFailed,
        }
    }
}

/// Result type for clipboard operations
pub type ClipResult<T> = Result<T, ClipError>;
