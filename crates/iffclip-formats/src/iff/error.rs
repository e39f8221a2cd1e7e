//! IFF codec error types

use thiserror::Error;

use super::tag::TypeTag;

/// IFF-specific error type
#[derive(Debug, Error)]
pub enum IffError {
    /// The stream ended inside a header or a declared payload
    #[error("truncated stream: {0}")]
    TruncatedStream(String),

    /// Push/pop discipline violated while composing a chunk structure
    #[error("malformed nesting: {0}")]
    MalformedNesting(String),

    /// A decoded chunk does not fit its declared extent
    #[error("malformed chunk: {0}")]
    MalformedChunk(String),

    /// A chunk id is not a legal four-character tag
    #[error("invalid chunk id: {0:?}")]
    InvalidTag(TypeTag),

    /// More bytes were written to a leaf than it declared
    #[error("chunk {tag} overflow: declared {declared} bytes, attempted {attempted}")]
    ChunkOverflow {
        /// Leaf id
        tag: TypeTag,
        /// Declared payload size
        declared: u32,
        /// Total bytes the caller tried to write
        attempted: u64,
    },

    /// A leaf with a declared size was closed before it was filled
    #[error("chunk {tag} size mismatch: declared {declared} bytes, wrote {written}")]
    SizeMismatch {
        /// Leaf id
        tag: TypeTag,
        /// Declared payload size
        declared: u32,
        /// Bytes actually written
        written: u32,
    },

    /// A chunk grew past the 32-bit size field
    #[error("chunk too large: {0} bytes")]
    ChunkTooLarge(u64),

    /// The underlying sink rejected or truncated a write
    #[error("write failed: {0}")]
    WriteFailed(#[source] std::io::Error),

    /// The underlying source failed a read
    #[error("read failed: {0}")]
    ReadFailed(#[source] std::io::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for IFF operations
pub type IffResult<T> = Result<T, IffError>;
