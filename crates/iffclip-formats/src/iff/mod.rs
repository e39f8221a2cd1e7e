//! Streaming IFF chunk codec
//!
//! The codec works over plain [`std::io::Read`] and [`std::io::Write`]
//! endpoints so it can sit on top of a clipboard unit session, a file, or an
//! in-memory buffer alike.
//!
//! # Wire layout
//!
//! ```text
//! group:  id[4] size[4, BE] subtype[4] children...
//! leaf:   id[4] size[4, BE] payload[size] (pad[1] when size is odd)
//! ```

pub mod error;
pub mod header;
pub mod reader;
pub mod scanner;
pub mod stack;
pub mod tag;
pub mod writer;

pub use error::{IffError, IffResult};
pub use header::{
    CHUNK_HEADER_SIZE, ChunkHeader, GROUP_HEADER_SIZE, GroupHeader, StreamHead, padded_len,
};
pub use reader::{IffEvent, IffReader};
pub use scanner::{ChunkScanner, concat_all, find_all};
pub use stack::{ChunkHandle, ChunkStack};
pub use tag::TypeTag;
pub use writer::IffWriter;
