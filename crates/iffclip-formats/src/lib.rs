//! IFF chunk codec and text form support for iffclip
//!
//! This crate implements the Interchange File Format (EA IFF 85) as a
//! streaming codec: chunks are written through a nesting-checked stack and
//! read back as a sequence of events, without ever holding a whole stream in
//! memory.
//!
//! # Modules
//!
//! - **iff**: type tags, header records, the chunk stack, the streaming
//!   writer and reader, and the chunk scanner
//! - **ftxt**: `FORM FTXT` text documents built from `CHRS` runs
//!
//! # Example
//!
//! ```
//! use iffclip_formats::ftxt::{extract_text, write_text_form};
//!
//! let form = write_text_form(Vec::new(), b"Hello").unwrap();
//! let mut text = Vec::new();
//! extract_text(&form[..], &mut text).unwrap();
//! assert_eq!(text, b"Hello");
//! ```

#![warn(missing_docs)]

/// `FORM FTXT` text documents
pub mod ftxt;
pub mod iff;

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

pub use iff::{IffError, IffResult, TypeTag};

/// Symmetric parse/build pair for a chunk-based document
pub trait ChunkFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> IffResult<Self>;

    /// Build to bytes
    fn build(&self) -> IffResult<Vec<u8>>;

    /// Verify that parsing and rebuilding reproduces `data` exactly
    fn verify_round_trip(data: &[u8]) -> IffResult<()> {
        let rebuilt = Self::parse(data)?.build()?;
        if data != rebuilt.as_slice() {
            return Err(IffError::MalformedChunk(format!(
                "round trip changed {} byte(s) into {}",
                data.len(),
                rebuilt.len()
            )));
        }
        Ok(())
    }
}
