//! Conversion between local files and clipboard content
//!
//! The clipboard commands only frame and move bytes. Deciding what a file is,
//! and turning non-text content into an interchange stream (or back), goes
//! through the [`Converter`] trait so other media handlers can be plugged in.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use iffclip_formats::iff::StreamHead;

use crate::error::{ClipError, ClipResult};

/// Bytes inspected when classifying a file
pub const SNIFF_LEN: usize = 4096;

/// What a source file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Plain text, copied as `FORM FTXT`
    Text,
    /// Already an IFF interchange stream
    Interchange,
    /// Neither
    Unsupported,
}

/// Converts between local files and interchange streams
pub trait Converter: fmt::Debug {
    /// Classify the file at `path`
    fn detect(&self, path: &Path) -> ClipResult<SourceKind>;

    /// Write the interchange form of a non-text file into `sink`
    fn to_interchange(&self, path: &Path, sink: &mut dyn Write) -> ClipResult<u64>;

    /// Turn interchange content from `source` into a file written to `dest`
    fn save(&self, source: &mut dyn Read, dest: &mut dyn Write) -> ClipResult<u64>;
}

/// Default converter: text and raw IFF files pass through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct FileConverter;

impl Converter for FileConverter {
    fn detect(&self, path: &Path) -> ClipResult<SourceKind> {
        let mut file = File::open(path).map_err(|source| ClipError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut prefix = Vec::with_capacity(SNIFF_LEN);
        Read::by_ref(&mut file)
            .take(SNIFF_LEN as u64)
            .read_to_end(&mut prefix)
            .map_err(|source| ClipError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(classify_prefix(&prefix))
    }

    fn to_interchange(&self, path: &Path, sink: &mut dyn Write) -> ClipResult<u64> {
        let mut file = File::open(path).map_err(|source| ClipError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(io::copy(&mut file, sink)?)
    }

    fn save(&self, source: &mut dyn Read, dest: &mut dyn Write) -> ClipResult<u64> {
        let n = io::copy(source, dest)?;
        dest.flush()?;
        Ok(n)
    }
}

/// Classify a file from its first bytes
pub fn classify_prefix(prefix: &[u8]) -> SourceKind {
    if matches!(StreamHead::classify(prefix), StreamHead::Group(_)) {
        return SourceKind::Interchange;
    }
    if looks_like_text(prefix) {
        SourceKind::Text
    } else {
        SourceKind::Unsupported
    }
}

/// No NUL bytes and at least 95% printable or whitespace bytes.
///
/// Bytes from 0x80 up count as printable so UTF-8 and Latin-1 text pass.
fn looks_like_text(prefix: &[u8]) -> bool {
    if prefix.contains(&0) {
        return false;
    }
    let printable = prefix
        .iter()
        .filter(|&&b| (b >= 0x20 && b != 0x7f) || matches!(b, b'\n' | b'\r' | b'\t' | 0x0c))
        .count();
    printable * 100 >= prefix.len() * 95
}
