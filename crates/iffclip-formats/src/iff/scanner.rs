//! Lazy search for every occurrence of a (container, leaf) pair
//!
//! [`find_all`] wraps an [`IffReader`] in an iterator that yields the payload
//! of each matching leaf in stream order. A parse error is yielded once as the
//! final item; after it, or after the end of the stream, the iterator is
//! exhausted.

use std::io::Read;
use std::iter::FusedIterator;

use tracing::debug;

use super::error::{IffError, IffResult};
use super::reader::{IffEvent, IffReader};
use super::tag::TypeTag;

/// Read granularity while collecting a payload
const PAYLOAD_READ_SIZE: usize = 4096;

/// Iterator over payloads of matching leaf chunks
#[derive(Debug)]
pub struct ChunkScanner<R: Read> {
    reader: IffReader<R>,
    container: TypeTag,
    leaf: TypeTag,
    payload_limit: Option<usize>,
    done: bool,
}

/// Scan `source` for every `leaf` chunk directly inside a `container` group
pub fn find_all<R: Read>(source: R, container: TypeTag, leaf: TypeTag) -> ChunkScanner<R> {
    ChunkScanner {
        reader: IffReader::new(source),
        container,
        leaf,
        payload_limit: None,
        done: false,
    }
}

impl<R: Read> ChunkScanner<R> {
    /// Keep at most `limit` bytes of each payload; the rest is skipped
    #[must_use]
    pub fn with_payload_limit(mut self, limit: usize) -> Self {
        self.payload_limit = Some(limit);
        self
    }

    fn collect_payload(&mut self, size: u32) -> IffResult<Vec<u8>> {
        let size = size as usize;
        let keep = self.payload_limit.map_or(size, |limit| limit.min(size));
        let mut payload = Vec::with_capacity(keep.min(PAYLOAD_READ_SIZE * 16));
        let mut scratch = [0u8; PAYLOAD_READ_SIZE];
        while payload.len() < keep {
            let want = (keep - payload.len()).min(PAYLOAD_READ_SIZE);
            let n = self.reader.read_chunk_bytes(&mut scratch[..want])?;
            if n == 0 {
                break;
            }
            payload.extend_from_slice(&scratch[..n]);
        }
        Ok(payload)
    }
}

impl<R: Read> Iterator for ChunkScanner<R> {
    type Item = IffResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.reader.next_event() {
                Ok(IffEvent::Chunk {
                    container,
                    id,
                    size,
                }) if container == self.container && id == self.leaf => {
                    let result = self.collect_payload(size);
                    if result.is_err() {
                        self.done = true;
                    }
                    return Some(result);
                }
                Ok(IffEvent::EndOfStream) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(error = %e, "chunk scan stopped");
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<R: Read> FusedIterator for ChunkScanner<R> {}

/// Concatenate every payload the scanner yields.
///
/// Returns the bytes gathered before any error, plus the error itself.
pub fn concat_all<R: Read>(scanner: ChunkScanner<R>) -> (Vec<u8>, Option<IffError>) {
    let mut out = Vec::new();
    for item in scanner {
        match item {
            Ok(payload) => out.extend_from_slice(&payload),
            Err(e) => return (out, Some(e)),
        }
    }
    (out, None)
}
