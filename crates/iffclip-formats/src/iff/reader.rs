//! Streaming IFF reader
//!
//! The reader pulls chunk headers one at a time from any [`Read`] source and
//! reports them as [`IffEvent`]s. Payloads are never buffered: the caller
//! either pulls bytes with [`IffReader::read_chunk_bytes`] or moves on, in
//! which case the unread remainder and the pad byte are skipped.

use std::io::{ErrorKind, Read};

use tracing::trace;

use super::error::{IffError, IffResult};
use super::header::{CHUNK_HEADER_SIZE, ChunkHeader, padded_len};
use super::stack::ChunkStack;
use super::tag::TypeTag;

/// Scratch size used when skipping unread payload
const SKIP_BUFFER_SIZE: usize = 4096;

/// One step of a parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IffEvent {
    /// A group chunk header was read; its children follow
    EnterContainer {
        /// Group id
        id: TypeTag,
        /// Group subtype
        subtype: TypeTag,
        /// Declared size (subtype + children)
        size: u32,
    },
    /// A leaf chunk header was read; its payload is now current
    Chunk {
        /// Subtype of the enclosing group, or [`TypeTag::NONE`] at top level
        container: TypeTag,
        /// Leaf id
        id: TypeTag,
        /// Declared payload size
        size: u32,
    },
    /// The innermost group has been fully consumed
    EndOfContainer {
        /// Group id
        id: TypeTag,
        /// Group subtype
        subtype: TypeTag,
    },
    /// The source ended cleanly between top-level chunks
    EndOfStream,
}

#[derive(Debug)]
struct ReadContext {
    id: TypeTag,
    subtype: TypeTag,
    remaining: u64,
    pad: bool,
}

/// The leaf chunk whose payload is currently readable
#[derive(Debug)]
struct LeafState {
    id: TypeTag,
    remaining: u64,
    pad: bool,
}

/// Event-driven reader over an IFF byte stream
#[derive(Debug)]
pub struct IffReader<R: Read> {
    inner: R,
    stack: ChunkStack<ReadContext>,
    leaf: Option<LeafState>,
    position: u64,
    finished: bool,
}

impl<R: Read> IffReader<R> {
    /// Create a reader over `inner`
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            stack: ChunkStack::new(),
            leaf: None,
            position: 0,
            finished: false,
        }
    }

    /// Bytes consumed from the source so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Number of groups currently entered
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Advance to the next event, skipping any unread payload first
    pub fn next_event(&mut self) -> IffResult<IffEvent> {
        self.skip_remainder()?;
        if self.finished {
            return Ok(IffEvent::EndOfStream);
        }

        if self.stack.top().is_some_and(|ctx| ctx.remaining == 0)
            && let Some(ctx) = self.stack.pop_top()
        {
            if ctx.pad {
                self.skip(1, ctx.id)?;
            }
            trace!(id = %ctx.id, subtype = %ctx.subtype, "leave container");
            return Ok(IffEvent::EndOfContainer {
                id: ctx.id,
                subtype: ctx.subtype,
            });
        }

        let start = self.position;
        let mut raw = [0u8; CHUNK_HEADER_SIZE];
        let got = self.read_up_to(&mut raw)?;
        if got == 0 {
            if let Some(ctx) = self.stack.top() {
                return Err(IffError::TruncatedStream(format!(
                    "stream ended with {} byte(s) of {} {} outstanding",
                    ctx.remaining, ctx.id, ctx.subtype
                )));
            }
            self.finished = true;
            trace!(position = start, "end of stream");
            return Ok(IffEvent::EndOfStream);
        }
        if got < CHUNK_HEADER_SIZE {
            return Err(IffError::TruncatedStream(format!(
                "partial chunk header at offset {start} ({got} of {CHUNK_HEADER_SIZE} bytes)"
            )));
        }

        let header = ChunkHeader::decode(&raw)?;
        if !header.id.is_valid_id() {
            return Err(IffError::InvalidTag(header.id));
        }
        let total = CHUNK_HEADER_SIZE as u64 + padded_len(header.size);
        let container = self.stack.top().map_or(TypeTag::NONE, |ctx| ctx.subtype);
        if let Some(parent) = self.stack.top_mut() {
            if total > parent.remaining {
                return Err(IffError::MalformedChunk(format!(
                    "chunk {} at offset {start} needs {total} bytes but {} {} has {} left",
                    header.id, parent.id, parent.subtype, parent.remaining
                )));
            }
            parent.remaining -= total;
        }

        if header.id.is_group() {
            if header.size < 4 {
                return Err(IffError::MalformedChunk(format!(
                    "group {} at offset {start} has size {} smaller than its subtype",
                    header.id, header.size
                )));
            }
            let mut subtype = [0u8; 4];
            if self.read_up_to(&mut subtype)? < subtype.len() {
                return Err(IffError::TruncatedStream(format!(
                    "missing subtype for {} at offset {start}",
                    header.id
                )));
            }
            let subtype = TypeTag::new(subtype);
            trace!(id = %header.id, %subtype, size = header.size, "enter container");
            self.stack.push(ReadContext {
                id: header.id,
                subtype,
                remaining: u64::from(header.size) - 4,
                pad: header.size & 1 == 1,
            });
            return Ok(IffEvent::EnterContainer {
                id: header.id,
                subtype,
                size: header.size,
            });
        }

        trace!(%container, id = %header.id, size = header.size, "chunk");
        self.leaf = Some(LeafState {
            id: header.id,
            remaining: u64::from(header.size),
            pad: header.size & 1 == 1,
        });
        Ok(IffEvent::Chunk {
            container,
            id: header.id,
            size: header.size,
        })
    }

    /// Read payload bytes of the current leaf into `buf`.
    ///
    /// Returns 0 once the payload is exhausted or when no leaf is current.
    /// A source that ends inside the payload yields `TruncatedStream`.
    pub fn read_chunk_bytes(&mut self, buf: &mut [u8]) -> IffResult<usize> {
        let Some(leaf) = self.leaf.as_mut() else {
            return Ok(0);
        };
        if leaf.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let want = buf.len().min(usize::try_from(leaf.remaining).unwrap_or(usize::MAX));
        loop {
            match self.inner.read(&mut buf[..want]) {
                Ok(0) => {
                    return Err(IffError::TruncatedStream(format!(
                        "stream ended with {} byte(s) of {} unread",
                        leaf.remaining, leaf.id
                    )));
                }
                Ok(n) => {
                    leaf.remaining -= n as u64;
                    self.position += n as u64;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(IffError::ReadFailed(e)),
            }
        }
    }

    /// Discard whatever is left of the current leaf, pad byte included
    pub fn skip_remainder(&mut self) -> IffResult<()> {
        if let Some(leaf) = self.leaf.take() {
            self.skip(leaf.remaining + u64::from(leaf.pad), leaf.id)?;
        }
        Ok(())
    }

    fn skip(&mut self, mut count: u64, id: TypeTag) -> IffResult<()> {
        let mut scratch = [0u8; SKIP_BUFFER_SIZE];
        while count > 0 {
            let want = usize::try_from(count).map_or(SKIP_BUFFER_SIZE, |c| c.min(SKIP_BUFFER_SIZE));
            match self.inner.read(&mut scratch[..want]) {
                Ok(0) => {
                    return Err(IffError::TruncatedStream(format!(
                        "stream ended while skipping {count} byte(s) of {id}"
                    )));
                }
                Ok(n) => {
                    count -= n as u64;
                    self.position += n as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(IffError::ReadFailed(e)),
            }
        }
        Ok(())
    }

    /// Fill `buf` as far as the source allows; a short count means end of input
    fn read_up_to(&mut self, buf: &mut [u8]) -> IffResult<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(IffError::ReadFailed(e)),
            }
        }
        self.position += filled as u64;
        Ok(filled)
    }
}
