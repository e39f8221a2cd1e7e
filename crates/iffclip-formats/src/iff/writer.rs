//! Streaming IFF writer
//!
//! Chunks are opened and closed through [`ChunkHandle`]s in strict LIFO
//! order. A chunk whose size is declared up front streams straight to the
//! sink; a chunk with unknown size buffers its contents until it is closed,
//! at which point the header is known and everything is flushed to the
//! enclosing chunk (or the sink).

use std::io::Write;

use tracing::trace;

use super::error::{IffError, IffResult};
use super::header::{ChunkHeader, GroupHeader};
use super::stack::{ChunkHandle, ChunkStack};
use super::tag::TypeTag;

/// Bytes a group size counts before its children (the subtype)
const SUBTYPE_LEN: u64 = 4;

#[derive(Debug)]
struct WriteFrame {
    id: TypeTag,
    /// `Some` for group chunks
    subtype: Option<TypeTag>,
    /// Size written into the header, when known at open time
    declared: Option<u32>,
    /// Content bytes accounted to this chunk so far (excluding the subtype)
    written: u64,
    /// Deferred content for chunks of unknown size
    buffer: Option<Vec<u8>>,
}

impl WriteFrame {
    const fn is_group(&self) -> bool {
        self.subtype.is_some()
    }

    /// Maximum number of content bytes this chunk may hold
    fn content_limit(&self) -> u64 {
        let subtype_len = if self.is_group() { SUBTYPE_LEN } else { 0 };
        match self.declared {
            Some(size) => u64::from(size).saturating_sub(subtype_len),
            None => u64::from(u32::MAX) - subtype_len,
        }
    }
}

/// Writes a well-formed IFF stream into any [`Write`] sink
#[derive(Debug)]
pub struct IffWriter<W: Write> {
    inner: W,
    stack: ChunkStack<WriteFrame>,
}

impl<W: Write> IffWriter<W> {
    /// Create a writer over `inner`
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            stack: ChunkStack::new(),
        }
    }

    /// Number of open chunks
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Borrow the sink
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Open a group chunk (`FORM`, `LIST`, `CAT ` or `PROP`).
    ///
    /// With `size` set, the header is written immediately and the group must
    /// receive exactly `size - 4` bytes of children. Without it the group is
    /// buffered and sized on close.
    pub fn open_container(
        &mut self,
        id: TypeTag,
        subtype: TypeTag,
        size: Option<u32>,
    ) -> IffResult<ChunkHandle> {
        if !id.is_group() {
            return Err(IffError::InvalidTag(id));
        }
        if !subtype.is_valid_id() {
            return Err(IffError::InvalidTag(subtype));
        }
        self.ensure_container_top(id)?;

        let buffer = match size {
            Some(declared) => {
                if u64::from(declared) < SUBTYPE_LEN {
                    return Err(IffError::MalformedChunk(format!(
                        "group {id} declared size {declared} is smaller than its subtype"
                    )));
                }
                let header = GroupHeader::new(id, declared, subtype).encode()?;
                self.emit(&header)?;
                None
            }
            None => Some(Vec::new()),
        };

        trace!(%id, %subtype, ?size, depth = self.stack.depth(), "open container");
        Ok(self.stack.push(WriteFrame {
            id,
            subtype: Some(subtype),
            declared: size,
            written: 0,
            buffer,
        }))
    }

    /// Open a `FORM` of unknown size
    pub fn open_form(&mut self, subtype: TypeTag) -> IffResult<ChunkHandle> {
        self.open_container(TypeTag::FORM, subtype, None)
    }

    /// Open a leaf chunk.
    ///
    /// A `size_hint` makes the leaf stream directly and fixes its payload
    /// length; without one the payload is buffered until close.
    pub fn open_leaf(&mut self, id: TypeTag, size_hint: Option<u32>) -> IffResult<ChunkHandle> {
        if !id.is_valid_id() || id.is_group() {
            return Err(IffError::InvalidTag(id));
        }
        self.ensure_container_top(id)?;

        let buffer = match size_hint {
            Some(declared) => {
                let header = ChunkHeader::new(id, declared).encode()?;
                self.emit(&header)?;
                None
            }
            None => Some(Vec::new()),
        };

        trace!(%id, ?size_hint, depth = self.stack.depth(), "open leaf");
        Ok(self.stack.push(WriteFrame {
            id,
            subtype: None,
            declared: size_hint,
            written: 0,
            buffer,
        }))
    }

    /// Append payload bytes to the innermost leaf
    pub fn write_bytes(&mut self, handle: ChunkHandle, data: &[u8]) -> IffResult<usize> {
        self.stack.check_top(handle)?;
        if self.stack.top().is_some_and(WriteFrame::is_group) {
            return Err(IffError::MalformedNesting(
                "raw bytes can only be written to a leaf chunk".to_string(),
            ));
        }
        self.emit(data)?;
        Ok(data.len())
    }

    /// Close the innermost chunk, which must be `handle`
    pub fn close(&mut self, handle: ChunkHandle) -> IffResult<()> {
        let frame = self.stack.pop(handle)?;
        trace!(id = %frame.id, written = frame.written, "close chunk");

        match (frame.buffer, frame.subtype) {
            (None, subtype) => {
                if let Some(declared) = frame.declared {
                    let expected = frame_content_len(declared, subtype.is_some());
                    if frame.written != expected {
                        return Err(IffError::SizeMismatch {
                            tag: frame.id,
                            declared,
                            written: u32::try_from(frame.written).unwrap_or(u32::MAX),
                        });
                    }
                    if subtype.is_none() && declared & 1 == 1 {
                        self.emit(&[0])?;
                    }
                }
            }
            (Some(buffer), Some(subtype)) => {
                let size = u32::try_from(buffer.len() as u64 + SUBTYPE_LEN)
                    .map_err(|_| IffError::ChunkTooLarge(buffer.len() as u64 + SUBTYPE_LEN))?;
                let header = GroupHeader::new(frame.id, size, subtype).encode()?;
                self.emit(&header)?;
                self.emit(&buffer)?;
            }
            (Some(buffer), None) => {
                let size = u32::try_from(buffer.len())
                    .map_err(|_| IffError::ChunkTooLarge(buffer.len() as u64))?;
                let header = ChunkHeader::new(frame.id, size).encode()?;
                self.emit(&header)?;
                self.emit(&buffer)?;
                if size & 1 == 1 {
                    self.emit(&[0])?;
                }
            }
        }
        Ok(())
    }

    /// Write a complete leaf in one call
    pub fn write_leaf(&mut self, id: TypeTag, data: &[u8]) -> IffResult<()> {
        let size =
            u32::try_from(data.len()).map_err(|_| IffError::ChunkTooLarge(data.len() as u64))?;
        let handle = self.open_leaf(id, Some(size))?;
        self.write_bytes(handle, data)?;
        self.close(handle)
    }

    /// Open a buffered group, run `body` inside it, and close it
    pub fn with_container<T>(
        &mut self,
        id: TypeTag,
        subtype: TypeTag,
        body: impl FnOnce(&mut Self) -> IffResult<T>,
    ) -> IffResult<T> {
        let handle = self.open_container(id, subtype, None)?;
        let value = body(self)?;
        self.close(handle)?;
        Ok(value)
    }

    /// Check that every chunk is closed, flush, and hand back the sink
    pub fn finish(mut self) -> IffResult<W> {
        if !self.stack.is_empty() {
            return Err(IffError::MalformedNesting(format!(
                "{} chunk(s) still open at finish",
                self.stack.depth()
            )));
        }
        self.inner.flush().map_err(IffError::WriteFailed)?;
        Ok(self.inner)
    }

    fn ensure_container_top(&self, id: TypeTag) -> IffResult<()> {
        match self.stack.top() {
            Some(frame) if !frame.is_group() => Err(IffError::MalformedNesting(format!(
                "cannot open {id} inside leaf chunk {}",
                frame.id
            ))),
            _ => Ok(()),
        }
    }

    /// Route bytes to the innermost buffering chunk, or to the sink when every
    /// open chunk streams. Each chunk from that point inward accounts for them.
    fn emit(&mut self, bytes: &[u8]) -> IffResult<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let len = bytes.len() as u64;
        let target = self.stack.iter().rposition(|frame| frame.buffer.is_some());
        let start = target.unwrap_or(0);

        for frame in self.stack.iter().skip(start) {
            let attempted = frame.written + len;
            if attempted > frame.content_limit() {
                return Err(match frame.declared {
                    Some(declared) => IffError::ChunkOverflow {
                        tag: frame.id,
                        declared,
                        attempted,
                    },
                    None => IffError::ChunkTooLarge(attempted),
                });
            }
        }

        for (index, frame) in self.stack.iter_mut().enumerate().skip(start) {
            frame.written += len;
            if Some(index) == target
                && let Some(buffer) = frame.buffer.as_mut()
            {
                buffer.extend_from_slice(bytes);
            }
        }

        if target.is_none() {
            self.inner.write_all(bytes).map_err(IffError::WriteFailed)?;
        }
        Ok(())
    }
}

const fn frame_content_len(declared: u32, is_group: bool) -> u64 {
    if is_group {
        declared as u64 - SUBTYPE_LEN
    } else {
        declared as u64
    }
}
