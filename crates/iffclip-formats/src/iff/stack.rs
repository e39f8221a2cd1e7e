//! Chunk stack shared by the writer and the reader
//!
//! The stack holds the currently open chunks, innermost last. Every push
//! hands out a [`ChunkHandle`]; a handle can only be popped while it is the
//! innermost entry, which is how out-of-order closes are caught.

use super::error::{IffError, IffResult};

/// Opaque reference to an open chunk.
///
/// Handles carry a serial number so a stale handle from a closed chunk
/// never matches a newer chunk opened at the same depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHandle {
    depth: usize,
    serial: u64,
}

impl ChunkHandle {
    /// Nesting depth of the chunk (0 = outermost)
    pub const fn depth(&self) -> usize {
        self.depth
    }
}

/// Ordered stack of open chunk frames
#[derive(Debug)]
pub struct ChunkStack<F> {
    frames: Vec<(u64, F)>,
    next_serial: u64,
}

impl<F> Default for ChunkStack<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> ChunkStack<F> {
    /// Create an empty stack
    pub const fn new() -> Self {
        Self {
            frames: Vec::new(),
            next_serial: 0,
        }
    }

    /// Push a frame and return its handle
    pub fn push(&mut self, frame: F) -> ChunkHandle {
        let serial = self.next_serial;
        self.next_serial += 1;
        let depth = self.frames.len();
        self.frames.push((serial, frame));
        ChunkHandle { depth, serial }
    }

    /// Pop the innermost frame, which must be the one `handle` refers to
    pub fn pop(&mut self, handle: ChunkHandle) -> IffResult<F> {
        self.check_top(handle)?;
        self.frames
            .pop()
            .map(|(_, frame)| frame)
            .ok_or_else(|| IffError::MalformedNesting("chunk stack is empty".to_string()))
    }

    /// Pop the innermost frame without a handle (reader side)
    pub fn pop_top(&mut self) -> Option<F> {
        self.frames.pop().map(|(_, frame)| frame)
    }

    /// Fail with `MalformedNesting` unless `handle` is the innermost frame
    pub fn check_top(&self, handle: ChunkHandle) -> IffResult<()> {
        match self.frames.last() {
            Some((serial, _))
                if *serial == handle.serial && handle.depth + 1 == self.frames.len() =>
            {
                Ok(())
            }
            Some(_) if self.is_open(handle) => Err(IffError::MalformedNesting(format!(
                "chunk at depth {} closed while {} inner chunk(s) are open",
                handle.depth,
                self.frames.len() - handle.depth - 1
            ))),
            _ => Err(IffError::MalformedNesting(format!(
                "chunk handle at depth {} is not open",
                handle.depth
            ))),
        }
    }

    /// Whether `handle` refers to a frame still on the stack
    pub fn is_open(&self, handle: ChunkHandle) -> bool {
        self.frames
            .get(handle.depth)
            .is_some_and(|(serial, _)| *serial == handle.serial)
    }

    /// Innermost frame
    pub fn top(&self) -> Option<&F> {
        self.frames.last().map(|(_, frame)| frame)
    }

    /// Innermost frame, mutably
    pub fn top_mut(&mut self) -> Option<&mut F> {
        self.frames.last_mut().map(|(_, frame)| frame)
    }

    /// Frames from outermost to innermost
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &F> + ExactSizeIterator {
        self.frames.iter().map(|(_, frame)| frame)
    }

    /// Frames from outermost to innermost, mutably
    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut F> + ExactSizeIterator {
        self.frames.iter_mut().map(|(_, frame)| frame)
    }

    /// Number of open frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frame is open
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_in_order() {
        let mut stack = ChunkStack::new();
        let outer = stack.push("outer");
        let inner = stack.push("inner");
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop(inner).unwrap(), "inner");
        assert_eq!(stack.pop(outer).unwrap(), "outer");
        assert!(stack.is_empty());
    }

    #[test]
    fn test_out_of_order_pop_rejected() {
        let mut stack = ChunkStack::new();
        let outer = stack.push(1);
        let _inner = stack.push(2);
        let err = stack.pop(outer).expect_err("outer is not innermost");
        assert!(matches!(err, IffError::MalformedNesting(_)));
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut stack = ChunkStack::new();
        let first = stack.push(1);
        stack.pop(first).unwrap();
        let _second = stack.push(2);
        assert!(!stack.is_open(first));
        assert!(matches!(
            stack.pop(first),
            Err(IffError::MalformedNesting(_))
        ));
    }
}
