//! Header peek on a read session

use std::io::{Chain, Cursor, Read};

use iffclip_formats::iff::{GROUP_HEADER_SIZE, StreamHead};
use iffclip_storage::ReadSession;

use crate::error::ClipResult;

/// Up to the first 12 bytes of a unit's content
#[derive(Debug, Clone, Copy)]
pub struct Peeked {
    bytes: [u8; GROUP_HEADER_SIZE],
    len: usize,
}

impl Peeked {
    /// Read at most a group header's worth of bytes from `session`
    pub fn read_from(session: &mut ReadSession) -> ClipResult<Self> {
        let mut bytes = [0u8; GROUP_HEADER_SIZE];
        let mut len = 0;
        while len < GROUP_HEADER_SIZE {
            let chunk = session.read_chunk(GROUP_HEADER_SIZE - len)?;
            if chunk.data.is_empty() {
                break;
            }
            bytes[len..len + chunk.data.len()].copy_from_slice(&chunk.data);
            len += chunk.data.len();
        }
        Ok(Self { bytes, len })
    }

    /// The peeked bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Whether the unit had no content at all
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Classification of the peeked header
    pub fn head(&self) -> StreamHead {
        StreamHead::classify(self.bytes())
    }

    /// The peeked bytes followed by the rest of the stream
    pub fn replay<R: Read>(&self, rest: R) -> Chain<Cursor<&[u8]>, R> {
        Cursor::new(self.bytes()).chain(rest)
    }
}
