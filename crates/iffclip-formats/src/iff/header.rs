//! Chunk header records
//!
//! All IFF integers are big-endian. A leaf header is 8 bytes (`id`, `size`);
//! a group header adds the 4-byte subtype for 12 bytes total. The group
//! `size` counts the subtype and every child including pad bytes.

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};

use super::error::IffResult;
use super::tag::TypeTag;

/// Size of a leaf chunk header on the wire
pub const CHUNK_HEADER_SIZE: usize = 8;

/// Size of a group chunk header on the wire (leaf header + subtype)
pub const GROUP_HEADER_SIZE: usize = 12;

/// Leaf chunk header: id and payload size
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct ChunkHeader {
    /// Chunk id
    pub id: TypeTag,
    /// Payload size, excluding the pad byte
    pub size: u32,
}

impl ChunkHeader {
    /// Create a header
    pub const fn new(id: TypeTag, size: u32) -> Self {
        Self { id, size }
    }

    /// Decode a header from exactly 8 bytes
    pub fn decode(bytes: &[u8; CHUNK_HEADER_SIZE]) -> IffResult<Self> {
        Ok(Self::read_be(&mut Cursor::new(&bytes[..]))?)
    }

    /// Encode the header into 8 bytes
    pub fn encode(&self) -> IffResult<[u8; CHUNK_HEADER_SIZE]> {
        let mut buf = [0u8; CHUNK_HEADER_SIZE];
        self.write_be(&mut Cursor::new(&mut buf[..]))?;
        Ok(buf)
    }

    /// Bytes this chunk occupies after its header, including the pad byte
    pub const fn padded_size(&self) -> u64 {
        padded_len(self.size)
    }
}

/// Group chunk header: group id, size, and subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct GroupHeader {
    /// Group id (`FORM`, `LIST`, `CAT `, `PROP`)
    pub id: TypeTag,
    /// Size of subtype plus contents
    pub size: u32,
    /// Subtype (for `FORM`, the form type such as `FTXT`)
    pub subtype: TypeTag,
}

impl GroupHeader {
    /// Create a header
    pub const fn new(id: TypeTag, size: u32, subtype: TypeTag) -> Self {
        Self { id, size, subtype }
    }

    /// Decode a header from exactly 12 bytes
    pub fn decode(bytes: &[u8; GROUP_HEADER_SIZE]) -> IffResult<Self> {
        Ok(Self::read_be(&mut Cursor::new(&bytes[..]))?)
    }

    /// Encode the header into 12 bytes
    pub fn encode(&self) -> IffResult<[u8; GROUP_HEADER_SIZE]> {
        let mut buf = [0u8; GROUP_HEADER_SIZE];
        self.write_be(&mut Cursor::new(&mut buf[..]))?;
        Ok(buf)
    }
}

/// Payload length rounded up to the next even number
pub const fn padded_len(size: u32) -> u64 {
    let size = size as u64;
    size + (size & 1)
}

/// What the first bytes of a stream look like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamHead {
    /// Stream starts with a group chunk
    Group(GroupHeader),
    /// Stream starts with a bare leaf chunk
    Chunk(ChunkHeader),
    /// Too short or not a chunk header
    Unrecognized,
}

impl StreamHead {
    /// Classify the first (up to 12) bytes of a stream.
    ///
    /// Only as many bytes as a header needs are inspected; the payload is
    /// never looked at.
    pub fn classify(prefix: &[u8]) -> Self {
        if prefix.len() >= GROUP_HEADER_SIZE {
            let mut bytes = [0u8; GROUP_HEADER_SIZE];
            bytes.copy_from_slice(&prefix[..GROUP_HEADER_SIZE]);
            if let Ok(header) = GroupHeader::decode(&bytes)
                && header.id.is_group()
            {
                return Self::Group(header);
            }
        }

        if prefix.len() >= CHUNK_HEADER_SIZE {
            let mut bytes = [0u8; CHUNK_HEADER_SIZE];
            bytes.copy_from_slice(&prefix[..CHUNK_HEADER_SIZE]);
            if let Ok(header) = ChunkHeader::decode(&bytes)
                && header.id.is_valid_id()
                && !header.id.is_group()
            {
                return Self::Chunk(header);
            }
        }

        Self::Unrecognized
    }

    /// Whether the stream is a `FORM FTXT`
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Group(h) if h.id == TypeTag::FORM && h.subtype == TypeTag::FTXT)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_header_big_endian() {
        let header = ChunkHeader::new(TypeTag::CHRS, 0x0102_0304);
        let bytes = header.encode().expect("encode");
        assert_eq!(&bytes, b"CHRS\x01\x02\x03\x04");
        assert_eq!(ChunkHeader::decode(&bytes).expect("decode"), header);
    }

    #[test]
    fn test_group_header_layout() {
        let bytes = *b"FORM\x00\x00\x00\x0eFTXT";
        let header = GroupHeader::decode(&bytes).expect("decode");
        assert_eq!(header.id, TypeTag::FORM);
        assert_eq!(header.size, 14);
        assert_eq!(header.subtype, TypeTag::FTXT);
        assert_eq!(header.encode().expect("encode"), bytes);
    }

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0), 0);
        assert_eq!(padded_len(7), 8);
        assert_eq!(padded_len(8), 8);
        assert_eq!(padded_len(u32::MAX), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_classify() {
        assert!(StreamHead::classify(b"FORM\x00\x00\x00\x04FTXT").is_text());
        assert!(matches!(
            StreamHead::classify(b"FORM\x00\x00\x00\x04ILBM"),
            StreamHead::Group(h) if h.subtype == TypeTag::new(*b"ILBM")
        ));
        assert!(matches!(
            StreamHead::classify(b"CHRS\x00\x00\x00\x02hi"),
            StreamHead::Chunk(h) if h.id == TypeTag::CHRS && h.size == 2
        ));
        assert_eq!(StreamHead::classify(b"FORM"), StreamHead::Unrecognized);
        assert_eq!(StreamHead::classify(b""), StreamHead::Unrecognized);
        assert_eq!(
            StreamHead::classify(b"\x00\x01\x02\x03\x04\x05\x06\x07"),
            StreamHead::Unrecognized
        );
    }
}
