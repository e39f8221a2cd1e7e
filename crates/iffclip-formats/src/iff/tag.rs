//! Four-character chunk type tags

use std::fmt;

use binrw::io::{Read, Seek, Write};
use binrw::{BinRead, BinResult, BinWrite};

/// A four-byte, case-sensitive chunk type identifier.
///
/// Tags are stored on the wire as four raw bytes. Comparing tags compares
/// the raw bytes, so `FORM` and `form` are different tags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TypeTag([u8; 4]);

impl TypeTag {
    /// Placeholder used for "no enclosing container" (four NUL bytes)
    pub const NONE: Self = Self([0; 4]);

    /// `FORM` group: a typed container of chunks
    pub const FORM: Self = Self(*b"FORM");
    /// `LIST` group: a container of typed groups sharing properties
    pub const LIST: Self = Self(*b"LIST");
    /// `CAT ` group: a concatenation of groups
    pub const CAT: Self = Self(*b"CAT ");
    /// `PROP` group: shared properties inside a `LIST`
    pub const PROP: Self = Self(*b"PROP");

    /// `FTXT` form subtype: formatted text
    pub const FTXT: Self = Self(*b"FTXT");
    /// `CHRS` leaf: a run of 8-bit characters
    pub const CHRS: Self = Self(*b"CHRS");

    /// Create a tag from raw bytes
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Create a tag from a big-endian packed `u32` (`'F' << 24 | 'O' << 16 ...`)
    pub const fn from_u32(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    /// Pack the tag into a big-endian `u32`
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Raw tag bytes
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0
    }

    /// Borrow the raw tag bytes
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Whether this tag names a group chunk (`FORM`, `LIST`, `CAT `, `PROP`)
    pub fn is_group(self) -> bool {
        matches!(self, Self::FORM | Self::LIST | Self::CAT | Self::PROP)
    }

    /// Whether the tag is a legal chunk id.
    ///
    /// Every byte must be printable ASCII and the first byte may not be a
    /// space. Trailing spaces are allowed (`CAT `).
    pub fn is_valid_id(self) -> bool {
        self.0[0] != b' ' && self.0.iter().all(|b| (0x20..=0x7E).contains(b))
    }
}

impl From<[u8; 4]> for TypeTag {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl From<TypeTag> for [u8; 4] {
    fn from(tag: TypeTag) -> Self {
        tag.0
    }
}

impl TryFrom<&str> for TypeTag {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let bytes: [u8; 4] = value
            .as_bytes()
            .try_into()
            .map_err(|_| format!("type tag must be exactly 4 bytes, got {:?}", value))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for TypeTag {
    /// Printable rendering; bytes outside printable ASCII become `.`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if (0x20..=0x7E).contains(&b) {
                b as char
            } else {
                '.'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({:?})", self.to_string())
    }
}

impl BinRead for TypeTag {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let mut bytes = [0u8; 4];
        reader.read_exact(&mut bytes)?;
        Ok(Self(bytes))
    }
}

impl BinWrite for TypeTag {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        writer.write_all(&self.0)?;
        Ok(())
    }
}
