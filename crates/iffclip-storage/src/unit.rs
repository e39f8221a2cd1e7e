//! Clipboard unit identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::StorageError;

/// A clipboard unit number in `0..=255`.
///
/// Unit 0 is the primary working unit; every other unit is general purpose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Unit(u8);

impl Unit {
    /// The primary working unit
    pub const PRIMARY: Self = Self(0);

    /// Highest unit number
    pub const MAX: Self = Self(u8::MAX);

    /// Create a unit from its number
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// Unit number
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Whether this is the primary unit
    pub const fn is_primary(self) -> bool {
        self.0 == 0
    }

    /// Every unit from 0 to 255
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=u8::MAX).map(Self)
    }

    /// File name stem used for this unit on disk, e.g. `unit-007`
    pub fn file_stem(self) -> String {
        format!("unit-{:03}", self.0)
    }
}

impl From<u8> for Unit {
    fn from(number: u8) -> Self {
        Self(number)
    }
}

impl TryFrom<u32> for Unit {
    type Error = StorageError;

    fn try_from(number: u32) -> Result<Self, Self::Error> {
        u8::try_from(number)
            .map(Self)
            .map_err(|_| StorageError::InvalidUnit(number))
    }
}

impl FromStr for Unit {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number: u32 = s
            .trim()
            .parse()
            .map_err(|_| StorageError::Config(format!("not a unit number: {s:?}")))?;
        Self::try_from(number)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
