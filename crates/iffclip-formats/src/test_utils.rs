//! Shared helpers for chunk format tests

use crate::ChunkFormat;
use std::fmt::Debug;

/// Build `original`, parse it back, and compare
pub fn test_round_trip<T>(original: &T) -> Result<(), Box<dyn std::error::Error>>
where
    T: ChunkFormat + PartialEq + Debug,
{
    let data = original.build()?;
    let parsed = T::parse(&data)?;
    if original != &parsed {
        let message = format!("round trip mismatch:\noriginal: {original:?}\nparsed: {parsed:?}");
        return Err(message.into());
    }
    T::verify_round_trip(&data)?;
    Ok(())
}

/// Parsing `invalid_data` must fail
pub fn test_invalid_data_rejected<T>(invalid_data: &[u8]) -> Result<(), Box<dyn std::error::Error>>
where
    T: ChunkFormat,
{
    match T::parse(invalid_data) {
        Ok(_) => Err("expected parsing to fail, but it succeeded".into()),
        Err(_) => Ok(()),
    }
}

/// Assert a value survives build then parse
#[macro_export]
macro_rules! assert_round_trip {
    ($value:expr) => {
        $crate::test_utils::test_round_trip(&$value).expect("round trip should succeed")
    };
}

/// Assert a type refuses to parse some bytes
#[macro_export]
macro_rules! assert_invalid_data_rejected {
    ($type:ty, $data:expr) => {
        $crate::test_utils::test_invalid_data_rejected::<$type>($data)
            .expect("invalid data should be rejected")
    };
}
