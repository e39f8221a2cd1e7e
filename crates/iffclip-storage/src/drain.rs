//! Session drain helper

use std::io::{ErrorKind, Read};

use crate::DRAIN_BUFFER_SIZE;

/// Read `source` until a zero-length read, discarding the bytes.
///
/// Returns the number of bytes drained. Stops at the first error.
pub fn drain<R: Read + ?Sized>(source: &mut R) -> std::io::Result<u64> {
    let mut buf = [0u8; DRAIN_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        match source.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => total += n as u64,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}
