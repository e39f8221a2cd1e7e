//! Read and write sessions on a clipboard unit
//!
//! Both session kinds hold the unit's claim for their whole lifetime. A read
//! session drains whatever the caller left unread before it lets go of the
//! claim; a write session only touches the visible content on `commit`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};
use std::path::PathBuf;

use rand::{RngExt, rng};
use tracing::{debug, info, warn};

use crate::device::ClipboardDevice;
use crate::drain::drain;
use crate::lock::UnitLock;
use crate::{MAX_CONTENT_SIZE, Result, StorageError, Unit};

/// Attempts at finding an unused temp file name for a new generation
const GENERATION_ATTEMPTS: usize = 4;

/// Result of one [`ReadSession::read_chunk`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadChunk {
    /// Bytes read; empty means end of content
    pub data: Vec<u8>,
    /// Whether the cursor reached the end of content with this read
    pub is_final: bool,
}

/// Sequential reader over a unit's committed content
#[derive(Debug)]
pub struct ReadSession {
    unit: Unit,
    file: Option<File>,
    len: u64,
    cursor: u64,
    max_read: usize,
    drained: bool,
    _lock: UnitLock,
}

impl ReadSession {
    pub(crate) fn open(device: &ClipboardDevice, unit: Unit, lock: UnitLock) -> Result<Self> {
        let file = match File::open(device.content_path(unit)) {
            Ok(file) => Some(file),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(source) => return Err(StorageError::ReadFailed { unit, source }),
        };
        let len = match &file {
            Some(file) => file
                .metadata()
                .map_err(|source| StorageError::ReadFailed { unit, source })?
                .len(),
            None => 0,
        };
        if len > MAX_CONTENT_SIZE {
            return Err(StorageError::ReadFailed {
                unit,
                source: io::Error::new(
                    ErrorKind::InvalidData,
                    format!("content is {len} bytes, above the 32-bit size limit"),
                ),
            });
        }

        debug!(%unit, len, "opened unit for reading");
        Ok(Self {
            unit,
            file,
            len,
            cursor: 0,
            max_read: device.config().read_buffer_size,
            drained: false,
            _lock: lock,
        })
    }

    /// Unit being read
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    /// Size of the committed content
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Whether the unit holds no content
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes consumed so far
    pub const fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Read up to `max_len` bytes.
    ///
    /// Returned chunks shrink towards the end of content; an empty chunk is
    /// the end-of-content signal. A `max_len` of zero is rejected so an empty
    /// chunk never stands for anything else.
    pub fn read_chunk(&mut self, max_len: usize) -> Result<ReadChunk> {
        if max_len == 0 {
            return Err(StorageError::ReadFailed {
                unit: self.unit,
                source: io::Error::new(ErrorKind::InvalidInput, "read length must be at least 1"),
            });
        }
        let want = max_len.min(self.max_read).min(self.remaining_usize());
        let mut data = vec![0u8; want];
        let n = self.read_into(&mut data)?;
        data.truncate(n);
        Ok(ReadChunk {
            data,
            is_final: self.cursor >= self.len,
        })
    }

    /// Drain the remaining content and release the unit.
    ///
    /// Returns how many unread bytes were drained.
    pub fn close(mut self) -> Result<u64> {
        let unit = self.unit;
        let drained = drain(&mut self).map_err(|source| StorageError::ReadFailed { unit, source });
        self.drained = true;
        if let Ok(n) = drained
            && n > 0
        {
            debug!(%unit, bytes = n, "drained unread content");
        }
        drained
    }

    fn remaining_usize(&self) -> usize {
        usize::try_from(self.len - self.cursor).unwrap_or(usize::MAX)
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        let want = buf.len().min(self.max_read).min(self.remaining_usize());
        if want == 0 {
            return Ok(0);
        }
        let Some(file) = self.file.as_mut() else {
            return Ok(0);
        };
        loop {
            match file.read(&mut buf[..want]) {
                Ok(0) => {
                    warn!(
                        unit = %self.unit,
                        expected = self.len,
                        got = self.cursor,
                        "unit content shrank while reading"
                    );
                    self.len = self.cursor;
                    return Ok(0);
                }
                Ok(n) => {
                    self.cursor += n as u64;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(source) => {
                    return Err(StorageError::ReadFailed {
                        unit: self.unit,
                        source,
                    });
                }
            }
        }
    }
}

impl Read for ReadSession {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_into(buf).map_err(Into::into)
    }
}

impl Drop for ReadSession {
    fn drop(&mut self) {
        if self.drained {
            return;
        }
        match drain(self) {
            Ok(0) => {}
            Ok(n) => debug!(unit = %self.unit, bytes = n, "drained unread content"),
            Err(e) => warn!(unit = %self.unit, error = %e, "failed to drain read session"),
        }
    }
}

/// Sequential writer producing a unit's next content
///
/// Bytes go to a temp file named after the session's generation tag and
/// replace the unit content in a single rename on [`commit`](Self::commit).
#[derive(Debug)]
pub struct WriteSession {
    unit: Unit,
    generation: u32,
    temp_path: PathBuf,
    content_path: PathBuf,
    file: Option<File>,
    written: u64,
    max_write: usize,
    committed: bool,
    _lock: UnitLock,
}

impl WriteSession {
    pub(crate) fn create(device: &ClipboardDevice, unit: Unit, lock: UnitLock) -> Result<Self> {
        let mut attempts = 0;
        loop {
            let generation: u32 = rng().random();
            let temp_path = device.temp_path(unit, generation);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&temp_path)
            {
                Ok(file) => {
                    debug!(
                        %unit,
                        generation = %format!("{generation:08x}"),
                        "opened unit for writing"
                    );
                    return Ok(Self {
                        unit,
                        generation,
                        temp_path,
                        content_path: device.content_path(unit),
                        file: Some(file),
                        written: 0,
                        max_write: device.config().max_write_chunk,
                        committed: false,
                        _lock: lock,
                    });
                }
                Err(e)
                    if e.kind() == ErrorKind::AlreadyExists && attempts < GENERATION_ATTEMPTS =>
                {
                    attempts += 1;
                }
                Err(source) => return Err(StorageError::WriteFailed { unit, source }),
            }
        }
    }

    /// Unit being written
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    /// Generation tag shared by every write of this session
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Bytes accepted so far
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Whether [`commit`](Self::commit) succeeded
    pub const fn is_committed(&self) -> bool {
        self.committed
    }

    /// Write part of `data`, returning how many bytes were accepted.
    ///
    /// At most `max_write_chunk` bytes are taken per call; the caller
    /// resubmits the rest.
    pub fn write_chunk(&mut self, data: &[u8]) -> Result<usize> {
        let unit = self.unit;
        if self.committed {
            return Err(StorageError::AlreadyCommitted(unit));
        }
        let Some(file) = self.file.as_mut() else {
            return Err(StorageError::WriteFailed {
                unit,
                source: io::Error::other("session ended by a failed commit"),
            });
        };
        let n = data.len().min(self.max_write);
        if self.written + n as u64 > MAX_CONTENT_SIZE {
            return Err(StorageError::WriteFailed {
                unit,
                source: io::Error::other("content would exceed the 32-bit size limit"),
            });
        }
        file.write_all(&data[..n])
            .map_err(|source| StorageError::WriteFailed { unit, source })?;
        self.written += n as u64;
        Ok(n)
    }

    /// Make everything written so far the unit's content in one step.
    ///
    /// A session with nothing written empties the unit.
    pub fn commit(&mut self) -> Result<()> {
        let unit = self.unit;
        if self.committed {
            return Err(StorageError::AlreadyCommitted(unit));
        }
        let Some(file) = self.file.take() else {
            return Err(StorageError::WriteFailed {
                unit,
                source: io::Error::other("session ended by a failed commit"),
            });
        };
        file.sync_all()
            .map_err(|source| StorageError::WriteFailed { unit, source })?;
        drop(file);

        if self.written == 0 {
            match fs::remove_file(&self.content_path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => return Err(StorageError::WriteFailed { unit, source }),
            }
            if let Err(e) = fs::remove_file(&self.temp_path) {
                warn!(%unit, error = %e, "failed to remove empty temp file");
            }
        } else {
            fs::rename(&self.temp_path, &self.content_path)
                .map_err(|source| StorageError::WriteFailed { unit, source })?;
        }

        self.committed = true;
        info!(
            %unit,
            generation = %format!("{:08x}", self.generation),
            bytes = self.written,
            "committed unit content"
        );
        Ok(())
    }

    /// Release the unit; uncommitted bytes are discarded
    pub fn close(self) {}
}

impl Write for WriteSession {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_chunk(buf).map_err(Into::into)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.as_mut().map_or(Ok(()), Write::flush)
    }
}

impl Drop for WriteSession {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        drop(self.file.take());
        match fs::remove_file(&self.temp_path) {
            Ok(()) => debug!(
                unit = %self.unit,
                generation = %format!("{:08x}", self.generation),
                bytes = self.written,
                "discarded uncommitted write"
            ),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(unit = %self.unit, error = %e, "failed to remove temp file"),
        }
    }
}
