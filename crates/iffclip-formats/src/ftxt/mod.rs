//! `FORM FTXT` text documents
//!
//! A text form is a `FORM` of subtype `FTXT` holding one or more `CHRS`
//! leaves. Other leaves (font and style chunks) may appear between runs and
//! are ignored when the text is extracted.

use std::io::{Read, Write};

use tracing::debug;

use crate::ChunkFormat;
use crate::iff::{
    CHUNK_HEADER_SIZE, IffError, IffEvent, IffReader, IffResult, IffWriter, StreamHead, TypeTag,
    find_all, padded_len,
};

/// Buffer size used when streaming text out of a form
pub const EXTRACT_BUFFER_SIZE: usize = 4096;

/// In-memory text form: the ordered `CHRS` runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextForm {
    /// Payload of each `CHRS` chunk, in stream order
    pub runs: Vec<Vec<u8>>,
}

impl TextForm {
    /// A form with a single run
    pub fn from_text(text: impl Into<Vec<u8>>) -> Self {
        Self {
            runs: vec![text.into()],
        }
    }

    /// All runs joined together
    pub fn text(&self) -> Vec<u8> {
        self.runs.concat()
    }
}

impl ChunkFormat for TextForm {
    fn parse(data: &[u8]) -> IffResult<Self> {
        if !StreamHead::classify(data).is_text() {
            return Err(IffError::MalformedChunk(
                "data is not a FORM FTXT".to_string(),
            ));
        }
        let runs = find_all(data, TypeTag::FTXT, TypeTag::CHRS).collect::<IffResult<_>>()?;
        Ok(Self { runs })
    }

    fn build(&self) -> IffResult<Vec<u8>> {
        let mut writer = IffWriter::new(Vec::new());
        writer.with_container(TypeTag::FORM, TypeTag::FTXT, |w| {
            self.runs
                .iter()
                .try_for_each(|run| w.write_leaf(TypeTag::CHRS, run))
        })?;
        writer.finish()
    }
}

/// Write `text` as a `FORM FTXT` with one `CHRS` leaf.
///
/// Both sizes are declared up front so the text streams straight into
/// `sink` without being buffered.
pub fn write_text_form<W: Write>(sink: W, text: &[u8]) -> IffResult<W> {
    let text_len =
        u32::try_from(text.len()).map_err(|_| IffError::ChunkTooLarge(text.len() as u64))?;
    let form_size = 4 + CHUNK_HEADER_SIZE as u64 + padded_len(text_len);
    let form_size = u32::try_from(form_size).map_err(|_| IffError::ChunkTooLarge(form_size))?;

    let mut writer = IffWriter::new(sink);
    let form = writer.open_container(TypeTag::FORM, TypeTag::FTXT, Some(form_size))?;
    let chrs = writer.open_leaf(TypeTag::CHRS, Some(text_len))?;
    writer.write_bytes(chrs, text)?;
    writer.close(chrs)?;
    writer.close(form)?;
    writer.finish()
}

/// Stream the text of every `CHRS` run inside an `FTXT` form into `sink`.
///
/// Returns the number of text bytes written. On error, whatever was written
/// before the failure stays in `sink`.
pub fn extract_text<R: Read, W: Write>(source: R, sink: &mut W) -> IffResult<u64> {
    let mut reader = IffReader::new(source);
    let mut buf = [0u8; EXTRACT_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        match reader.next_event()? {
            IffEvent::Chunk { container, id, .. }
                if container == TypeTag::FTXT && id == TypeTag::CHRS =>
            {
                loop {
                    let n = reader.read_chunk_bytes(&mut buf)?;
                    if n == 0 {
                        break;
                    }
                    sink.write_all(&buf[..n]).map_err(IffError::WriteFailed)?;
                    total += n as u64;
                }
            }
            IffEvent::EndOfStream => break,
            _ => {}
        }
    }
    sink.flush().map_err(IffError::WriteFailed)?;
    debug!(bytes = total, "extracted text");
    Ok(total)
}
