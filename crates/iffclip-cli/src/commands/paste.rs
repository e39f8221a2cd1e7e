//! `paste`: write a clipboard unit out to a file or stdout

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use iffclip_formats::ftxt::extract_text;
use iffclip_formats::iff::StreamHead;
use iffclip_storage::Unit;
use tracing::{debug, info};

use crate::context::ClipContext;
use crate::error::{ClipError, ClipResult};
use crate::peek::Peeked;

/// Where pasted content goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Standard output
    Stdout,
    /// A file, created by the paste
    File(PathBuf),
}

impl Destination {
    /// `-` means standard output, anything else a file path
    pub fn from_arg(arg: &Path) -> Self {
        if arg.as_os_str() == "-" {
            Self::Stdout
        } else {
            Self::File(arg.to_path_buf())
        }
    }

    /// Fail early if a file destination exists and may not be replaced
    fn check_free(&self, force: bool) -> ClipResult<()> {
        match self {
            Self::File(path) if !force && path.exists() => {
                Err(ClipError::AlreadyExists(path.clone()))
            }
            _ => Ok(()),
        }
    }

    fn create(&self, force: bool) -> ClipResult<Box<dyn Write>> {
        match self {
            Self::Stdout => Ok(Box::new(io::stdout().lock())),
            Self::File(path) => {
                let mut options = OpenOptions::new();
                options.write(true);
                if force {
                    options.create(true).truncate(true);
                } else {
                    options.create_new(true);
                }
                let file: File = options.open(path).map_err(|source| {
                    if source.kind() == ErrorKind::AlreadyExists {
                        ClipError::AlreadyExists(path.clone())
                    } else {
                        ClipError::WriteFile {
                            path: path.clone(),
                            source,
                        }
                    }
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

/// Paste `unit` to `dest`.
///
/// `FORM FTXT` content is written as plain text; other IFF groups go through
/// the converter. Nothing is created when the unit is empty or unreadable.
pub fn handle(ctx: &ClipContext, dest: &Destination, unit: Unit, force: bool) -> ClipResult<()> {
    dest.check_free(force)?;

    let mut session = ctx.device().open_read(unit)?;
    let peeked = Peeked::read_from(&mut session)?;
    if peeked.is_empty() {
        return Err(ClipError::UnsupportedContent(format!(
            "clipboard unit {unit} is empty"
        )));
    }

    let head = peeked.head();
    debug!(%unit, ?head, "pasting unit");
    let bytes = match head {
        StreamHead::Group(_) if head.is_text() => {
            let mut out = dest.create(force)?;
            extract_text(peeked.replay(&mut session), &mut out)?
        }
        StreamHead::Group(_) => {
            let mut out = dest.create(force)?;
            ctx.converter()
                .save(&mut peeked.replay(&mut session), out.as_mut())?
        }
        StreamHead::Chunk(_) | StreamHead::Unrecognized => {
            return Err(ClipError::UnsupportedContent(format!(
                "clipboard unit {unit} does not hold IFF data"
            )));
        }
    };

    session.close()?;
    info!(%unit, bytes, "pasted unit");
    Ok(())
}
