//! `copy`: put a file on a clipboard unit

use std::fs;
use std::path::Path;

use iffclip_formats::ftxt::write_text_form;
use iffclip_storage::Unit;
use tracing::{debug, info};

use crate::context::ClipContext;
use crate::converter::SourceKind;
use crate::error::{ClipError, ClipResult};

/// Copy `file` to `unit`, as `FORM FTXT` for text or verbatim for IFF files
pub fn handle(ctx: &ClipContext, file: &Path, unit: Unit) -> ClipResult<()> {
    let kind = ctx.converter().detect(file)?;
    debug!(file = %file.display(), ?kind, "detected source");
    match kind {
        SourceKind::Text => copy_text(ctx, file, unit),
        SourceKind::Interchange => copy_interchange(ctx, file, unit),
        SourceKind::Unsupported => Err(ClipError::UnsupportedContent(format!(
            "{} is neither text nor an IFF file",
            file.display()
        ))),
    }
}

fn copy_text(ctx: &ClipContext, file: &Path, unit: Unit) -> ClipResult<()> {
    let text = fs::read(file).map_err(|source| ClipError::ReadFile {
        path: file.to_path_buf(),
        source,
    })?;
    if text.is_empty() {
        return Err(ClipError::UnsupportedContent(
            "no text data to copy".to_string(),
        ));
    }

    let mut session = ctx.device().open_write(unit)?;
    write_text_form(&mut session, &text)?;
    session.commit()?;
    info!(%unit, bytes = text.len(), "copied text");
    Ok(())
}

fn copy_interchange(ctx: &ClipContext, file: &Path, unit: Unit) -> ClipResult<()> {
    let mut session = ctx.device().open_write(unit)?;
    let bytes = ctx.converter().to_interchange(file, &mut session)?;
    session.commit()?;
    info!(%unit, bytes, "copied interchange file");
    Ok(())
}
