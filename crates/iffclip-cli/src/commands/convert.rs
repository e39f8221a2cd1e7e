//! `convert`: copy a file to a unit and paste it straight back out

use std::path::Path;

use iffclip_storage::Unit;
use tracing::warn;

use super::paste::Destination;
use super::{copy, paste};
use crate::context::ClipContext;
use crate::error::ClipResult;

/// Copy `input` to `unit`, then paste `unit` to `output`.
///
/// The paste runs even when the copy failed; the first error is returned.
pub fn handle(
    ctx: &ClipContext,
    input: &Path,
    output: &Destination,
    unit: Unit,
    force: bool,
) -> ClipResult<()> {
    let copied = copy::handle(ctx, input, unit);
    if let Err(e) = &copied {
        warn!(%unit, error = %e, "copy failed, pasting current unit content");
    }
    let pasted = paste::handle(ctx, output, unit, force);
    copied.and(pasted)
}
