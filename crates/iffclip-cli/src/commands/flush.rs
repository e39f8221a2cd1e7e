//! `flush`: empty a clipboard unit

use iffclip_storage::Unit;
use tracing::info;

use crate::context::ClipContext;
use crate::error::ClipResult;

/// Replace the content of `unit` with nothing
pub fn handle(ctx: &ClipContext, unit: Unit) -> ClipResult<()> {
    let mut session = ctx.device().open_write(unit)?;
    session.commit()?;
    info!(%unit, "flushed unit");
    Ok(())
}
