//! `list`: show which units hold content

use std::io::Write;

use crate::context::ClipContext;
use crate::error::ClipResult;
use crate::listing::{inspect_all, render};

/// Print one row per unit with content
pub fn handle(ctx: &ClipContext, out: &mut dyn Write) -> ClipResult<()> {
    let summaries = inspect_all(ctx);
    render(&summaries, ctx.router().version(), out)?;
    Ok(())
}
