//! Command handlers

pub mod convert;
pub mod copy;
pub mod flush;
pub mod list;
pub mod paste;

use std::io;

use iffclip_storage::Unit;

use crate::Commands;
use crate::context::ClipContext;
use crate::error::ClipResult;
use paste::Destination;

/// Run one command against `ctx`
pub fn dispatch(ctx: &ClipContext, command: &Commands) -> ClipResult<()> {
    match command {
        Commands::Copy { file, unit } => copy::handle(ctx, file, Unit::new(*unit)),
        Commands::Paste { file, unit, force } => {
            paste::handle(ctx, &Destination::from_arg(file), Unit::new(*unit), *force)
        }
        Commands::List => list::handle(ctx, &mut io::stdout().lock()),
        Commands::Flush { unit } => flush::handle(ctx, Unit::new(*unit)),
        Commands::Convert {
            input,
            output,
            unit,
            force,
        } => convert::handle(
            ctx,
            input,
            &Destination::from_arg(output),
            Unit::new(*unit),
            *force,
        ),
    }
}
