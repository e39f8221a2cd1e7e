//! Clipboard tool library
//!
//! Everything behind the `iffclip` binary: configuration, the application
//! context, file conversion, unit inspection and one handler per command.

pub mod commands;
pub mod config;
pub mod context;
pub mod converter;
pub mod error;
pub mod listing;
pub mod peek;

pub use crate::config::ClipConfig;
pub use crate::context::ClipContext;
pub use crate::error::{ClipError, ClipResult, ErrorKind};

use clap::Subcommand;
use std::path::PathBuf;

/// Subcommands of the `iffclip` binary
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Copy a text or IFF file to a clipboard unit
    Copy {
        /// File to copy
        file: PathBuf,

        /// Clipboard unit (0-255)
        #[arg(short, long, default_value_t = 0)]
        unit: u8,
    },

    /// Paste a clipboard unit to a file, or to stdout with `-`
    Paste {
        /// Destination file, `-` for standard output
        file: PathBuf,

        /// Clipboard unit (0-255)
        #[arg(short, long, default_value_t = 0)]
        unit: u8,

        /// Replace an existing destination file
        #[arg(short, long)]
        force: bool,
    },

    /// List every clipboard unit holding content
    List,

    /// Empty a clipboard unit
    Flush {
        /// Clipboard unit (0-255)
        #[arg(short, long, default_value_t = 0)]
        unit: u8,
    },

    /// Copy a file to a unit and paste it back out to another file
    Convert {
        /// File to copy
        input: PathBuf,

        /// Destination file, `-` for standard output
        output: PathBuf,

        /// Clipboard unit (0-255)
        #[arg(short, long, default_value_t = 0)]
        unit: u8,

        /// Replace an existing destination file
        #[arg(short, long)]
        force: bool,
    },
}
