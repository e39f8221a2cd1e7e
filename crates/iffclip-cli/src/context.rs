//! Application context shared by every command

use std::path::Path;

use iffclip_storage::{ClipboardDevice, UnitRouter};

use crate::config::ClipConfig;
use crate::converter::{Converter, FileConverter};
use crate::error::ClipResult;

/// Everything a command needs, built once at startup
#[derive(Debug)]
pub struct ClipContext {
    device: ClipboardDevice,
    router: UnitRouter,
    converter: Box<dyn Converter>,
    config: ClipConfig,
}

impl ClipContext {
    /// Open the clipboard device described by `config`.
    ///
    /// `clips_dir` overrides the directory from the configuration file.
    pub fn new(config: ClipConfig, clips_dir: Option<&Path>) -> ClipResult<Self> {
        config.validate()?;
        let device = ClipboardDevice::open(config.storage_config(clips_dir))?;
        Ok(Self {
            device,
            router: UnitRouter::new(config.router_version),
            converter: Box::new(FileConverter),
            config,
        })
    }

    /// Replace the file converter
    #[must_use]
    pub fn with_converter(mut self, converter: Box<dyn Converter>) -> Self {
        self.converter = converter;
        self
    }

    /// Clipboard device
    pub const fn device(&self) -> &ClipboardDevice {
        &self.device
    }

    /// Unit router for suggestions
    pub const fn router(&self) -> &UnitRouter {
        &self.router
    }

    /// File converter
    pub fn converter(&self) -> &dyn Converter {
        self.converter.as_ref()
    }

    /// Loaded configuration
    pub const fn config(&self) -> &ClipConfig {
        &self.config
    }
}
