use std::path::Path;

use anyhow::{Context, Result};
use calvr_config::ConfigTree;

use crate::device::GpuInit;
use crate::logging::LoggingConfig;
use crate::screen::ScreenInfo;
use crate::window::RuntimeConfig;
use crate::zones::{StereoSettings, ZonesSettings};

/// Everything the kernel reads at init.
#[derive(Debug, Clone)]
pub struct KernelConfig {
    pub logging: LoggingConfig,
    pub screen: ScreenInfo,
    pub zones: ZonesSettings,
    pub stereo: StereoSettings,
    pub gpu: GpuInit,
    pub window: RuntimeConfig,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::from_tree(&ConfigTree::default())
    }
}

impl KernelConfig {
    /// Reads and parses a `.cvrc` file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_tree(&Self::read_tree(path)?))
    }

    pub fn load_str(src: &str) -> Result<Self> {
        Ok(Self::from_tree(&Self::parse_tree(src)?))
    }

    /// Raw tree of a `.cvrc` file, for callers that need to set up logging
    /// before the settings are read.
    pub fn read_tree(path: impl AsRef<Path>) -> Result<ConfigTree> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse_tree(&src).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse_tree(src: &str) -> Result<ConfigTree> {
        calvr_config::parse_str(src).context("failed to parse configuration")
    }

    /// Missing or malformed keys keep their defaults.
    pub fn from_tree(tree: &ConfigTree) -> Self {
        Self {
            logging: LoggingConfig::from_config(tree),
            screen: ScreenInfo::from_config(tree),
            zones: ZonesSettings::from_config(tree),
            stereo: StereoSettings::from_config(tree),
            gpu: GpuInit::from_config(tree),
            window: RuntimeConfig::from_config(tree),
        }
    }
}
