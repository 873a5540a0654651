// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tool configuration
//!
//! Read from `backplate.toml` when present. Geometric tolerances are fixed
//! constants in the library and are not configurable here.

use crate::modify::RingSpec;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "backplate.toml";

/// Hole count of the target case after modification
pub const DEFAULT_EXPECTED_HOLES: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Boundary loops expected on a finished case
    pub expected_holes: usize,
    /// Maximum parallel workers for batch runs
    pub parallelism: Option<usize>,
    /// Output directory for batch results
    pub output_dir: PathBuf,
    /// Write diagnostic renders next to outputs
    pub render: bool,
    /// Verbose output
    pub verbose: bool,
    /// Ring dimensions used when no reference model is given
    pub ring: RingSpec,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            expected_holes: DEFAULT_EXPECTED_HOLES,
            parallelism: None, // Auto-detect
            output_dir: PathBuf::from("output"),
            render: false,
            verbose: false,
            ring: RingSpec::default(),
        }
    }
}

impl ToolConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: ToolConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config
            .ring
            .validate()
            .with_context(|| format!("Invalid ring in config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `path`, or `backplate.toml` if present, or defaults; then apply
    /// environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(CONFIG_FILE)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `BACKPLATE_*` overrides from `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(parallelism) = lookup("BACKPLATE_PARALLELISM") {
            self.parallelism = parallelism.parse().ok();
        }

        if let Some(verbose) = lookup("BACKPLATE_VERBOSE") {
            self.verbose = verbose.parse().unwrap_or(false);
        }

        if let Some(output_dir) = lookup("BACKPLATE_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(output_dir);
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("backplate.toml");

        let mut config = ToolConfig::default();
        config.parallelism = Some(3);
        config.render = true;
        config.save(&path)?;

        assert_eq!(ToolConfig::from_file(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "expected_holes = 3\n")?;

        let config = ToolConfig::from_file(&path)?;
        assert_eq!(config.expected_holes, 3);
        assert_eq!(config.ring, RingSpec::default());
        Ok(())
    }

    #[test]
    fn test_invalid_ring_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("bad.toml");
        std::fs::write(
            &path,
            "[ring]\nouter_radius = 10.0\ninner_radius = 12.0\ndepth = 1.0\n",
        )?;
        assert!(ToolConfig::from_file(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("BACKPLATE_PARALLELISM", "4"),
            ("BACKPLATE_VERBOSE", "true"),
            ("BACKPLATE_OUTPUT_DIR", "/tmp/out"),
        ]);
        let mut config = ToolConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.parallelism, Some(4));
        assert!(config.verbose);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }
}
