// src/config.rs

//! Configuration for rasterization and the demo binary.
//!
//! Deserialized from JSON. Every section carries `#[serde(default)]`, so a
//! config file only needs the keys it wants to change. The process-wide
//! [`CONFIG`] is loaded once, from the path in `WARPGRID_CONFIG` if that is
//! set, and falls back to defaults otherwise.

use anyhow::{ensure, Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the JSON config file.
pub const CONFIG_ENV_VAR: &str = "WARPGRID_CONFIG";

/// Global configuration, loaded on first use.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

/// Root of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Rasterization settings.
    pub raster: RasterConfig,
    /// Scene rendered by the `warpgrid` binary.
    pub demo: DemoConfig,
}

/// Defines how rasterization splits work across threads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RasterConfig {
    /// Worker threads for parallel rasterization. 1 disables threading.
    pub num_threads: usize,
    /// Minimum slabs along the last dimension per worker.
    pub min_slabs_per_thread: usize,
}

impl Default for RasterConfig {
    fn default() -> Self {
        RasterConfig {
            num_threads: 1,
            min_slabs_per_thread: 1,
        }
    }
}

/// The demo scene: a 2D grid sampled through a scale-then-translate warp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Grid columns.
    pub width: u32,
    /// Grid rows.
    pub height: u32,
    /// Translation applied after scaling, in source units.
    pub offset: [f64; 2],
    /// Uniform scale from grid to source units.
    pub scale: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            width: 64,
            height: 24,
            offset: [-2.0, -1.2],
            scale: 1.0 / 16.0,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json).context("Failed to parse configuration JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the demo cannot render.
    pub fn validate(&self) -> Result<()> {
        let demo = &self.demo;
        ensure!(
            demo.width > 0 && demo.height > 0,
            "demo scene must be at least 1x1, got {}x{}",
            demo.width,
            demo.height
        );
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Loads from `WARPGRID_CONFIG` if set; logs and uses defaults on any
    /// failure.
    pub fn load_or_default() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            info!("{} not set, using default configuration", CONFIG_ENV_VAR);
            return Config::default();
        };
        match Config::load(Path::new(&path)) {
            Ok(config) => {
                info!("Configuration loaded from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                warn!("{:#}; using default configuration", e);
                Config::default()
            }
        }
    }
}
