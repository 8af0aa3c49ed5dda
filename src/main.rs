// src/main.rs

//! Renders the configured demo scene as ASCII: a ring pattern sampled
//! through a scale-then-translate warp.

use anyhow::Context;
use log::info;
use std::path::Path;
use warpgrid::config::{Config, CONFIG};
use warpgrid::{rasterize_parallel, AffineTransform, FnField, Interval, RenderOptions, TransformedGrid};

const SHADES: &[u8] = b" .:-=+*#%@";

/// Main entry point for the `warpgrid` demo.
fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    // An explicit path on the command line wins over WARPGRID_CONFIG.
    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::load(Path::new(&path)).context("Failed to load configuration")?,
        None => (*CONFIG).clone(),
    };
    config.validate()?;
    let demo = &config.demo;
    info!("Demo scene: {}x{}, scale {}, offset {:?}", demo.width, demo.height, demo.scale, demo.offset);

    // Rows are about twice as tall as columns in a terminal.
    let transform = AffineTransform::from_rows(&[
        vec![demo.scale, 0.0, demo.offset[0]],
        vec![0.0, 2.0 * demo.scale, demo.offset[1]],
    ]);
    let rings = FnField::new(2, |p: &[f64]| {
        let r = (p[0] * p[0] + p[1] * p[1]).sqrt();
        0.5 + 0.5 * (6.0 * r).cos()
    });
    let grid = TransformedGrid::bounded(rings, transform);

    let interval = Interval::from_dimensions(&[u64::from(demo.width), u64::from(demo.height)]);
    let options = RenderOptions::from(&config.raster);
    let values = rasterize_parallel(&grid, &interval, options);
    info!("Rasterized {} samples with {} thread(s)", values.len(), options.num_threads);

    for row in values.chunks(demo.width as usize) {
        let line: String = row
            .iter()
            .map(|&v| {
                let i = (v.clamp(0.0, 1.0) * (SHADES.len() - 1) as f64).round() as usize;
                SHADES[i] as char
            })
            .collect();
        println!("{line}");
    }

    Ok(())
}
