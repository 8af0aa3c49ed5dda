// src/raster.rs

//! Rasterization of a [`DiscreteField`] over a finite [`Interval`].
//!
//! Output is in flat order, first dimension fastest. The parallel variants
//! split the last dimension into stripes and give every worker its own
//! cursor, requested from the shared grid inside the worker thread. Cursors
//! are never shared between threads.

use crate::config::RasterConfig;
use crate::grid::{DiscreteField, GridAccess};
use crate::interval::Interval;
use crate::position::{Localizable, Positionable};
use log::debug;

/// Parallel rasterization options.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Number of threads to use for rasterization.
    pub num_threads: usize,
    /// Minimum number of slabs (positions along the last dimension) a worker
    /// must get before another thread is worth spawning.
    pub min_slabs_per_thread: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&crate::config::CONFIG.raster)
    }
}

impl From<&RasterConfig> for RenderOptions {
    fn from(config: &RasterConfig) -> Self {
        RenderOptions {
            num_threads: config.num_threads,
            min_slabs_per_thread: config.min_slabs_per_thread,
        }
    }
}

impl RenderOptions {
    pub fn with_threads(num_threads: usize) -> Self {
        RenderOptions {
            num_threads,
            min_slabs_per_thread: 1,
        }
    }
}

fn check_shape<G: DiscreteField>(grid: &G, interval: &Interval, len: usize) {
    assert_eq!(
        grid.num_dimensions(),
        interval.num_dimensions(),
        "grid is {}-dimensional but the interval is {}-dimensional",
        grid.num_dimensions(),
        interval.num_dimensions()
    );
    assert_eq!(
        len,
        interval.size(),
        "buffer holds {} values but the interval has {} positions",
        len,
        interval.size()
    );
}

/// Visits every position of `interval` with `cursor`, handing the flat index
/// and value to `sink`.
fn walk<A, F>(cursor: &mut A, interval: &Interval, mut sink: F)
where
    A: GridAccess,
    F: FnMut(usize, A::Value),
{
    let (min, max) = (interval.min(), interval.max());
    cursor.set_position(min);
    for i in 0..interval.size() {
        sink(i, cursor.get());
        for d in 0..min.len() {
            if cursor.get_long_position(d) < max[d] {
                cursor.fwd(d);
                break;
            }
            cursor.set_position_at(min[d], d);
        }
    }
}

/// Samples `grid` at every position of `interval` into `buffer`.
///
/// # Panics
/// If the buffer length is not `interval.size()` or the dimensionalities
/// of grid and interval differ.
pub fn rasterize_into<G: DiscreteField>(grid: &G, interval: &Interval, buffer: &mut [G::Value]) {
    check_shape(grid, interval, buffer.len());
    let mut cursor = grid.cursor_in(interval);
    walk(&mut cursor, interval, |i, v| buffer[i] = v);
}

/// Samples `grid` at every position of `interval`.
pub fn rasterize<G: DiscreteField>(grid: &G, interval: &Interval) -> Vec<G::Value> {
    check_shape(grid, interval, interval.size());
    debug!("rasterize: {} positions", interval.size());
    let mut out = Vec::with_capacity(interval.size());
    let mut cursor = grid.cursor_in(interval);
    walk(&mut cursor, interval, |_, v| out.push(v));
    out
}

/// Parallel [`rasterize_into`]. Falls back to a single thread when the
/// options or the interval's extent along the last dimension leave nothing
/// to split.
pub fn rasterize_parallel_into<G>(
    grid: &G,
    interval: &Interval,
    buffer: &mut [G::Value],
    options: RenderOptions,
) where
    G: DiscreteField + Sync,
    G::Value: Send,
{
    check_shape(grid, interval, buffer.len());

    let n = interval.num_dimensions();
    if n == 0 {
        rasterize_into(grid, interval, buffer);
        return;
    }
    let last = n - 1;
    let slabs = interval.dimension(last) as usize;
    let num_threads = options
        .num_threads
        .min(slabs / options.min_slabs_per_thread.max(1))
        .max(1);
    if num_threads <= 1 {
        rasterize_into(grid, interval, buffer);
        return;
    }
    debug!(
        "rasterize_parallel: {} positions, {} slabs across {} threads",
        interval.size(),
        slabs,
        num_threads
    );

    // Partitioning
    let slab_len = interval.size() / slabs;
    let slabs_per_thread = slabs / num_threads;
    let remainder = slabs % num_threads;

    let mut stripes = Vec::with_capacity(num_threads);
    let mut remaining = buffer;
    let mut start = 0;

    for i in 0..num_threads {
        let extra = if i < remainder { 1 } else { 0 };
        let count = slabs_per_thread + extra;
        let (chunk, rest) = remaining.split_at_mut(count * slab_len);
        let lo = interval.min()[last] + start as i64;
        let hi = lo + count as i64 - 1;
        stripes.push((chunk, interval.with_range(last, lo, hi)));
        remaining = rest;
        start += count;
    }

    // Each worker asks the shared grid for its own cursor.
    std::thread::scope(|s| {
        for (chunk, stripe) in stripes {
            s.spawn(move || {
                let mut cursor = grid.cursor_in(&stripe);
                walk(&mut cursor, &stripe, |i, v| chunk[i] = v);
            });
        }
    });
}

/// Parallel [`rasterize`].
pub fn rasterize_parallel<G>(grid: &G, interval: &Interval, options: RenderOptions) -> Vec<G::Value>
where
    G: DiscreteField + Sync,
    G::Value: Send + Default + Clone,
{
    let mut out = vec![<G::Value as Default>::default(); interval.size()];
    rasterize_parallel_into(grid, interval, &mut out, options);
    out
}
