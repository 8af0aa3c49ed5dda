// src/transform/mod.rs

//! The transform capability consumed by grid and field views.
//!
//! A transform maps an N-dimensional position into an M-dimensional
//! continuous position. Views never share a transform with their cursors:
//! every cursor holds its own `clone()`, so a transform's `Clone` must be deep
//! enough that mutating the original leaves the clone's behavior untouched.
//! Owned data satisfies this trivially; shared read-only data (`Arc<[f64]>`
//! tables, closures) is fine as long as mutation goes through copy-on-write.

pub mod affine;

pub use affine::AffineTransform;

use crate::interval::RealInterval;
use std::fmt;
use std::sync::Arc;

/// Maps source-space positions to target-space positions.
pub trait RealTransform: Clone {
    /// Dimensionality N of the positions this transform accepts.
    fn num_source_dimensions(&self) -> usize;

    /// Dimensionality M of the positions this transform produces.
    fn num_target_dimensions(&self) -> usize;

    /// Writes the image of `source` into `target`.
    ///
    /// `source` has N components and `target` has M components; callers
    /// guarantee both lengths.
    fn apply(&self, source: &[f64], target: &mut [f64]);
}

/// A transform that can bound the image of a box.
///
/// Views built with this capability use the estimate to hand sources a
/// region hint when a cursor is requested for a known interval.
pub trait BoundedTransform: RealTransform {
    /// An axis-aligned box containing the image of `interval`.
    fn estimate_bounds(&self, interval: &RealInterval) -> RealInterval;
}

/// The identity map in `n` dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    n: usize,
}

impl Identity {
    pub fn new(n: usize) -> Self {
        Identity { n }
    }
}

impl RealTransform for Identity {
    fn num_source_dimensions(&self) -> usize {
        self.n
    }

    fn num_target_dimensions(&self) -> usize {
        self.n
    }

    #[inline]
    fn apply(&self, source: &[f64], target: &mut [f64]) {
        target[..self.n].copy_from_slice(&source[..self.n]);
    }
}

impl BoundedTransform for Identity {
    fn estimate_bounds(&self, interval: &RealInterval) -> RealInterval {
        interval.clone()
    }
}

/// Adds a fixed offset: `target = source + offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    offset: Vec<f64>,
}

impl Translation {
    pub fn new(offset: &[f64]) -> Self {
        Translation {
            offset: offset.to_vec(),
        }
    }

    pub fn offset(&self) -> &[f64] {
        &self.offset
    }

    /// Replaces the offset along dimension `d`.
    pub fn set_offset(&mut self, d: usize, value: f64) {
        self.offset[d] = value;
    }
}

impl RealTransform for Translation {
    fn num_source_dimensions(&self) -> usize {
        self.offset.len()
    }

    fn num_target_dimensions(&self) -> usize {
        self.offset.len()
    }

    #[inline]
    fn apply(&self, source: &[f64], target: &mut [f64]) {
        for ((t, s), o) in target.iter_mut().zip(source).zip(&self.offset) {
            *t = s + o;
        }
    }
}

impl BoundedTransform for Translation {
    fn estimate_bounds(&self, interval: &RealInterval) -> RealInterval {
        let shift = |v: &[f64]| -> Vec<f64> {
            v.iter().zip(&self.offset).map(|(a, o)| a + o).collect()
        };
        RealInterval::widened(&shift(interval.real_min()), &shift(interval.real_max()))
    }
}

/// Per-axis scaling: `target[d] = source[d] * factors[d]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    factors: Vec<f64>,
}

impl Scale {
    pub fn new(factors: &[f64]) -> Self {
        Scale {
            factors: factors.to_vec(),
        }
    }

    pub fn uniform(n: usize, factor: f64) -> Self {
        Scale {
            factors: vec![factor; n],
        }
    }

    pub fn factors(&self) -> &[f64] {
        &self.factors
    }

    pub fn set_factor(&mut self, d: usize, value: f64) {
        self.factors[d] = value;
    }
}

impl RealTransform for Scale {
    fn num_source_dimensions(&self) -> usize {
        self.factors.len()
    }

    fn num_target_dimensions(&self) -> usize {
        self.factors.len()
    }

    #[inline]
    fn apply(&self, source: &[f64], target: &mut [f64]) {
        for ((t, s), f) in target.iter_mut().zip(source).zip(&self.factors) {
            *t = s * f;
        }
    }
}

impl BoundedTransform for Scale {
    fn estimate_bounds(&self, interval: &RealInterval) -> RealInterval {
        // Negative factors swap the ends.
        let (min, max): (Vec<f64>, Vec<f64>) = self
            .factors
            .iter()
            .enumerate()
            .map(|(d, f)| {
                let a = interval.real_min()[d] * f;
                let b = interval.real_max()[d] * f;
                if a.is_nan() || b.is_nan() {
                    (f64::NAN, f64::NAN)
                } else {
                    (a.min(b), a.max(b))
                }
            })
            .unzip();
        RealInterval::widened(&min, &max)
    }
}

/// Wraps a closure as a transform, for warps with no closed form.
///
/// The closure is shared between clones; it must not carry interior
/// mutability that would make clones observe each other.
pub struct FnTransform<F> {
    func: Arc<F>,
    source_dims: usize,
    target_dims: usize,
}

impl<F> FnTransform<F>
where
    F: Fn(&[f64], &mut [f64]),
{
    pub fn new(source_dims: usize, target_dims: usize, func: F) -> Self {
        FnTransform {
            func: Arc::new(func),
            source_dims,
            target_dims,
        }
    }
}

// Manual impl: `F` itself need not be `Clone`.
impl<F> Clone for FnTransform<F> {
    fn clone(&self) -> Self {
        FnTransform {
            func: Arc::clone(&self.func),
            source_dims: self.source_dims,
            target_dims: self.target_dims,
        }
    }
}

impl<F> fmt::Debug for FnTransform<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransform")
            .field("source_dims", &self.source_dims)
            .field("target_dims", &self.target_dims)
            .finish_non_exhaustive()
    }
}

impl<F> RealTransform for FnTransform<F>
where
    F: Fn(&[f64], &mut [f64]),
{
    fn num_source_dimensions(&self) -> usize {
        self.source_dims
    }

    fn num_target_dimensions(&self) -> usize {
        self.target_dims
    }

    #[inline]
    fn apply(&self, source: &[f64], target: &mut [f64]) {
        (self.func)(source, target)
    }
}
