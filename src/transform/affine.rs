// src/transform/affine.rs

use super::{BoundedTransform, RealTransform};
use crate::interval::RealInterval;

/// A general affine map from N to M dimensions.
///
/// Stored as an `M x (N + 1)` row-major matrix; the last column is the
/// translation:
///
/// ```text
/// [ a00 a01 .. a0n | t0 ]
/// [ a10 a11 .. a1n | t1 ]
/// [  :   :      :  |  : ]
/// ```
///
/// Mutating methods change this instance only. Views hand every cursor its
/// own copy, so a mutation is picked up by cursors created afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineTransform {
    source_dims: usize,
    target_dims: usize,
    m: Vec<f64>,
}

impl AffineTransform {
    /// The identity map in `n` dimensions.
    pub fn identity(n: usize) -> Self {
        let mut m = vec![0.0; n * (n + 1)];
        for d in 0..n {
            m[d * (n + 1) + d] = 1.0;
        }
        AffineTransform {
            source_dims: n,
            target_dims: n,
            m,
        }
    }

    /// A pure translation by `offset`.
    pub fn translation(offset: &[f64]) -> Self {
        let n = offset.len();
        let mut affine = AffineTransform::identity(n);
        for (d, o) in offset.iter().enumerate() {
            affine.set(d, n, *o);
        }
        affine
    }

    /// Builds a transform from `M` rows of `N + 1` entries each.
    ///
    /// # Panics
    /// If `rows` is empty or the rows are of unequal or zero length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        assert!(!rows.is_empty(), "affine transform needs at least one row");
        let width = rows[0].len();
        assert!(width >= 1, "affine rows need at least the translation column");
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(
                row.len(),
                width,
                "affine row {i} has {} entries, expected {width}",
                row.len()
            );
        }
        AffineTransform {
            source_dims: width - 1,
            target_dims: rows.len(),
            m: rows.iter().flatten().copied().collect(),
        }
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.target_dims && col <= self.source_dims,
            "affine entry ({row}, {col}) is outside the {}x{} matrix",
            self.target_dims,
            self.source_dims + 1
        );
        row * (self.source_dims + 1) + col
    }

    /// Entry at `(row, col)`; `col == N` addresses the translation column.
    ///
    /// # Panics
    /// If `row >= M` or `col > N`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[self.index(row, col)]
    }

    /// Overwrites the entry at `(row, col)` in place.
    ///
    /// # Panics
    /// If `row >= M` or `col > N`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let i = self.index(row, col);
        self.m[i] = value;
    }

    /// Overwrites a whole row in place.
    ///
    /// # Panics
    /// If `values` does not have `N + 1` entries or `row >= M`.
    pub fn set_row(&mut self, row: usize, values: &[f64]) {
        let width = self.source_dims + 1;
        assert_eq!(values.len(), width, "affine row needs {width} entries");
        assert!(row < self.target_dims, "affine row {row} is outside the {} rows", self.target_dims);
        let start = row * width;
        self.m[start..start + width].copy_from_slice(values);
    }
}

impl RealTransform for AffineTransform {
    fn num_source_dimensions(&self) -> usize {
        self.source_dims
    }

    fn num_target_dimensions(&self) -> usize {
        self.target_dims
    }

    fn apply(&self, source: &[f64], target: &mut [f64]) {
        let width = self.source_dims + 1;
        for (row, t) in self.m.chunks_exact(width).zip(target.iter_mut()) {
            let (linear, translation) = row.split_at(self.source_dims);
            *t = linear
                .iter()
                .zip(source)
                .fold(translation[0], |acc, (a, s)| acc + a * s);
        }
    }
}

impl BoundedTransform for AffineTransform {
    /// Exact bounding box: the image of the box center, widened per row by
    /// `sum |a_ij| * half_extent_j`.
    fn estimate_bounds(&self, interval: &RealInterval) -> RealInterval {
        let center: Vec<f64> = interval
            .real_min()
            .iter()
            .zip(interval.real_max())
            .map(|(lo, hi)| 0.5 * (lo + hi))
            .collect();
        let half: Vec<f64> = interval
            .real_min()
            .iter()
            .zip(interval.real_max())
            .map(|(lo, hi)| 0.5 * (hi - lo))
            .collect();

        let mut mapped = vec![0.0; self.target_dims];
        self.apply(&center, &mut mapped);

        let width = self.source_dims + 1;
        let mut min = Vec::with_capacity(self.target_dims);
        let mut max = Vec::with_capacity(self.target_dims);
        for (row, c) in self.m.chunks_exact(width).zip(&mapped) {
            let radius: f64 = row[..self.source_dims]
                .iter()
                .zip(&half)
                .map(|(a, h)| a.abs() * h)
                .sum();
            min.push(c - radius);
            max.push(c + radius);
        }
        RealInterval::widened(&min, &max)
    }
}
