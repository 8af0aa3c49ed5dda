// src/grid/mod.rs

//! Integer-addressed views over transformed continuous fields.
//!
//! [`TransformedGrid`] pairs a [`RealField`] with a [`RealTransform`] and hands
//! out [`GridCursor`]s. Each cursor owns a private clone of the transform and
//! a private cursor into the field, taken when the cursor is created.
//! Changing the grid's transform afterward therefore only affects cursors
//! requested later; request a new cursor after modifying the transform.
//!
//! Cursors are lazy. Moving touches only the integer position; `get()`
//! applies the transform and reads the field every time it is called.

use crate::error::GridError;
use crate::field::{RealCursor, RealField};
use crate::interval::{Interval, RealInterval};
use crate::position::{Localizable, Point, Positionable};
use crate::transform::{BoundedTransform, RealTransform};
use log::{debug, trace};
use std::fmt;

/// A movable, readable position in an integer grid.
///
/// Clones are independent: moving or reading one never affects another.
pub trait GridAccess: Positionable + Clone {
    type Value;

    /// The value at the current position.
    fn get(&mut self) -> Self::Value;
}

/// An unbounded integer grid that hands out cursors.
pub trait DiscreteField {
    type Value;
    type Cursor: GridAccess<Value = Self::Value>;

    fn num_dimensions(&self) -> usize;

    /// A new cursor at the origin.
    fn cursor(&self) -> Self::Cursor;

    /// A new cursor that the caller intends to keep inside `interval`.
    ///
    /// Must yield the same values as [`DiscreteField::cursor`]; the interval
    /// is only an optimization hint.
    fn cursor_in(&self, interval: &Interval) -> Self::Cursor {
        let _ = interval;
        self.cursor()
    }
}

/// Maps a grid interval to a source-space box.
pub(crate) type BoundsEstimator<R> = fn(&R, &RealInterval) -> RealInterval;

/// How `cursor_in` treats its interval. Fixed when the grid is built.
pub(crate) enum BoundsStrategy<R> {
    Ignore,
    Estimate(BoundsEstimator<R>),
}

impl<R> fmt::Debug for BoundsStrategy<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundsStrategy::Ignore => f.write_str("Ignore"),
            BoundsStrategy::Estimate(_) => f.write_str("Estimate"),
        }
    }
}

pub(crate) fn check_dimensions<S: RealField, R: RealTransform>(
    source: &S,
    transform: &R,
) -> Result<(), GridError> {
    if transform.num_target_dimensions() != source.num_dimensions() {
        return Err(GridError::DimensionMismatch {
            transform_target: transform.num_target_dimensions(),
            source_dims: source.num_dimensions(),
        });
    }
    Ok(())
}

/// A [`RealField`] rasterized at integer positions mapped through a
/// transform.
///
/// The grid itself holds no iteration state and can be shared across
/// threads; `cursor()` only needs `&self`.
pub struct TransformedGrid<S, R> {
    source: S,
    transform: R,
    bounds: BoundsStrategy<R>,
}

impl<S, R> TransformedGrid<S, R>
where
    S: RealField,
    R: RealTransform,
{
    /// # Panics
    /// If the transform's target dimensionality differs from the source's.
    pub fn new(source: S, transform: R) -> Self {
        match Self::try_new(source, transform) {
            Ok(grid) => grid,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_new(source: S, transform: R) -> Result<Self, GridError> {
        Self::build(source, transform, BoundsStrategy::Ignore)
    }

    fn build(source: S, transform: R, bounds: BoundsStrategy<R>) -> Result<Self, GridError> {
        check_dimensions(&source, &transform)?;
        debug!(
            "TransformedGrid: {}D grid over {}D source (bounds: {:?})",
            transform.num_source_dimensions(),
            source.num_dimensions(),
            bounds
        );
        Ok(TransformedGrid {
            source,
            transform,
            bounds,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The grid's transform. Cursors hold their own copies.
    pub fn transform(&self) -> &R {
        &self.transform
    }

    /// Mutable access to the grid's transform.
    ///
    /// Existing cursors keep sampling with the transform they were created
    /// with. The transform's dimensionality must not change; debug builds
    /// assert this when the next cursor is created.
    pub fn transform_mut(&mut self) -> &mut R {
        &mut self.transform
    }

    /// Replaces the transform; same isolation rules as [`Self::transform_mut`].
    pub fn set_transform(&mut self, transform: R) -> Result<(), GridError> {
        check_dimensions(&self.source, &transform)?;
        debug!("TransformedGrid: transform replaced");
        self.transform = transform;
        Ok(())
    }

    /// Dimensionality of the grid, i.e. of the transform's input.
    pub fn num_dimensions(&self) -> usize {
        self.transform.num_source_dimensions()
    }

    /// Dimensionality of the sampled source.
    pub fn num_source_dimensions(&self) -> usize {
        self.source.num_dimensions()
    }

    /// Whether `cursor_in` passes interval estimates on to the source.
    pub fn is_bounded(&self) -> bool {
        matches!(self.bounds, BoundsStrategy::Estimate(_))
    }

    /// A new cursor at the origin, sampling with the current transform.
    pub fn cursor(&self) -> GridCursor<S::Cursor, R> {
        self.assemble(self.source.real_cursor(), None)
    }

    /// A new cursor for use inside `interval`.
    ///
    /// Grids built with [`TransformedGrid::bounded`] map the interval into
    /// source space and pass the estimate to
    /// [`RealField::real_cursor_within`]. Otherwise the interval is ignored.
    pub fn cursor_in(&self, interval: &Interval) -> GridCursor<S::Cursor, R> {
        match self.bounds {
            BoundsStrategy::Ignore => self.cursor(),
            BoundsStrategy::Estimate(estimate) => {
                let source_bounds = estimate(&self.transform, &interval.to_real());
                let source_cursor = self.source.real_cursor_within(&source_bounds);
                self.assemble(source_cursor, Some(source_bounds))
            }
        }
    }

    fn assemble(
        &self,
        source_cursor: S::Cursor,
        source_bounds: Option<RealInterval>,
    ) -> GridCursor<S::Cursor, R> {
        let n = self.transform.num_source_dimensions();
        debug_assert_eq!(
            self.transform.num_target_dimensions(),
            self.source.num_dimensions(),
            "transform was changed in place to a different target dimensionality"
        );
        trace!("GridCursor created: {}D -> {}D", n, source_cursor.num_dimensions());
        GridCursor {
            position: Point::new(n),
            transform: self.transform.clone(),
            source_cursor,
            scratch: vec![0.0; n],
            source_bounds,
        }
    }
}

impl<S, R> TransformedGrid<S, R>
where
    S: RealField,
    R: BoundedTransform,
{
    /// Like [`TransformedGrid::new`], but `cursor_in` forwards the
    /// transform's bounds estimate to the source.
    ///
    /// # Panics
    /// If the transform's target dimensionality differs from the source's.
    pub fn bounded(source: S, transform: R) -> Self {
        match Self::try_bounded(source, transform) {
            Ok(grid) => grid,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_bounded(source: S, transform: R) -> Result<Self, GridError> {
        Self::build(source, transform, BoundsStrategy::Estimate(R::estimate_bounds))
    }
}

impl<S: fmt::Debug, R: fmt::Debug> fmt::Debug for TransformedGrid<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformedGrid")
            .field("source", &self.source)
            .field("transform", &self.transform)
            .field("bounds", &self.bounds)
            .finish()
    }
}

impl<S, R> DiscreteField for TransformedGrid<S, R>
where
    S: RealField,
    R: RealTransform,
{
    type Value = S::Value;
    type Cursor = GridCursor<S::Cursor, R>;

    fn num_dimensions(&self) -> usize {
        TransformedGrid::num_dimensions(self)
    }

    fn cursor(&self) -> Self::Cursor {
        TransformedGrid::cursor(self)
    }

    fn cursor_in(&self, interval: &Interval) -> Self::Cursor {
        TransformedGrid::cursor_in(self, interval)
    }
}

/// A cursor into a [`TransformedGrid`].
///
/// Owns its integer position, a private copy of the transform, and a private
/// cursor into the source. Nothing is shared with the grid or with other
/// cursors, so a cursor can be moved to another thread, but must not be used
/// from two threads at once.
#[derive(Clone)]
pub struct GridCursor<C, R> {
    position: Point,
    transform: R,
    source_cursor: C,
    scratch: Vec<f64>,
    source_bounds: Option<RealInterval>,
}

impl<C, R> GridCursor<C, R>
where
    C: RealCursor,
    R: RealTransform,
{
    /// Maps the current position through the transform and reads the source.
    ///
    /// Always recomputed, even if the cursor has not moved since the last
    /// call.
    pub fn get(&mut self) -> C::Value {
        self.position.localize_real(&mut self.scratch);
        self.transform
            .apply(&self.scratch, self.source_cursor.position_mut());
        self.source_cursor.get()
    }

    /// An independent duplicate: same position, its own transform copy and
    /// its own source cursor.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// This cursor's private transform.
    pub fn transform(&self) -> &R {
        &self.transform
    }

    /// Source-space box estimated when the cursor was created for an
    /// interval, if the grid was built with bounds estimation.
    pub fn source_bounds(&self) -> Option<&RealInterval> {
        self.source_bounds.as_ref()
    }

    /// The continuous position written by the most recent `get()`.
    pub fn source_position(&self) -> &[f64] {
        self.source_cursor.position()
    }
}

impl<C, R> Localizable for GridCursor<C, R> {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.position.num_dimensions()
    }

    #[inline]
    fn get_long_position(&self, d: usize) -> i64 {
        self.position.get_long_position(d)
    }

    fn localize(&self, position: &mut [i64]) {
        self.position.localize(position)
    }
}

impl<C, R> Positionable for GridCursor<C, R> {
    #[inline]
    fn fwd(&mut self, d: usize) {
        self.position.fwd(d)
    }

    #[inline]
    fn bck(&mut self, d: usize) {
        self.position.bck(d)
    }

    #[inline]
    fn move_by(&mut self, distance: i64, d: usize) {
        self.position.move_by(distance, d)
    }

    fn move_by_all(&mut self, distance: &[i64]) {
        self.position.move_by_all(distance)
    }

    fn set_position(&mut self, position: &[i64]) {
        self.position.set_position(position)
    }

    #[inline]
    fn set_position_at(&mut self, position: i64, d: usize) {
        self.position.set_position_at(position, d)
    }
}

impl<C, R> GridAccess for GridCursor<C, R>
where
    C: RealCursor,
    R: RealTransform,
{
    type Value = C::Value;

    fn get(&mut self) -> C::Value {
        GridCursor::get(self)
    }
}

impl<C: RealCursor, R> fmt::Debug for GridCursor<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridCursor")
            .field("position", &self.position.as_slice())
            .field("source_position", &self.source_cursor.position())
            .field("source_bounds", &self.source_bounds)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
