// src/real_view.rs

//! The continuous counterpart of [`TransformedGrid`](crate::grid::TransformedGrid).
//!
//! [`TransformedField`] samples a source at transformed real positions. It is
//! itself a [`RealField`], so views stack: a `TransformedField` can be the
//! source of another `TransformedField` or of a grid, and every layer keeps
//! its own transform copy per cursor.

use crate::error::GridError;
use crate::field::{RealCursor, RealField};
use crate::grid::{check_dimensions, BoundsStrategy};
use crate::interval::RealInterval;
use crate::transform::{BoundedTransform, RealTransform};
use log::{debug, trace};

/// A [`RealField`] viewed through a transform.
pub struct TransformedField<S, R> {
    source: S,
    transform: R,
    bounds: BoundsStrategy<R>,
}

impl<S, R> TransformedField<S, R>
where
    S: RealField,
    R: RealTransform,
{
    /// # Panics
    /// If the transform's target dimensionality differs from the source's.
    pub fn new(source: S, transform: R) -> Self {
        match Self::try_new(source, transform) {
            Ok(field) => field,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_new(source: S, transform: R) -> Result<Self, GridError> {
        check_dimensions(&source, &transform)?;
        debug!(
            "TransformedField: {}D view over {}D source",
            transform.num_source_dimensions(),
            source.num_dimensions()
        );
        Ok(TransformedField {
            source,
            transform,
            bounds: BoundsStrategy::Ignore,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn transform(&self) -> &R {
        &self.transform
    }

    /// Existing cursors are unaffected by changes made through this.
    pub fn transform_mut(&mut self) -> &mut R {
        &mut self.transform
    }

    pub fn set_transform(&mut self, transform: R) -> Result<(), GridError> {
        check_dimensions(&self.source, &transform)?;
        self.transform = transform;
        Ok(())
    }

    fn assemble(&self, source_cursor: S::Cursor) -> TransformedFieldCursor<S::Cursor, R> {
        let n = self.transform.num_source_dimensions();
        debug_assert_eq!(
            self.transform.num_target_dimensions(),
            self.source.num_dimensions(),
            "transform was changed in place to a different target dimensionality"
        );
        trace!("TransformedFieldCursor created: {}D -> {}D", n, source_cursor.num_dimensions());
        TransformedFieldCursor {
            position: vec![0.0; n],
            transform: self.transform.clone(),
            source_cursor,
        }
    }
}

impl<S, R> TransformedField<S, R>
where
    S: RealField,
    R: BoundedTransform,
{
    /// A view whose `real_cursor_within` forwards the transformed bounds to
    /// the source.
    ///
    /// # Panics
    /// If the transform's target dimensionality differs from the source's.
    pub fn bounded(source: S, transform: R) -> Self {
        match Self::try_bounded(source, transform) {
            Ok(field) => field,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_bounded(source: S, transform: R) -> Result<Self, GridError> {
        let mut field = Self::try_new(source, transform)?;
        field.bounds = BoundsStrategy::Estimate(R::estimate_bounds);
        Ok(field)
    }
}

impl<S, R> RealField for TransformedField<S, R>
where
    S: RealField,
    R: RealTransform,
{
    type Value = S::Value;
    type Cursor = TransformedFieldCursor<S::Cursor, R>;

    fn num_dimensions(&self) -> usize {
        self.transform.num_source_dimensions()
    }

    fn real_cursor(&self) -> Self::Cursor {
        self.assemble(self.source.real_cursor())
    }

    fn real_cursor_within(&self, bounds: &RealInterval) -> Self::Cursor {
        match self.bounds {
            BoundsStrategy::Ignore => self.real_cursor(),
            BoundsStrategy::Estimate(estimate) => {
                let source_bounds = estimate(&self.transform, bounds);
                self.assemble(self.source.real_cursor_within(&source_bounds))
            }
        }
    }
}

/// Cursor of a [`TransformedField`]: a real position, a private transform
/// copy and a private source cursor.
#[derive(Clone)]
pub struct TransformedFieldCursor<C, R> {
    position: Vec<f64>,
    transform: R,
    source_cursor: C,
}

impl<C, R> TransformedFieldCursor<C, R> {
    pub fn transform(&self) -> &R {
        &self.transform
    }
}

impl<C, R> RealCursor for TransformedFieldCursor<C, R>
where
    C: RealCursor,
    R: RealTransform,
{
    type Value = C::Value;

    fn num_dimensions(&self) -> usize {
        self.position.len()
    }

    #[inline]
    fn position(&self) -> &[f64] {
        &self.position
    }

    #[inline]
    fn position_mut(&mut self) -> &mut [f64] {
        &mut self.position
    }

    fn get(&mut self) -> C::Value {
        self.transform
            .apply(&self.position, self.source_cursor.position_mut());
        self.source_cursor.get()
    }
}
