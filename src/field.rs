// src/field.rs

//! The continuous-source capability: fields addressable at real coordinates.
//!
//! A [`RealField`] is a factory of [`RealCursor`]s. A cursor owns its
//! continuous position and reads the field value there on `get()`. Cursors
//! are `Clone`; a clone must be independent of the original, so anything the
//! two share has to be immutable.

use crate::interval::RealInterval;
use std::fmt;
use std::sync::Arc;

/// A movable read head into a continuous field.
pub trait RealCursor: Clone {
    type Value;

    fn num_dimensions(&self) -> usize;

    /// The current continuous position.
    fn position(&self) -> &[f64];

    /// Mutable access to the continuous position. Transforms write their
    /// output straight into this slice.
    fn position_mut(&mut self) -> &mut [f64];

    /// # Panics
    /// If `position` has the wrong number of components.
    fn set_position(&mut self, position: &[f64]) {
        self.position_mut().copy_from_slice(position);
    }

    /// Reads the value at the current position.
    ///
    /// Failures of the underlying field (out-of-domain positions and the
    /// like) surface here unchanged, either as a panic or through a
    /// `Result` value type.
    fn get(&mut self) -> Self::Value;
}

/// A field that can be sampled at arbitrary real coordinates.
pub trait RealField {
    type Value;
    type Cursor: RealCursor<Value = Self::Value>;

    fn num_dimensions(&self) -> usize;

    /// A fresh cursor at an unspecified position.
    fn real_cursor(&self) -> Self::Cursor;

    /// A fresh cursor that will only be moved inside `bounds`.
    ///
    /// Fields may use the hint to prepare a cheaper cursor. The default
    /// ignores it.
    fn real_cursor_within(&self, bounds: &RealInterval) -> Self::Cursor {
        let _ = bounds;
        self.real_cursor()
    }
}

impl<F: RealField + ?Sized> RealField for &F {
    type Value = F::Value;
    type Cursor = F::Cursor;

    fn num_dimensions(&self) -> usize {
        (**self).num_dimensions()
    }

    fn real_cursor(&self) -> Self::Cursor {
        (**self).real_cursor()
    }

    fn real_cursor_within(&self, bounds: &RealInterval) -> Self::Cursor {
        (**self).real_cursor_within(bounds)
    }
}

impl<F: RealField + ?Sized> RealField for Arc<F> {
    type Value = F::Value;
    type Cursor = F::Cursor;

    fn num_dimensions(&self) -> usize {
        (**self).num_dimensions()
    }

    fn real_cursor(&self) -> Self::Cursor {
        (**self).real_cursor()
    }

    fn real_cursor_within(&self, bounds: &RealInterval) -> Self::Cursor {
        (**self).real_cursor_within(bounds)
    }
}

/// A field defined by a closure of the continuous position.
///
/// # Example
/// ```
/// use warpgrid::field::{FnField, RealCursor, RealField};
///
/// let field = FnField::new(2, |p: &[f64]| p[0] + p[1]);
/// let mut cursor = field.real_cursor();
/// cursor.set_position(&[1.5, 2.0]);
/// assert_eq!(cursor.get(), 3.5);
/// ```
pub struct FnField<F> {
    func: Arc<F>,
    n: usize,
}

impl<F, T> FnField<F>
where
    F: Fn(&[f64]) -> T,
{
    pub fn new(n: usize, func: F) -> Self {
        FnField {
            func: Arc::new(func),
            n,
        }
    }
}

impl<F> fmt::Debug for FnField<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnField").field("n", &self.n).finish_non_exhaustive()
    }
}

impl<F, T> RealField for FnField<F>
where
    F: Fn(&[f64]) -> T,
{
    type Value = T;
    type Cursor = FnFieldCursor<F>;

    fn num_dimensions(&self) -> usize {
        self.n
    }

    fn real_cursor(&self) -> FnFieldCursor<F> {
        FnFieldCursor {
            func: Arc::clone(&self.func),
            position: vec![0.0; self.n],
        }
    }
}

/// Cursor of a [`FnField`].
pub struct FnFieldCursor<F> {
    func: Arc<F>,
    position: Vec<f64>,
}

impl<F> Clone for FnFieldCursor<F> {
    fn clone(&self) -> Self {
        FnFieldCursor {
            func: Arc::clone(&self.func),
            position: self.position.clone(),
        }
    }
}

impl<F, T> RealCursor for FnFieldCursor<F>
where
    F: Fn(&[f64]) -> T,
{
    type Value = T;

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

    #[inline]
    fn get(&mut self) -> T {
        (self.func)(&self.position)
    }
}

/// The same value everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantField<T> {
    value: T,
    n: usize,
}

impl<T: Clone> ConstantField<T> {
    pub fn new(n: usize, value: T) -> Self {
        ConstantField { value, n }
    }
}

impl<T: Clone> RealField for ConstantField<T> {
    type Value = T;
    type Cursor = ConstantCursor<T>;

    fn num_dimensions(&self) -> usize {
        self.n
    }

    fn real_cursor(&self) -> ConstantCursor<T> {
        ConstantCursor {
            value: self.value.clone(),
            position: vec![0.0; self.n],
        }
    }
}

/// Cursor of a [`ConstantField`].
#[derive(Debug, Clone)]
pub struct ConstantCursor<T> {
    value: T,
    position: Vec<f64>,
}

impl<T: Clone> RealCursor for ConstantCursor<T> {
    type Value = T;

    fn num_dimensions(&self) -> usize {
        self.position.len()
    }

    fn position(&self) -> &[f64] {
        &self.position
    }

    fn position_mut(&mut self) -> &mut [f64] {
        &mut self.position
    }

    fn get(&mut self) -> T {
        self.value.clone()
    }
}
