// src/lib.rs

//! Lazy sampling of continuous fields at integer grid positions.
//!
//! A [`TransformedGrid`] maps every integer position through a
//! [`RealTransform`] into the continuous domain of a [`RealField`] and reads
//! the value there. The grid is a stateless factory; iteration state lives in
//! [`GridCursor`]s, each of which owns a private copy of the transform and a
//! private cursor into the field. That makes cursors the unit of thread
//! confinement: share the grid, give every thread its own cursor.
//!
//! ```
//! use warpgrid::{FnField, Positionable, TransformedGrid, Translation};
//!
//! let field = FnField::new(2, |p: &[f64]| p[0] + p[1]);
//! let grid = TransformedGrid::new(field, Translation::new(&[10.0, 0.0]));
//!
//! let mut cursor = grid.cursor();
//! assert_eq!(cursor.get(), 10.0);
//! cursor.fwd(1);
//! assert_eq!(cursor.get(), 11.0);
//! ```

pub mod config;
pub mod error;
pub mod field;
pub mod grid;
pub mod interval;
pub mod position;
pub mod raster;
pub mod real_view;
pub mod transform;

pub use error::GridError;
pub use field::{ConstantField, FnField, RealCursor, RealField};
pub use grid::{DiscreteField, GridAccess, GridCursor, TransformedGrid};
pub use interval::{Interval, RealInterval};
pub use position::{Localizable, Point, Positionable};
pub use raster::{rasterize, rasterize_into, rasterize_parallel, rasterize_parallel_into, RenderOptions};
pub use real_view::{TransformedField, TransformedFieldCursor};
pub use transform::{AffineTransform, BoundedTransform, FnTransform, Identity, RealTransform, Scale, Translation};
