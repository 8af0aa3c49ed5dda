// src/error.rs

use thiserror::Error;

/// Contract violations detected when a view is assembled.
///
/// Sampling itself has no error surface of its own; failures of a field or
/// transform come back through their own value types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("transform produces {transform_target}-dimensional positions but the source is {source_dims}-dimensional")]
    DimensionMismatch {
        transform_target: usize,
        source_dims: usize,
    },
}
