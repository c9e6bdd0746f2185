#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// output canvas sizing for warped images.
pub mod canvas;

/// Error types for the warping operations.
pub mod error;

/// utilities for interpolation.
pub mod interpolation;

/// named geometric operations: scale, reflect, rotate, shear, translate and projection.
pub mod ops;

/// 3x3 homogeneous transforms and their builders.
pub mod transform;

/// image warping by inverse mapping.
pub mod warp;

pub use crate::error::WarpError;
