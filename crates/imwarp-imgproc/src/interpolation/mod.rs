//! Pixel interpolation methods for image transformations.
//!
//! Coordinates passed to the kernels are continuous pixel coordinates in which
//! the center of pixel `(i, j)` sits at `(i, j)`. Samples are read as `f32`
//! whatever the storage type of the image is.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: Fastest, uses nearest pixel value (no interpolation)
//! - **Bilinear**: Smooth linear interpolation between adjacent pixels

mod bilinear;
pub(crate) mod interpolate;
mod nearest;

pub use interpolate::{interpolate_pixel, InterpolationMode};
