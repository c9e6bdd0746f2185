#![deny(missing_docs)]
//! Image types used as input and output of the imwarp transformations.

/// image representation for geometric processing.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize};
