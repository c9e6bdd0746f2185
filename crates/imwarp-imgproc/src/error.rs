use imwarp_image::ImageError;

/// An error type for the warping operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WarpError {
    /// A transform parameter is outside of its valid domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The transform matrix cannot be inverted.
    #[error("Transform is not invertible (determinant {0})")]
    SingularTransform(f64),

    /// The transformed image collapses or cannot be represented on a canvas.
    #[error("Degenerate output: {0}")]
    DegenerateOutput(String),

    /// Error raised while creating the destination image.
    #[error("Failed to create image. {0}")]
    Image(#[from] ImageError),
}
