//! Named geometric operations.
//!
//! Each operation builds its matrix with [`crate::transform`], sizes the
//! destination with [`crate::canvas`] and resamples with bilinear
//! interpolation. The source image is never modified.
//!
//! | operation | canvas |
//! |---|---|
//! | [`scale`] | the requested dimensions |
//! | [`translate`] | the source size, so the shift stays visible |
//! | [`reflect`], [`rotate`], [`shear`], [`projection`] | fitted to the transformed image |

use imwarp_image::{Image, ImageDtype};

use crate::canvas::{plan_canvas, CanvasPolicy};
use crate::error::WarpError;
use crate::interpolation::InterpolationMode;
use crate::transform::{
    projection_matrix, reflect_matrix, resolve_dimensions, rotate_matrix, scale_matrix,
    shear_matrix, translate_matrix, Axis, Dimensions, Transform, Translation,
};
use crate::warp::warp;

/// Applies a transform to an image on a canvas chosen by `policy`.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `transform` - The source to destination transform.
/// * `policy` - How the destination size is chosen.
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// Fails if the transform is singular or the canvas is degenerate. No image is
/// allocated in that case.
pub fn transform<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    transform: &Transform,
    policy: CanvasPolicy,
    interpolation: InterpolationMode,
) -> Result<Image<T, C>, WarpError> {
    // reject singular matrices before sizing the canvas
    transform.inverse()?;

    let canvas = plan_canvas(src.size(), transform, policy)?;
    log::debug!(
        "warping {} {} -> {} with {:?}",
        src.name(),
        src.size(),
        canvas.size,
        canvas.transform.to_rows()
    );

    warp(src, &canvas.transform, canvas.size, interpolation)
}

/// Scales an image to `dimensions`, half of its size when `None`.
///
/// The result has exactly the requested height and width.
///
/// # Example
///
/// ```
/// use imwarp_image::Image;
/// use imwarp_imgproc::ops::scale;
/// use imwarp_imgproc::transform::Dimensions;
///
/// let src = Image::<u8, 1>::from_size_val([4, 4].into(), 100).unwrap();
/// let dst = scale(&src, Some(Dimensions { height: 2, width: 2 })).unwrap();
///
/// assert_eq!(dst.as_slice(), &[100, 100, 100, 100]);
/// ```
pub fn scale<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dimensions: Option<Dimensions>,
) -> Result<Image<T, C>, WarpError> {
    let target = resolve_dimensions(dimensions, src.size())?;
    let m = scale_matrix(dimensions, src.size())?;
    transform(src, &m, CanvasPolicy::Fixed(target), InterpolationMode::Bilinear)
}

/// Reflects an image across `axis`.
///
/// [`Axis::X`] turns the image upside down, [`Axis::Y`] mirrors it left to right.
pub fn reflect<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    axis: Axis,
) -> Result<Image<T, C>, WarpError> {
    let m = reflect_matrix(axis, src.size());
    transform(src, &m, CanvasPolicy::Fit, InterpolationMode::Bilinear)
}

/// Rotates an image by `degrees` about its center, counter-clockwise for
/// positive angles. The canvas grows to hold the rotated corners.
pub fn rotate<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    degrees: f64,
) -> Result<Image<T, C>, WarpError> {
    if !degrees.is_finite() {
        return Err(WarpError::InvalidParameter(format!(
            "rotation angle must be finite, got {degrees}"
        )));
    }
    let m = rotate_matrix(degrees, src.size());
    transform(src, &m, CanvasPolicy::Fit, InterpolationMode::Bilinear)
}

/// Shears an image along `axis` by `factor`.
pub fn shear<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    axis: Axis,
    factor: f64,
) -> Result<Image<T, C>, WarpError> {
    let m = shear_matrix(axis, factor)?;
    transform(src, &m, CanvasPolicy::Fit, InterpolationMode::Bilinear)
}

/// Shifts the content of an image, by the default displacement when `None`.
///
/// The canvas keeps the source size: uncovered pixels become background and
/// content moved past the border is clipped.
pub fn translate<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    translation: Option<Translation>,
) -> Result<Image<T, C>, WarpError> {
    let m = translate_matrix(translation)?;
    transform(
        src,
        &m,
        CanvasPolicy::Fixed(src.size()),
        InterpolationMode::Bilinear,
    )
}

/// Warps an image with a caller-provided affine or projective matrix.
///
/// # Errors
///
/// Returns [`WarpError::SingularTransform`] if the matrix is not invertible.
pub fn projection<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    rows: [[f64; 3]; 3],
) -> Result<Image<T, C>, WarpError> {
    let m = projection_matrix(rows)?;
    transform(src, &m, CanvasPolicy::Fit, InterpolationMode::Bilinear)
}
