use super::bilinear::bilinear_interpolation;
use super::nearest::nearest_neighbor_interpolation;
use imwarp_image::{Image, ImageDtype};

/// Interpolation mode for the warp operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Nearest neighbor interpolation
    Nearest,
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image container with shape (height, width, C).
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The interpolated values of every channel.
///
/// # Example
///
/// ```
/// use imwarp_image::Image;
/// use imwarp_imgproc::interpolation::{interpolate_pixel, InterpolationMode};
///
/// let image = Image::<u8, 1>::new([2, 1].into(), vec![0, 100]).unwrap();
///
/// let value = interpolate_pixel(&image, 0.25, 0.0, InterpolationMode::Bilinear);
/// assert_eq!(value, [25.0]);
/// ```
pub fn interpolate_pixel<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f64,
    v: f64,
    interpolation: InterpolationMode,
) -> [f32; C] {
    match interpolation {
        InterpolationMode::Bilinear => bilinear_interpolation(image, u, v),
        InterpolationMode::Nearest => nearest_neighbor_interpolation(image, u, v),
    }
}
