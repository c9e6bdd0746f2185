use imwarp_image::{Image, ImageDtype};

/// Kernel for nearest neighbor interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The pixel values of the closest pixel, ties rounding towards the bottom right.
pub(crate) fn nearest_neighbor_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f64,
    v: f64,
) -> [f32; C] {
    let (rows, cols) = (image.rows(), image.cols());

    let iu = ((u + 0.5).floor().max(0.0) as usize).min(cols - 1);
    let iv = ((v + 0.5).floor().max(0.0) as usize).min(rows - 1);

    let base = (iv * cols + iu) * C;
    let src = &image.as_slice()[base..base + C];

    let mut pixel = [0.0; C];
    for (p, &s) in pixel.iter_mut().zip(src) {
        *p = s.into();
    }

    pixel
}
