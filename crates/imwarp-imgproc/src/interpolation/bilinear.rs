use imwarp_image::{Image, ImageDtype};

// clamp a grid index into [0, len - 1]
fn clamp_index(i: f64, len: usize) -> usize {
    (i.max(0.0) as usize).min(len - 1)
}

/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel values. Neighbors falling outside of the image are
/// replaced by the closest edge pixel.
pub(crate) fn bilinear_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f64,
    v: f64,
) -> [f32; C] {
    let (rows, cols) = (image.rows(), image.cols());

    let u0 = u.floor();
    let v0 = v.floor();

    let frac_u = (u - u0) as f32;
    let frac_v = (v - v0) as f32;

    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    let w00 = frac_uu * frac_vv;
    let w01 = frac_u * frac_vv;
    let w10 = frac_uu * frac_v;
    let w11 = frac_u * frac_v;

    let iu0 = clamp_index(u0, cols);
    let iv0 = clamp_index(v0, rows);
    let iu1 = clamp_index(u0 + 1.0, cols);
    let iv1 = clamp_index(v0 + 1.0, rows);

    let base00 = (iv0 * cols + iu0) * C;
    let base01 = (iv0 * cols + iu1) * C;
    let base10 = (iv1 * cols + iu0) * C;
    let base11 = (iv1 * cols + iu1) * C;

    let data = image.as_slice();

    let p00 = &data[base00..base00 + C];
    let p01 = &data[base01..base01 + C];
    let p10 = &data[base10..base10 + C];
    let p11 = &data[base11..base11 + C];

    let mut pixel = [0.0; C];
    for k in 0..C {
        let (a, b, c, d): (f32, f32, f32, f32) =
            (p00[k].into(), p01[k].into(), p10[k].into(), p11[k].into());
        pixel[k] = a * w00 + b * w01 + c * w10 + d * w11;
    }

    pixel
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use imwarp_image::{Image, ImageError};

    use super::bilinear_interpolation;

    #[test]
    fn exact_at_pixel_centers() -> Result<(), ImageError> {
        let image = Image::<u8, 2>::new([2, 2].into(), vec![0, 10, 20, 30, 40, 50, 60, 70])?;
        assert_eq!(bilinear_interpolation(&image, 0.0, 0.0), [0.0, 10.0]);
        assert_eq!(bilinear_interpolation(&image, 1.0, 0.0), [20.0, 30.0]);
        assert_eq!(bilinear_interpolation(&image, 0.0, 1.0), [40.0, 50.0]);
        assert_eq!(bilinear_interpolation(&image, 1.0, 1.0), [60.0, 70.0]);
        Ok(())
    }

    #[test]
    fn center_of_four() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([2, 2].into(), vec![0.0, 1.0, 2.0, 3.0])?;
        let [value] = bilinear_interpolation(&image, 0.5, 0.5);
        assert_relative_eq!(value, 1.5);
        Ok(())
    }

    #[test]
    fn edges_are_replicated() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new([2, 1].into(), vec![4.0, 8.0])?;
        let [left] = bilinear_interpolation(&image, -0.4, -0.4);
        let [right] = bilinear_interpolation(&image, 1.4, 0.4);
        assert_relative_eq!(left, 4.0, epsilon = 1e-5);
        assert_relative_eq!(right, 8.0, epsilon = 1e-5);
        Ok(())
    }
}
