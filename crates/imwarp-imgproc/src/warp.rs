//! Inverse-mapping warp of an image under a 3x3 homogeneous transform.
//!
//! For every destination pixel the center `(x + 0.5, y + 0.5)` is mapped back
//! through the inverse transform. Pixels whose source position falls outside
//! of `[0, width) x [0, height)` get the background value (zero), the rest are
//! resampled from the source.
//!
//! # Examples
//!
//! Flipping an image horizontally:
//!
//! ```
//! use imwarp_image::Image;
//! use imwarp_imgproc::interpolation::InterpolationMode;
//! use imwarp_imgproc::transform::{reflect_matrix, Axis};
//! use imwarp_imgproc::warp::warp;
//!
//! let src = Image::<u8, 1>::new([3, 1].into(), vec![1, 2, 3]).unwrap();
//! let m = reflect_matrix(Axis::Y, src.size());
//!
//! let dst = warp(&src, &m, src.size(), InterpolationMode::Bilinear).unwrap();
//! assert_eq!(dst.as_slice(), &[3, 2, 1]);
//! ```

use imwarp_image::{Image, ImageDtype, ImageSize};

use crate::error::WarpError;
use crate::interpolation::{interpolate_pixel, InterpolationMode};
use crate::transform::Transform;

/// Warps an image into a newly allocated destination.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `transform` - The 3x3 transform mapping source to destination coordinates.
/// * `dst_size` - The size of the destination image.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The warped image. Its name and extension are those of `src`.
///
/// # Errors
///
/// Returns [`WarpError::SingularTransform`] if the transform cannot be
/// inverted, or [`WarpError::DegenerateOutput`] if `dst_size` has no area.
/// Both are checked before the destination is allocated.
pub fn warp<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    transform: &Transform,
    dst_size: ImageSize,
    interpolation: InterpolationMode,
) -> Result<Image<T, C>, WarpError> {
    let m_inv = transform.inverse()?;

    if dst_size.is_empty() {
        return Err(WarpError::DegenerateOutput(format!(
            "destination has no area: {}",
            dst_size
        )));
    }

    let mut dst =
        Image::from_size_val(dst_size, T::default())?.with_source(src.name(), src.extension());
    resample(src, &mut dst, &m_inv, interpolation);

    Ok(dst)
}

/// Warps an image into a caller-provided destination.
///
/// Every destination pixel is written, including the background ones.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (new_height, new_width, channels).
/// * `transform` - The 3x3 transform mapping source to destination coordinates.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use imwarp_image::Image;
/// use imwarp_imgproc::interpolation::InterpolationMode;
/// use imwarp_imgproc::transform::Transform;
/// use imwarp_imgproc::warp::warp_into;
///
/// let src = Image::<f32, 1>::new([4, 1].into(), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val([4, 1].into(), -1.0).unwrap();
///
/// // shift left by one pixel
/// warp_into(&src, &mut dst, &Transform::translation(-1.0, 0.0), InterpolationMode::Bilinear).unwrap();
///
/// assert_eq!(dst.as_slice(), &[2.0, 3.0, 4.0, 0.0]);
/// ```
pub fn warp_into<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    transform: &Transform,
    interpolation: InterpolationMode,
) -> Result<(), WarpError> {
    let m_inv = transform.inverse()?;
    resample(src, dst, &m_inv, interpolation);
    Ok(())
}

// map the center of a destination pixel back to the source
fn source_position(x: usize, y: usize, m_inv: &Transform) -> Option<(f64, f64)> {
    m_inv.transform_point(x as f64 + 0.5, y as f64 + 0.5)
}

fn resample<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m_inv: &Transform,
    interpolation: InterpolationMode,
) {
    let (src_w, src_h) = (src.cols() as f64, src.rows() as f64);
    let dst_cols = dst.cols();

    for (y, row) in dst.as_slice_mut().chunks_exact_mut(dst_cols * C).enumerate() {
        for (x, dst_pixel) in row.chunks_exact_mut(C).enumerate() {
            let inside = source_position(x, y, m_inv)
                .filter(|&(sx, sy)| sx >= 0.0 && sx < src_w && sy >= 0.0 && sy < src_h);

            match inside {
                Some((sx, sy)) => {
                    // pixel centers sit at half-integer positions
                    let values = interpolate_pixel(src, sx - 0.5, sy - 0.5, interpolation);
                    for (d, v) in dst_pixel.iter_mut().zip(values) {
                        *d = T::from_f32(v);
                    }
                }
                None => dst_pixel.fill(T::default()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use imwarp_image::{Image, ImageError, ImageSize};

    use super::{warp, warp_into};
    use crate::error::WarpError;
    use crate::interpolation::InterpolationMode;
    use crate::transform::{rotation_matrix2d, Transform};

    #[test]
    fn warp_smoke_ch3() -> Result<(), WarpError> {
        let image = Image::<_, 3>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            vec![0f32; 4 * 5 * 3],
        )?;

        let new_size = ImageSize {
            width: 2,
            height: 3,
        };

        let image_transformed = warp(
            &image,
            &Transform::IDENTITY,
            new_size,
            InterpolationMode::Bilinear,
        )?;

        assert_eq!(image_transformed.num_channels(), 3);
        assert_eq!(image_transformed.size(), new_size);

        Ok(())
    }

    #[test]
    fn warp_identity() -> Result<(), WarpError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            (0..20).collect(),
        )?
        .with_source("Image1", "png");

        for mode in [InterpolationMode::Bilinear, InterpolationMode::Nearest] {
            let out = warp(&image, &Transform::IDENTITY, image.size(), mode)?;
            assert_eq!(out, image);
        }

        Ok(())
    }

    #[test]
    fn warp_rot90() -> Result<(), WarpError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0.0f32, 1.0f32, 2.0f32, 3.0f32],
        )?;

        let out = warp(
            &image,
            &rotation_matrix2d((1.0, 1.0), 90.0, 1.0),
            image.size(),
            InterpolationMode::Nearest,
        )?;

        assert_eq!(out.as_slice(), &[1.0f32, 3.0f32, 0.0f32, 2.0f32]);

        Ok(())
    }

    #[test]
    fn warp_perspective_hflip() -> Result<(), WarpError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0],
        )?;

        let m = Transform::from_rows([[-1.0, 0.0, 2.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let out = warp(&image, &m, image.size(), InterpolationMode::Bilinear)?;

        assert_eq!(out.as_slice(), &[1.0, 0.0, 3.0, 2.0, 5.0, 4.0]);

        Ok(())
    }

    #[test]
    fn warp_shift_fills_background() -> Result<(), WarpError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            (1..=16).map(|v| v as u8).collect(),
        )?;

        // shift right and down by one pixel
        let out = warp(
            &image,
            &Transform::translation(1.0, 1.0),
            image.size(),
            InterpolationMode::Bilinear,
        )?;

        #[rustfmt::skip]
        let expected = vec![
            0, 0, 0, 0,
            0, 1, 2, 3,
            0, 5, 6, 7,
            0, 9, 10, 11,
        ];
        assert_eq!(out.as_slice(), expected);

        Ok(())
    }

    #[test]
    fn warp_downscale_uniform() -> Result<(), WarpError> {
        let image = Image::<u8, 3>::from_size_val([8, 6].into(), 77)?;
        let size: ImageSize = [3, 2].into();
        let m = Transform::scaling(3.0 / 8.0, 2.0 / 6.0);
        let out = warp(&image, &m, size, InterpolationMode::Bilinear)?;
        assert!(out.as_slice().iter().all(|&v| v == 77));
        Ok(())
    }

    #[test]
    fn warp_rejects_singular_before_alloc() -> Result<(), WarpError> {
        let image = Image::<u8, 1>::from_size_val([4, 4].into(), 1)?;
        let m = Transform::scaling(0.0, 1.0);
        assert!(matches!(
            warp(&image, &m, image.size(), InterpolationMode::Bilinear),
            Err(WarpError::SingularTransform(_))
        ));
        Ok(())
    }

    #[test]
    fn warp_rejects_empty_destination() -> Result<(), WarpError> {
        let image = Image::<u8, 1>::from_size_val([4, 4].into(), 1)?;
        assert!(matches!(
            warp(
                &image,
                &Transform::IDENTITY,
                [0, 3].into(),
                InterpolationMode::Bilinear
            ),
            Err(WarpError::DegenerateOutput(_))
        ));
        Ok(())
    }

    #[test]
    fn warp_rejects_overflowing_destination() -> Result<(), WarpError> {
        let image = Image::<u8, 3>::from_size_val([4, 4].into(), 1)?;
        let res = warp(
            &image,
            &Transform::IDENTITY,
            [3, usize::MAX / 2].into(),
            InterpolationMode::Bilinear,
        );
        assert_eq!(
            res,
            Err(WarpError::Image(ImageError::SizeOverflow(3, usize::MAX / 2, 3)))
        );
        Ok(())
    }

    #[test]
    fn warp_into_overwrites_background() -> Result<(), WarpError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 9)?;
        let mut dst = Image::<u8, 1>::from_size_val([2, 2].into(), 255)?;
        warp_into(
            &image,
            &mut dst,
            &Transform::translation(0.0, 1.0),
            InterpolationMode::Nearest,
        )?;
        assert_eq!(dst.as_slice(), &[0, 0, 9, 9]);
        Ok(())
    }

    #[test]
    fn warp_homography_divides_by_w() -> Result<(), WarpError> {
        // uniform scaling by two written as a homography with w = 0.5
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 40)?;
        let m = Transform::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.5]]);
        let out = warp(&image, &m, [4, 4].into(), InterpolationMode::Bilinear)?;
        assert!(out.as_slice().iter().all(|&v| v == 40));
        Ok(())
    }
}
