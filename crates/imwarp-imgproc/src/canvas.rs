use imwarp_image::ImageSize;

use crate::{error::WarpError, transform::Transform};

/// Largest width or height accepted for a destination canvas.
pub const MAX_CANVAS_SIDE: usize = 1 << 16;

const HORIZON_EPS: f64 = 1e-12;

// corners closer than this to a pixel boundary are snapped onto it
const SNAP_EPS: f64 = 1e-9;

fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < SNAP_EPS {
        r
    } else {
        v
    }
}

/// How the destination size of a warp is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanvasPolicy {
    /// Grow the canvas to the bounding box of the transformed image and shift
    /// the content so that its top-left corner lands on `(0, 0)`.
    Fit,
    /// Use the given size and the transform as is. Content mapped outside is
    /// clipped.
    Fixed(ImageSize),
}

/// Destination extents of a warp together with the matrix to warp with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    /// Size of the destination image.
    pub size: ImageSize,
    /// Source to destination transform, including the canvas offset.
    pub transform: Transform,
}

/// Computes the destination canvas for `transform` applied to an image of size `src`.
///
/// # Arguments
///
/// * `src` - The size of the source image.
/// * `transform` - The source to destination transform.
/// * `policy` - How to choose the destination size.
///
/// # Errors
///
/// Returns [`WarpError::DegenerateOutput`] if the destination has no area or
/// cannot be represented.
pub fn plan_canvas(
    src: ImageSize,
    transform: &Transform,
    policy: CanvasPolicy,
) -> Result<Canvas, WarpError> {
    match policy {
        CanvasPolicy::Fit => fit_canvas(src, transform),
        CanvasPolicy::Fixed(size) => {
            if size.is_empty() {
                return Err(WarpError::DegenerateOutput(format!(
                    "fixed canvas has no area: {}",
                    size
                )));
            }
            if size.width > MAX_CANVAS_SIDE || size.height > MAX_CANVAS_SIDE {
                return Err(WarpError::DegenerateOutput(format!(
                    "fixed canvas {} exceeds {MAX_CANVAS_SIDE} pixels per side",
                    size
                )));
            }
            Ok(Canvas {
                size,
                transform: *transform,
            })
        }
    }
}

/// Computes the smallest canvas holding the transformed image.
///
/// The four image corners are mapped in homogeneous coordinates, the bounding
/// box is rounded outwards to whole pixels, and a translation moving its
/// minimum corner to the origin is appended to the transform.
///
/// # Example
///
/// ```
/// use imwarp_image::ImageSize;
/// use imwarp_imgproc::canvas::fit_canvas;
/// use imwarp_imgproc::transform::Transform;
///
/// let src = ImageSize { width: 4, height: 2 };
/// let canvas = fit_canvas(src, &Transform::translation(-10.5, 3.0)).unwrap();
///
/// assert_eq!(canvas.size, ImageSize { width: 5, height: 2 });
/// assert_eq!(canvas.transform.transform_point(0.0, 0.0), Some((0.5, 0.0)));
/// ```
pub fn fit_canvas(src: ImageSize, transform: &Transform) -> Result<Canvas, WarpError> {
    if src.is_empty() {
        return Err(WarpError::DegenerateOutput(format!(
            "source has no area: {}",
            src
        )));
    }

    let (w, h) = (src.width as f64, src.height as f64);
    let corners = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)];

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);

    for (x, y) in corners {
        let [u, v, z] = transform.transform_point_homogeneous(x, y);
        // a corner on or behind the horizon has no finite image
        if !z.is_finite() || z < HORIZON_EPS {
            return Err(WarpError::DegenerateOutput(format!(
                "corner ({x}, {y}) maps to infinity"
            )));
        }

        let (u, v) = (u / z, v / z);
        if !u.is_finite() || !v.is_finite() {
            return Err(WarpError::DegenerateOutput(format!(
                "corner ({x}, {y}) maps to a non-finite point"
            )));
        }

        min_x = min_x.min(u);
        min_y = min_y.min(v);
        max_x = max_x.max(u);
        max_y = max_y.max(v);
    }

    let (x0, y0) = (snap(min_x).floor(), snap(min_y).floor());
    let width = snap(max_x).ceil() - x0;
    let height = snap(max_y).ceil() - y0;

    if width < 1.0 || height < 1.0 {
        return Err(WarpError::DegenerateOutput(format!(
            "bounding box collapses to {width}x{height}"
        )));
    }

    let side_limit = MAX_CANVAS_SIDE as f64;
    if width > side_limit || height > side_limit {
        return Err(WarpError::DegenerateOutput(format!(
            "bounding box {width}x{height} exceeds {MAX_CANVAS_SIDE} pixels per side"
        )));
    }

    Ok(Canvas {
        size: ImageSize {
            width: width as usize,
            height: height as usize,
        },
        transform: transform.then(&Transform::translation(-x0, -y0)),
    })
}
