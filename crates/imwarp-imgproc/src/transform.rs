use std::ops::Mul;

use glam::{DMat3, DVec3};
use imwarp_image::ImageSize;

use crate::error::WarpError;

/// Determinants below this magnitude are treated as zero.
pub const SINGULAR_EPS: f64 = 1e-12;

/// Displacement applied by [`translate_matrix`] when no translation is given.
pub const DEFAULT_TRANSLATION: Translation = Translation { dx: 50.0, dy: 50.0 };

/// A 3x3 homogeneous transform acting on pixel coordinates.
///
/// Points are column vectors `(x, y, 1)`, `x` growing to the right and `y`
/// growing downwards. Affine transforms have `[0, 0, 1]` as bottom row, any
/// other bottom row describes a homography.
///
/// # Examples
///
/// ```
/// use imwarp_imgproc::transform::Transform;
///
/// let shift = Transform::translation(2.0, 3.0);
/// let zoom = Transform::scaling(2.0, 2.0);
///
/// // shift first, then zoom
/// let m = shift.then(&zoom);
/// assert_eq!(m.transform_point(1.0, 1.0), Some((6.0, 8.0)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform(DMat3);

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self(DMat3::IDENTITY);

    /// Create a transform from its rows.
    #[rustfmt::skip]
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self(DMat3::from_cols(
            DVec3::new(rows[0][0], rows[1][0], rows[2][0]),
            DVec3::new(rows[0][1], rows[1][1], rows[2][1]),
            DVec3::new(rows[0][2], rows[1][2], rows[2][2]),
        ))
    }

    /// The rows of the matrix.
    pub fn to_rows(&self) -> [[f64; 3]; 3] {
        let c = self.0.to_cols_array_2d();
        [
            [c[0][0], c[1][0], c[2][0]],
            [c[0][1], c[1][1], c[2][1]],
            [c[0][2], c[1][2], c[2][2]],
        ]
    }

    /// A pure translation by `(dx, dy)`.
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::from_rows([[1.0, 0.0, dx], [0.0, 1.0, dy], [0.0, 0.0, 1.0]])
    }

    /// An axis-aligned scaling about the origin.
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::from_rows([[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Compose two transforms: `self` is applied first, `next` second.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform(next.0 * self.0)
    }

    /// The determinant of the matrix.
    pub fn determinant(&self) -> f64 {
        self.0.determinant()
    }

    /// Returns true if the bottom row is `[0, 0, 1]`.
    pub fn is_affine(&self) -> bool {
        let r = self.to_rows()[2];
        r[0] == 0.0 && r[1] == 0.0 && r[2] == 1.0
    }

    /// Invert the transform.
    ///
    /// # Errors
    ///
    /// Returns [`WarpError::SingularTransform`] if the determinant is zero or
    /// not finite.
    pub fn inverse(&self) -> Result<Transform, WarpError> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPS {
            return Err(WarpError::SingularTransform(det));
        }
        Ok(Transform(self.0.inverse()))
    }

    /// Map a point and normalize by its homogeneous coordinate.
    ///
    /// Returns `None` if the point is sent to infinity.
    pub fn transform_point(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let p = self.0 * DVec3::new(x, y, 1.0);
        if !p.z.is_finite() || p.z.abs() < SINGULAR_EPS {
            return None;
        }
        let (u, v) = (p.x / p.z, p.y / p.z);
        (u.is_finite() && v.is_finite()).then_some((u, v))
    }

    /// Map a point to homogeneous coordinates without normalizing.
    pub fn transform_point_homogeneous(&self, x: f64, y: f64) -> [f64; 3] {
        self.0.mul_vec3(DVec3::new(x, y, 1.0)).to_array()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Matrix product: `a * b` applies `b` first, then `a`.
impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform(self.0 * rhs.0)
    }
}

impl From<[[f64; 3]; 3]> for Transform {
    fn from(rows: [[f64; 3]; 3]) -> Self {
        Self::from_rows(rows)
    }
}

/// Target size of a scale operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Target height in pixels.
    pub height: usize,
    /// Target width in pixels.
    pub width: usize,
}

impl From<Dimensions> for ImageSize {
    fn from(d: Dimensions) -> Self {
        ImageSize {
            width: d.width,
            height: d.height,
        }
    }
}

/// Axis used by reflections and shears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal axis. Reflecting across it flips the image upside down,
    /// shearing along it displaces pixels horizontally.
    X,
    /// Vertical axis. Reflecting across it mirrors the image left to right,
    /// shearing along it displaces pixels vertically.
    Y,
}

/// Pixel displacement of a translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Translation {
    /// Displacement along x, positive to the right.
    pub dx: f64,
    /// Displacement along y, positive downwards.
    pub dy: f64,
}

/// Resolve the target size of a scale operation.
///
/// `None` falls back to half of the source size, never smaller than one pixel.
pub fn resolve_dimensions(
    dimensions: Option<Dimensions>,
    src: ImageSize,
) -> Result<ImageSize, WarpError> {
    if src.is_empty() {
        return Err(WarpError::InvalidParameter(format!(
            "source size must be non-zero, got {}",
            src
        )));
    }

    let target = match dimensions {
        Some(d) => ImageSize::from(d),
        None => ImageSize {
            width: (src.width / 2).max(1),
            height: (src.height / 2).max(1),
        },
    };

    if target.is_empty() {
        return Err(WarpError::InvalidParameter(format!(
            "target dimensions must be non-zero, got {}",
            target
        )));
    }

    Ok(target)
}

/// Returns the matrix scaling an image of size `src` to `dimensions`.
///
/// # Arguments
///
/// * `dimensions` - The target size, `None` for half size.
/// * `src` - The size of the source image.
///
/// # Errors
///
/// Returns [`WarpError::InvalidParameter`] if either size is zero.
pub fn scale_matrix(dimensions: Option<Dimensions>, src: ImageSize) -> Result<Transform, WarpError> {
    let target = resolve_dimensions(dimensions, src)?;
    let sx = target.width as f64 / src.width as f64;
    let sy = target.height as f64 / src.height as f64;
    Ok(Transform::scaling(sx, sy))
}

/// Returns the matrix reflecting an image of size `src` across `axis`.
///
/// The flipped content is shifted back so it covers the same region as the
/// source: `x' = w - x` for [`Axis::Y`] and `y' = h - y` for [`Axis::X`].
pub fn reflect_matrix(axis: Axis, src: ImageSize) -> Transform {
    let (w, h) = (src.width as f64, src.height as f64);
    match axis {
        Axis::X => Transform::scaling(1.0, -1.0).then(&Transform::translation(0.0, h)),
        Axis::Y => Transform::scaling(-1.0, 1.0).then(&Transform::translation(w, 0.0)),
    }
}

/// Returns a rotation matrix around a center point, OpenCV style.
///
/// The matrix is defined as:
///
/// | alpha  beta  tx |
/// | -beta  alpha ty |
/// | 0      0     1  |
///
/// where:
///
/// alpha = scale * cos(angle)
/// beta = scale * sin(angle)
/// tx = (1 - alpha) * center.x - beta * center.y
/// ty = beta * center.x + (1 - alpha) * center.y
///
/// # Arguments
///
/// * `center` - The center point of the rotation.
/// * `angle` - The angle of rotation in degrees, positive is counter-clockwise on screen.
/// * `scale` - The scale factor.
///
/// # Example
///
/// ```
/// use imwarp_imgproc::transform::rotation_matrix2d;
///
/// let m = rotation_matrix2d((0.0, 0.0), 90.0, 1.0);
/// let (x, y) = m.transform_point(1.0, 0.0).unwrap();
///
/// assert!(x.abs() < 1e-12);
/// assert!((y + 1.0).abs() < 1e-12);
/// ```
pub fn rotation_matrix2d(center: (f64, f64), angle: f64, scale: f64) -> Transform {
    let angle = angle.to_radians();
    let alpha = scale * angle.cos();
    let beta = scale * angle.sin();

    let tx = (1.0 - alpha) * center.0 - beta * center.1;
    let ty = beta * center.0 + (1.0 - alpha) * center.1;

    Transform::from_rows([[alpha, beta, tx], [-beta, alpha, ty], [0.0, 0.0, 1.0]])
}

/// Returns the matrix rotating an image of size `src` about its center.
///
/// Built as a shift of the center to the origin, a rotation, and the shift
/// back. Positive `degrees` rotate counter-clockwise on screen.
pub fn rotate_matrix(degrees: f64, src: ImageSize) -> Transform {
    let (cx, cy) = (src.width as f64 / 2.0, src.height as f64 / 2.0);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let rotation = Transform::from_rows([[cos, sin, 0.0], [-sin, cos, 0.0], [0.0, 0.0, 1.0]]);

    Transform::translation(-cx, -cy)
        .then(&rotation)
        .then(&Transform::translation(cx, cy))
}

/// Returns the matrix shearing along `axis` by `factor`.
///
/// [`Axis::X`] gives `x' = x + factor * y`, [`Axis::Y`] gives `y' = y + factor * x`.
///
/// # Errors
///
/// Returns [`WarpError::InvalidParameter`] if the factor is not finite.
pub fn shear_matrix(axis: Axis, factor: f64) -> Result<Transform, WarpError> {
    if !factor.is_finite() {
        return Err(WarpError::InvalidParameter(format!(
            "shear factor must be finite, got {factor}"
        )));
    }

    Ok(match axis {
        Axis::X => Transform::from_rows([[1.0, factor, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]),
        Axis::Y => Transform::from_rows([[1.0, 0.0, 0.0], [factor, 1.0, 0.0], [0.0, 0.0, 1.0]]),
    })
}

/// Returns the translation matrix, [`DEFAULT_TRANSLATION`] when `None`.
///
/// # Errors
///
/// Returns [`WarpError::InvalidParameter`] if the displacement is not finite.
pub fn translate_matrix(translation: Option<Translation>) -> Result<Transform, WarpError> {
    let Translation { dx, dy } = translation.unwrap_or(DEFAULT_TRANSLATION);
    if !dx.is_finite() || !dy.is_finite() {
        return Err(WarpError::InvalidParameter(format!(
            "translation must be finite, got ({dx}, {dy})"
        )));
    }
    Ok(Transform::translation(dx, dy))
}

/// Validate a caller-provided affine or projective matrix.
///
/// # Errors
///
/// Returns [`WarpError::SingularTransform`] if the matrix is not invertible.
pub fn projection_matrix(rows: [[f64; 3]; 3]) -> Result<Transform, WarpError> {
    let m = Transform::from_rows(rows);
    m.inverse()?;
    Ok(m)
}
