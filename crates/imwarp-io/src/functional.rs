use std::path::Path;

use image::DynamicImage;
use imwarp_image::{Image, ImageSize};

use crate::{
    ensure_exists,
    error::IoError,
    jpeg::{
        write_image_jpeg_gray8, write_image_jpeg_rgb8, write_image_jpeg_rgba8,
        DEFAULT_JPEG_QUALITY,
    },
    png::{write_image_png_gray8, write_image_png_rgb8, write_image_png_rgba8},
    source_of,
};

/// A decoded image in one of the supported 8-bit layouts.
#[derive(Debug, Clone, PartialEq)]
pub enum GenericImage {
    /// 8-bit grayscale image
    Mono8(Image<u8, 1>),
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
    /// 8-bit RGB image with alpha channel
    Rgba8(Image<u8, 4>),
}

impl GenericImage {
    /// The size of the wrapped image.
    pub fn size(&self) -> ImageSize {
        match self {
            GenericImage::Mono8(img) => img.size(),
            GenericImage::Rgb8(img) => img.size(),
            GenericImage::Rgba8(img) => img.size(),
        }
    }

    /// The name of the wrapped image, the file stem when loaded from disk.
    pub fn name(&self) -> &str {
        match self {
            GenericImage::Mono8(img) => img.name(),
            GenericImage::Rgb8(img) => img.name(),
            GenericImage::Rgba8(img) => img.name(),
        }
    }
}

// decode any format known to the image crate, guessing it from the content
pub(crate) fn decode_any(file_path: &Path) -> Result<DynamicImage, IoError> {
    ensure_exists(file_path)?;

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| IoError::DecodeError(format!("{}: {}", file_path.display(), e)))?;

    log::debug!(
        "decoded {} ({}x{}, {:?})",
        file_path.display(),
        img.width(),
        img.height(),
        img.color()
    );

    Ok(img)
}

fn size_of(img: &DynamicImage) -> ImageSize {
    ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    }
}

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate.
/// Grayscale images are returned as [`GenericImage::Mono8`], images with an
/// alpha channel as [`GenericImage::Rgba8`] and everything else as
/// [`GenericImage::Rgb8`]. Deeper samples are reduced to 8 bits.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data, named after the file stem.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<GenericImage, IoError> {
    let file_path = file_path.as_ref();
    let img = decode_any(file_path)?;
    let size = size_of(&img);
    let color = img.color();
    let (name, extension) = source_of(file_path);

    let image = if !color.has_color() && !color.has_alpha() {
        GenericImage::Mono8(Image::new(size, img.into_luma8().into_raw())?.with_source(name, extension))
    } else if color.has_alpha() {
        GenericImage::Rgba8(Image::new(size, img.into_rgba8().into_raw())?.with_source(name, extension))
    } else {
        GenericImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?.with_source(name, extension))
    };

    Ok(image)
}

/// Reads any supported image as rgb8, converting other layouts.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Example
///
/// ```no_run
/// use imwarp_io::functional as F;
///
/// let image = F::read_image_any_rgb8("Image1.png").unwrap();
/// assert_eq!(image.name(), "Image1");
/// ```
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    let img = decode_any(file_path)?;
    let size = size_of(&img);
    let (name, extension) = source_of(file_path);
    Ok(Image::new(size, img.into_rgb8().into_raw())?.with_source(name, extension))
}

/// Reads any supported image as rgba8, adding an opaque alpha when missing.
pub fn read_image_any_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let file_path = file_path.as_ref();
    let img = decode_any(file_path)?;
    let size = size_of(&img);
    let (name, extension) = source_of(file_path);
    Ok(Image::new(size, img.into_rgba8().into_raw())?.with_source(name, extension))
}

/// Reads any supported image as mono8, converting color to luma.
pub fn read_image_any_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let file_path = file_path.as_ref();
    let img = decode_any(file_path)?;
    let size = size_of(&img);
    let (name, extension) = source_of(file_path);
    Ok(Image::new(size, img.into_luma8().into_raw())?.with_source(name, extension))
}

enum Encoding {
    Png,
    Jpeg,
}

fn encoding_of(file_path: &Path) -> Result<Encoding, IoError> {
    let ext = file_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok(Encoding::Png),
        "jpg" | "jpeg" => Ok(Encoding::Jpeg),
        _ => Err(IoError::EncodeError(format!(
            "unsupported output extension {:?} for {}",
            ext,
            file_path.display()
        ))),
    }
}

/// Writes an rgb8 image, choosing the encoding from the file extension.
///
/// `png` is written losslessly, `jpg` and `jpeg` with quality
/// [`DEFAULT_JPEG_QUALITY`].
///
/// # Errors
///
/// Returns [`IoError::EncodeError`] for any other extension.
pub fn write_image_rgb8(file_path: impl AsRef<Path>, image: &Image<u8, 3>) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    match encoding_of(file_path)? {
        Encoding::Png => write_image_png_rgb8(file_path, image),
        Encoding::Jpeg => write_image_jpeg_rgb8(file_path, image, DEFAULT_JPEG_QUALITY),
    }
}

/// Writes an rgba8 image, choosing the encoding from the file extension.
///
/// JPEG output drops the alpha channel.
pub fn write_image_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    match encoding_of(file_path)? {
        Encoding::Png => write_image_png_rgba8(file_path, image),
        Encoding::Jpeg => write_image_jpeg_rgba8(file_path, image, DEFAULT_JPEG_QUALITY),
    }
}

/// Writes a mono8 image, choosing the encoding from the file extension.
pub fn write_image_mono8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    match encoding_of(file_path)? {
        Encoding::Png => write_image_png_gray8(file_path, image),
        Encoding::Jpeg => write_image_jpeg_gray8(file_path, image, DEFAULT_JPEG_QUALITY),
    }
}

/// Writes a [`GenericImage`] in its own layout.
pub fn write_image(file_path: impl AsRef<Path>, image: &GenericImage) -> Result<(), IoError> {
    match image {
        GenericImage::Mono8(img) => write_image_mono8(file_path, img),
        GenericImage::Rgb8(img) => write_image_rgb8(file_path, img),
        GenericImage::Rgba8(img) => write_image_rgba8(file_path, img),
    }
}
