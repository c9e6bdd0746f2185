use crate::{ensure_exists, error::IoError, functional::decode_any, source_of};
use imwarp_image::{Image, ImageSize};
use jpeg_encoder::{ColorType, Encoder};
use std::{fs, path::Path};

/// Quality used when the encoding is inferred from the file extension.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Writes the given JPEG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image containing the JPEG image data
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
pub fn write_image_jpeg_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    write_image_jpeg_imp(file_path, image, ColorType::Rgb, quality)
}

/// Writes the given JPEG _(rgba8)_ data to the given file path, dropping alpha.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image containing the JPEG image data
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
pub fn write_image_jpeg_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
    quality: u8,
) -> Result<(), IoError> {
    write_image_jpeg_imp(file_path, image, ColorType::Rgba, quality)
}

/// Writes the given JPEG _(grayscale)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image containing the JPEG image data
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
pub fn write_image_jpeg_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
    quality: u8,
) -> Result<(), IoError> {
    write_image_jpeg_imp(file_path, image, ColorType::Luma, quality)
}

fn write_image_jpeg_imp<const N: usize>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, N>,
    color_type: ColorType,
    quality: u8,
) -> Result<(), IoError> {
    let image_size = image.size();
    if image_size.width > u16::MAX as usize || image_size.height > u16::MAX as usize {
        return Err(IoError::EncodeError(format!(
            "{} exceeds the jpeg limit of {} pixels per side",
            image_size,
            u16::MAX
        )));
    }

    let encoder =
        Encoder::new_file(file_path, quality).map_err(|e| IoError::EncodeError(e.to_string()))?;
    encoder
        .encode(
            image.as_slice(),
            image_size.width as u16,
            image_size.height as u16,
            color_type,
        )
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}

/// Read a JPEG image with three channels _(rgb8)_.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG file.
///
/// # Returns
///
/// A RGB image with three channels _(rgb8)_.
pub fn read_image_jpeg_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    check_jpeg_path(file_path)?;

    let jpeg_data = fs::read(file_path)?;
    let mut decoder = zune_jpeg::JpegDecoder::new(jpeg_data.as_slice());
    decoder
        .decode_headers()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let image_info = decoder.info().ok_or_else(|| {
        IoError::DecodeError(String::from("Failed to find image info from its metadata"))
    })?;

    let image_size = ImageSize {
        width: image_info.width as usize,
        height: image_info.height as usize,
    };

    let img_data = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    if img_data.len() != image_size.area() * 3 {
        return Err(IoError::DecodeError(format!(
            "expected rgb8 samples for {}, got {} bytes",
            image_size,
            img_data.len()
        )));
    }
    log::debug!("decoded jpeg {} ({})", file_path.display(), image_size);

    let (name, extension) = source_of(file_path);
    Ok(Image::new(image_size, img_data)?.with_source(name, extension))
}

/// Read a JPEG image with a single channel _(mono8)_.
///
/// Color JPEGs are converted to luma.
pub fn read_image_jpeg_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let file_path = file_path.as_ref();
    check_jpeg_path(file_path)?;

    let img = decode_any(file_path)?;
    let image_size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let (name, extension) = source_of(file_path);
    Ok(Image::new(image_size, img.into_luma8().into_raw())?.with_source(name, extension))
}

// verify the file exists and is a JPEG
fn check_jpeg_path(file_path: &Path) -> Result<(), IoError> {
    ensure_exists(file_path)?;

    if !file_path.extension().is_some_and(|ext| {
        ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg")
    }) {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_jpeg() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("Image2.jpeg");

        let image = Image::<u8, 3>::from_size_val([32, 24].into(), 120)?;
        write_image_jpeg_rgb8(&file_path, &image, 100)?;
        assert!(file_path.exists(), "File does not exist: {:?}", file_path);

        let image_back = read_image_jpeg_rgb8(&file_path)?;
        assert_eq!(image_back.cols(), 32);
        assert_eq!(image_back.rows(), 24);
        assert_eq!(image_back.num_channels(), 3);
        assert_eq!(image_back.name(), "Image2");
        assert_eq!(image_back.extension(), "jpeg");

        // lossy, but a flat image stays close to its value
        assert!(image_back
            .as_slice()
            .iter()
            .all(|&v| (v as i32 - 120).abs() <= 3));

        Ok(())
    }

    #[test]
    fn read_write_jpeg_gray() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray.jpg");

        let image = Image::<u8, 1>::from_size_val([20, 10].into(), 60)?;
        write_image_jpeg_gray8(&file_path, &image, 95)?;

        let image_back = read_image_jpeg_mono8(&file_path)?;
        assert_eq!(image_back.size(), image.size());
        assert!(image_back
            .as_slice()
            .iter()
            .all(|&v| (v as i32 - 60).abs() <= 3));

        Ok(())
    }

    #[test]
    fn read_jpeg_wrong_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("image.png");
        fs::write(&file_path, [0u8; 4])?;

        assert!(matches!(
            read_image_jpeg_mono8(&file_path),
            Err(IoError::InvalidFileExtension(_))
        ));
        Ok(())
    }

    #[test]
    fn read_jpeg_missing() {
        assert!(matches!(
            read_image_jpeg_rgb8("missing.jpg"),
            Err(IoError::NotFound(_))
        ));
    }

    #[test]
    fn read_jpeg_corrupt() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("corrupt.jpg");
        fs::write(&file_path, [0u8, 1, 2, 3, 4, 5])?;

        assert!(matches!(
            read_image_jpeg_rgb8(&file_path),
            Err(IoError::DecodeError(_))
        ));
        Ok(())
    }
}
