use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use imwarp_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered by the size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Trait for image sample types.
///
/// Samples are read as `f32` during resampling and written back through
/// [`ImageDtype::from_f32`], which saturates to the range of the type.
pub trait ImageDtype: Copy + Default + Into<f32> + Send + Sync {
    /// Convert a f32 value to the image data type.
    fn from_f32(x: f32) -> Self;
}

impl ImageDtype for f32 {
    fn from_f32(x: f32) -> Self {
        x
    }
}

impl ImageDtype for u8 {
    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, 255.0) as u8
    }
}

impl ImageDtype for u16 {
    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, 65535.0) as u16
    }
}

/// Represents an image with pixel data.
///
/// The pixels are stored row-major with interleaved channels, i.e. the sample
/// of channel `c` at column `x` and row `y` lives at `(y * width + x) * C + c`.
///
/// Besides the pixels, an image carries the `name` and `extension` of the file
/// it was loaded from. Both are opaque to the processing functions and are
/// passed through unchanged to every transformed image.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
    name: String,
    extension: String,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Returns
    ///
    /// A new image with the given pixel data.
    ///
    /// # Errors
    ///
    /// If the size is zero or the length of the pixel data does not match the
    /// image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use imwarp_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        let len = Self::buffer_len(size)?;

        // check if the data length matches the image size
        if data.len() != len {
            return Err(ImageError::InvalidChannelShape(data.len(), len));
        }

        Ok(Self {
            size,
            data,
            name: String::new(),
            extension: String::new(),
        })
    }

    /// Create a new image with the given size and a constant pixel value.
    ///
    /// # Examples
    ///
    /// ```
    /// use imwarp_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 1>::from_size_val(
    ///   ImageSize {
    ///     width: 4,
    ///     height: 4,
    ///   }, 100u8).unwrap();
    ///
    /// assert!(image.as_slice().iter().all(|&v| v == 100));
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; Self::buffer_len(size)?];
        Image::new(size, data)
    }

    // number of samples for `size`, rejecting empty and overflowing sizes
    fn buffer_len(size: ImageSize) -> Result<usize, ImageError> {
        if size.is_empty() {
            return Err(ImageError::ZeroSize(size.width, size.height));
        }

        size.width
            .checked_mul(size.height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(ImageError::SizeOverflow(size.width, size.height, CHANNELS))
    }

    /// Attach the source metadata to the image.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the source, typically the file stem.
    /// * `extension` - The extension of the source file, without the dot.
    pub fn with_source(mut self, name: impl Into<String>, extension: impl Into<String>) -> Self {
        self.name = name.into();
        self.extension = extension.into();
        self
    }

    /// The name of the source the image was created from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The extension of the source file the image was created from.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// The pixel data as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The pixel data as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get a sample by `[row, col, channel]` index, or `None` if out of bounds.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [y, x, c] = index;
        if x >= self.width() || y >= self.height() || c >= CHANNELS {
            return None;
        }
        self.data.get((y * self.width() + x) * CHANNELS + c)
    }

    /// Get the pixel data of the image.
    ///
    /// # Arguments
    ///
    /// * `x` - The x-coordinate of the pixel.
    /// * `y` - The y-coordinate of the pixel.
    /// * `ch` - The channel index of the pixel.
    ///
    /// # Returns
    ///
    /// The pixel value at the given coordinates.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<&T, ImageError> {
        self.check_index(x, y, ch)?;
        Ok(&self.data[(y * self.width() + x) * CHANNELS + ch])
    }

    /// Set the pixel data of the image.
    ///
    /// # Arguments
    ///
    /// * `x` - The x-coordinate of the pixel.
    /// * `y` - The y-coordinate of the pixel.
    /// * `ch` - The channel index of the pixel.
    /// * `val` - The value to set.
    pub fn set_pixel(&mut self, x: usize, y: usize, ch: usize, val: T) -> Result<(), ImageError> {
        self.check_index(x, y, ch)?;
        let idx = (y * self.width() + x) * CHANNELS + ch;
        self.data[idx] = val;
        Ok(())
    }

    fn check_index(&self, x: usize, y: usize, ch: usize) -> Result<(), ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }

        if ch >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, CHANNELS));
        }

        Ok(())
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// The source metadata is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use imwarp_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 1>::new([2, 1].into(), vec![0u8, 255]).unwrap();
    /// let image_f32 = image.cast::<f32>().unwrap();
    ///
    /// assert_eq!(image_f32.as_slice(), &[0.0f32, 255.0]);
    /// ```
    pub fn cast<U>(&self) -> Result<Image<U, CHANNELS>, ImageError>
    where
        U: num_traits::NumCast,
        T: num_traits::NumCast + Copy,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| {
                U::from(x).ok_or_else(|| ImageError::CastError(std::any::type_name::<U>().into()))
            })
            .collect::<Result<Vec<U>, ImageError>>()?;

        Ok(Image::new(self.size, casted_data)?.with_source(&self.name, &self.extension))
    }
}

#[cfg(test)]
mod tests {
    use crate::image::{Image, ImageError, ImageSize};

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.width, 10);
        assert_eq!(image_size.height, 20);
        assert_eq!(image_size.area(), 200);
        assert!(!image_size.is_empty());
    }

    #[test]
    fn image_smoke() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 10,
                height: 20,
            },
            vec![0u8; 10 * 20 * 3],
        )?;
        assert_eq!(image.size().width, 10);
        assert_eq!(image.size().height, 20);
        assert_eq!(image.num_channels(), 3);
        assert_eq!(image.name(), "");
        assert_eq!(image.extension(), "");

        Ok(())
    }

    #[test]
    fn image_invalid_length() {
        let res = Image::<u8, 3>::new([2, 2].into(), vec![0u8; 11]);
        assert_eq!(res, Err(ImageError::InvalidChannelShape(11, 12)));
    }

    #[test]
    fn image_zero_size() {
        let res = Image::<u8, 1>::new([0, 4].into(), vec![]);
        assert_eq!(res, Err(ImageError::ZeroSize(0, 4)));
    }

    #[test]
    fn image_size_overflow() {
        let res = Image::<u8, 1>::new([usize::MAX, 2].into(), vec![0u8; 2]);
        assert_eq!(res, Err(ImageError::SizeOverflow(usize::MAX, 2, 1)));

        let res = Image::<u8, 3>::from_size_val([3, usize::MAX / 2].into(), 0);
        assert_eq!(res, Err(ImageError::SizeOverflow(3, usize::MAX / 2, 3)));
    }

    #[test]
    fn image_get_set_pixel() -> Result<(), ImageError> {
        let mut image = Image::<u8, 3>::from_size_val([2, 3].into(), 0)?;
        image.set_pixel(1, 2, 2, 42)?;

        assert_eq!(image.get_pixel(1, 2, 2)?, &42);
        assert_eq!(image.get([2, 1, 2]), Some(&42));
        assert_eq!(image.as_slice()[(2 * 2 + 1) * 3 + 2], 42);

        assert_eq!(
            image.get_pixel(2, 0, 0),
            Err(ImageError::PixelIndexOutOfBounds(2, 0, 2, 3))
        );
        assert_eq!(
            image.get_pixel(0, 0, 3),
            Err(ImageError::ChannelIndexOutOfBounds(3, 3))
        );
        assert_eq!(image.get([3, 0, 0]), None);

        Ok(())
    }

    #[test]
    fn image_cast_keeps_source() -> Result<(), ImageError> {
        let data = vec![0, 1, 2, 3, 4, 5];
        let image_u8 = Image::<u8, 3>::new(
            ImageSize {
                height: 2,
                width: 1,
            },
            data,
        )?
        .with_source("Image1", "png");
        assert_eq!(image_u8.get([1, 0, 2]), Some(&5u8));

        let image_f32: Image<f32, 3> = image_u8.cast()?;
        assert_eq!(image_f32.get([1, 0, 2]), Some(&5.0f32));
        assert_eq!(image_f32.name(), "Image1");
        assert_eq!(image_f32.extension(), "png");

        Ok(())
    }

    #[test]
    fn clone_is_independent() -> Result<(), ImageError> {
        let original = Image::<u8, 1>::from_size_val([2, 2].into(), 7)?;
        let mut copy = original.clone();
        copy.set_pixel(0, 0, 0, 9)?;

        assert_eq!(original.get_pixel(0, 0, 0)?, &7);
        assert_eq!(copy.get_pixel(0, 0, 0)?, &9);

        Ok(())
    }

    #[test]
    fn dtype_from_f32_saturates() {
        use crate::ImageDtype;
        assert_eq!(<u8 as ImageDtype>::from_f32(-3.2), 0);
        assert_eq!(<u8 as ImageDtype>::from_f32(254.6), 255);
        assert_eq!(<u8 as ImageDtype>::from_f32(300.0), 255);
        assert_eq!(<u8 as ImageDtype>::from_f32(99.5), 100);
        assert_eq!(<f32 as ImageDtype>::from_f32(-3.25), -3.25);
    }
}
