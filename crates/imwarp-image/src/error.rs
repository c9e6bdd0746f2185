/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match width * height * channels.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image has a zero width or height.
    #[error("Image size must be non-zero, got {0}x{1}")]
    ZeroSize(usize, usize),

    /// Error when the number of samples does not fit in `usize`.
    #[error("Image size {0}x{1} with {2} channels overflows the buffer length")]
    SizeOverflow(usize, usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index ({0}) is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a sample cannot be cast to the requested type.
    #[error("Failed to cast image data to {0}")]
    CastError(String),
}
