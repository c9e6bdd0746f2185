/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    NotFound(std::path::PathBuf),

    /// The file extension does not match the requested format.
    #[error("File does not have a valid extension: {0}")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open, read or write the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode the image, unsupported format or corrupt data.
    #[error("Failed to decode the image. {0}")]
    DecodeError(String),

    /// Error to encode the image, unsupported extension or codec failure.
    #[error("Failed to encode the image. {0}")]
    EncodeError(String),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] imwarp_image::ImageError),
}
