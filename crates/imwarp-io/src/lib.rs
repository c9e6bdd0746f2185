#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for missing files, encoding and
/// decoding failures.
pub mod error;

/// High-level image reading and writing functions.
///
/// The format is guessed from the file content when reading and inferred from
/// the file extension when writing. See [`functional::read_image_any`].
pub mod functional;

/// JPEG image encoding and decoding.
///
/// Pure Rust JPEG codec for reading and writing JPEG images.
pub mod jpeg;

/// PNG image encoding and decoding.
///
/// Read and write 8-bit PNG images.
pub mod png;

pub use crate::error::IoError;

use std::path::Path;

// name and extension recorded on loaded images
pub(crate) fn source_of(file_path: &Path) -> (String, String) {
    let name = file_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = file_path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (name, extension)
}

// verify the file exists before handing it to a decoder
pub(crate) fn ensure_exists(file_path: &Path) -> Result<(), IoError> {
    if !file_path.exists() {
        return Err(IoError::NotFound(file_path.to_path_buf()));
    }
    Ok(())
}
