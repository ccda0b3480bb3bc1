//! Profile photo upload → `data:` URI stored inline in the CV record.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Uploads above this size are refused before encoding.
pub const MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhotoError {
    #[error("Please upload an image file (got '{0}')")]
    NotAnImage(String),

    #[error("Image size should not exceed 2MB (got {size} bytes)")]
    TooLarge { size: usize },

    #[error("Uploaded image is empty")]
    Empty,
}

/// Encodes raw image bytes as a base64 data URI after checking type and size.
pub fn encode_data_uri(bytes: &[u8], content_type: &str) -> Result<String, PhotoError> {
    let content_type = content_type.trim().to_ascii_lowercase();
    if !content_type.starts_with("image/") {
        return Err(PhotoError::NotAnImage(content_type));
    }
    if bytes.is_empty() {
        return Err(PhotoError::Empty);
    }
    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(PhotoError::TooLarge { size: bytes.len() });
    }
    Ok(format!("data:{content_type};base64,{}", STANDARD.encode(bytes)))
}
