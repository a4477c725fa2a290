//! Local image validation, run before anything is sent upstream.
//!
//! Checks, in order: a file was supplied, the declared content type is JPEG
//! or PNG, the file is not empty, it fits in [`MAX_IMAGE_BYTES`], and its
//! magic bytes agree with the declared type.

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest accepted upload (2 MiB).
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";

/// Content types accepted from the client.
pub const VALID_MIME_TYPES: &[&str] = &[MIME_JPEG, MIME_PNG];

pub const MSG_NO_IMAGE: &str = "No image file provided";
pub const MSG_INVALID_TYPE: &str = "Invalid file type. Only JPEG and PNG files are allowed.";
pub const MSG_EMPTY: &str = "Failed to process image. Please try a different image.";
pub const MSG_TOO_LARGE: &str = "File size too large. Maximum allowed size is 2MB.";
pub const MSG_CONTENT_MISMATCH: &str =
    "File content does not match its declared type. Only JPEG and PNG files are allowed.";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Accepted image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Map a declared content type. Parameters (`; charset=...`) are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        if !VALID_MIME_TYPES.contains(&essence.as_str()) {
            return None;
        }
        [Self::Jpeg, Self::Png]
            .into_iter()
            .find(|format| format.mime() == essence)
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => MIME_JPEG,
            Self::Png => MIME_PNG,
        }
    }

    fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Png => Some(Self::Png),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an uploaded image.
///
/// `bytes` is `None` when the request carried no image part. `declared_mime`
/// is the part's content type, if any.
pub fn validate_image(
    bytes: Option<&[u8]>,
    declared_mime: Option<&str>,
) -> Result<ImageFormat, CoreError> {
    let bytes = bytes.ok_or_else(|| CoreError::validation(MSG_NO_IMAGE))?;

    let declared = declared_mime
        .and_then(ImageFormat::from_mime)
        .ok_or_else(|| CoreError::validation(MSG_INVALID_TYPE))?;

    if bytes.is_empty() {
        return Err(CoreError::validation(MSG_EMPTY));
    }

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(CoreError::validation(MSG_TOO_LARGE));
    }

    match ImageFormat::sniff(bytes) {
        Some(actual) if actual == declared => Ok(actual),
        Some(_) => Err(CoreError::validation(MSG_CONTENT_MISMATCH)),
        None => Err(CoreError::validation(MSG_INVALID_TYPE)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
