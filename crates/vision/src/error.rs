//! Upstream error taxonomy.

// ---------------------------------------------------------------------------
// Upstream categories
// ---------------------------------------------------------------------------

/// Closed set of user-facing upstream failure categories.
///
/// Messages are safe to show to the end user. Credential failures never
/// carry the upstream text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    #[error("Invalid Face++ API credentials")]
    InvalidCredentials,

    #[error(
        "No face detected in the image. Please ensure the image contains a clear face, \
         facing forward with good lighting."
    )]
    NoFaceDetected,

    #[error(
        "Image quality is not suitable for skin analysis. Please use a clearer image with a \
         single face, proper lighting, and frontal view."
    )]
    ImageQualityRejected,

    #[error("Image format not supported. Please use JPEG or PNG format.")]
    UnsupportedFormat,

    #[error("Image file is too large. Maximum allowed size is 2MB.")]
    FileTooLarge,

    #[error(
        "Image size does not meet requirements. Please use an image with dimensions between \
         48x48 and 4096x4096 pixels."
    )]
    InvalidDimensions,

    #[error(
        "Multiple faces detected. Please use an image with only one face for accurate skin \
         analysis."
    )]
    MultipleFacesRejected,

    #[error("Access to the Face++ API was denied. Check the API plan and concurrency limits.")]
    InsufficientPermission,

    #[error("Bad request to the Face++ API. Check image format and size.")]
    UpstreamBadRequest,

    #[error("The Face++ API is currently unavailable. Please try again later.")]
    UpstreamUnavailable,
}

/// Known upstream tokens, matched substring-wise against `error_message`.
/// Longer tokens come before their prefixes.
const ERROR_TOKENS: &[(&str, UpstreamError)] = &[
    ("INVALID_IMAGE_FACE_COUNT", UpstreamError::MultipleFacesRejected),
    ("IMAGE_ERROR_UNSUPPORTED_FORMAT", UpstreamError::UnsupportedFormat),
    ("CONCURRENCY_LIMIT_EXCEEDED", UpstreamError::InsufficientPermission),
    ("INSUFFICIENT_PERMISSION", UpstreamError::InsufficientPermission),
    ("AUTHORIZATION_ERROR", UpstreamError::InsufficientPermission),
    ("AUTHENTICATION_ERROR", UpstreamError::InvalidCredentials),
    ("IMAGE_FILE_TOO_LARGE", UpstreamError::FileTooLarge),
    ("INVALID_IMAGE_FACE", UpstreamError::ImageQualityRejected),
    ("INVALID_IMAGE_SIZE", UpstreamError::InvalidDimensions),
    ("NO_FACE_FOUND", UpstreamError::NoFaceDetected),
];

impl UpstreamError {
    /// Classify an upstream failure from its HTTP status and optional
    /// `error_message` field.
    ///
    /// Known tokens win; otherwise the status decides. A 2xx response that
    /// still carried an error sentinel is treated as a bad request.
    pub fn classify(status: u16, error_message: Option<&str>) -> Self {
        if let Some(message) = error_message {
            if let Some((_, category)) = ERROR_TOKENS
                .iter()
                .find(|(token, _)| message.contains(token))
            {
                return *category;
            }
        }

        match status {
            401 => Self::InvalidCredentials,
            403 => Self::InsufficientPermission,
            200..=499 => Self::UpstreamBadRequest,
            _ => Self::UpstreamUnavailable,
        }
    }

    /// HTTP status returned to the client.
    pub fn status(&self) -> u16 {
        match self {
            Self::InvalidCredentials => 401,
            Self::InsufficientPermission => 403,
            Self::UpstreamUnavailable => 500,
            _ => 400,
        }
    }

    /// Machine-readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NoFaceDetected => "NO_FACE_DETECTED",
            Self::ImageQualityRejected => "IMAGE_QUALITY_REJECTED",
            Self::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            Self::FileTooLarge => "FILE_TOO_LARGE",
            Self::InvalidDimensions => "INVALID_DIMENSIONS",
            Self::MultipleFacesRejected => "MULTIPLE_FACES",
            Self::InsufficientPermission => "INSUFFICIENT_PERMISSION",
            Self::UpstreamBadRequest => "UPSTREAM_BAD_REQUEST",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
        }
    }
}

// ---------------------------------------------------------------------------
// Gateway errors
// ---------------------------------------------------------------------------

/// Errors from one gateway call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Upstream answered with a recognised failure.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered 2xx with a body that is not a JSON object.
    #[error("Malformed upstream response: {0}")]
    Decode(String),

    /// Credentials missing or obviously invalid; nothing was sent.
    #[error("Vision API is misconfigured: {0}")]
    Misconfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_count_is_not_mistaken_for_face_quality() {
        assert_eq!(
            UpstreamError::classify(400, Some("INVALID_IMAGE_FACE_COUNT")),
            UpstreamError::MultipleFacesRejected
        );
        assert_eq!(
            UpstreamError::classify(400, Some("INVALID_IMAGE_FACE")),
            UpstreamError::ImageQualityRejected
        );
    }

    #[test]
    fn tokens_match_inside_longer_messages() {
        assert_eq!(
            UpstreamError::classify(400, Some("IMAGE_ERROR_UNSUPPORTED_FORMAT: image_base64")),
            UpstreamError::UnsupportedFormat
        );
        assert_eq!(
            UpstreamError::classify(200, Some("NO_FACE_FOUND")),
            UpstreamError::NoFaceDetected
        );
    }

    #[test]
    fn status_fallbacks() {
        assert_eq!(UpstreamError::classify(401, None), UpstreamError::InvalidCredentials);
        assert_eq!(
            UpstreamError::classify(403, Some("SOMETHING_NEW")),
            UpstreamError::InsufficientPermission
        );
        assert_eq!(
            UpstreamError::classify(400, Some("MISSING_ARGUMENTS: api_key")),
            UpstreamError::UpstreamBadRequest
        );
        assert_eq!(UpstreamError::classify(502, None), UpstreamError::UpstreamUnavailable);
        assert_eq!(UpstreamError::classify(200, Some("???")), UpstreamError::UpstreamBadRequest);
    }

    #[test]
    fn concurrency_limit_is_a_permission_error() {
        let err = UpstreamError::classify(403, Some("CONCURRENCY_LIMIT_EXCEEDED"));
        assert_eq!(err, UpstreamError::InsufficientPermission);
        assert_eq!(err.status(), 403);
    }

    #[test]
    fn statuses_stay_in_public_set() {
        let all = [
            UpstreamError::InvalidCredentials,
            UpstreamError::NoFaceDetected,
            UpstreamError::ImageQualityRejected,
            UpstreamError::UnsupportedFormat,
            UpstreamError::FileTooLarge,
            UpstreamError::InvalidDimensions,
            UpstreamError::MultipleFacesRejected,
            UpstreamError::InsufficientPermission,
            UpstreamError::UpstreamBadRequest,
            UpstreamError::UpstreamUnavailable,
        ];
        for err in all {
            assert!([400, 401, 403, 500].contains(&err.status()), "{err:?}");
        }
    }

    #[test]
    fn credential_message_is_generic() {
        let msg = UpstreamError::classify(401, Some("AUTHENTICATION_ERROR: api_key=abc")).to_string();
        assert_eq!(msg, "Invalid Face++ API credentials");
    }
}
