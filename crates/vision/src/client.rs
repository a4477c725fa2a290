//! REST client for the two Face++ endpoints.
//!
//! Basic mode posts to `/facepp/v3/detect` with a broad attribute list;
//! advanced mode posts to `/facepp/v1/skinanalyze`. Both take a
//! form-encoded body with the key pair and a base64 image.

use base64::Engine as _;
use serde_json::Value;
use skinsight_core::hashing::sha256_hex;
use skinsight_core::types::AnalysisMode;

use crate::error::{GatewayError, UpstreamError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://api-us.faceplusplus.com";

pub const DETECT_PATH: &str = "/facepp/v3/detect";
pub const SKIN_ANALYZE_PATH: &str = "/facepp/v1/skinanalyze";

/// Attributes requested from the detection endpoint in basic mode.
pub const BASIC_RETURN_ATTRIBUTES: &str =
    "skinstatus,gender,age,emotion,beauty,headpose,facequality,blur,eyestatus,mouthstatus";

/// Dense landmark set (`2` = 106 points).
pub const BASIC_RETURN_LANDMARK: &str = "2";

/// Shortest key or secret accepted as plausibly real.
pub const MIN_CREDENTIAL_LEN: usize = 10;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// API key pair. `Debug` never prints the values.
#[derive(Clone, Default)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Check the key pair looks usable. Runs before every request.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.api_key.len() < MIN_CREDENTIAL_LEN || self.api_secret.len() < MIN_CREDENTIAL_LEN {
            return Err(GatewayError::Misconfigured(
                "Invalid Face++ API credentials format. Please check your environment variables."
                    .into(),
            ));
        }
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.validate().is_ok()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Face++ API.
#[derive(Debug, Clone)]
pub struct FaceppClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl FaceppClient {
    /// * `base_url` - e.g. `https://api-us.faceplusplus.com`, no trailing slash.
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, credentials)
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Full endpoint URL for `mode`.
    pub fn endpoint(&self, mode: AnalysisMode) -> String {
        let path = match mode {
            AnalysisMode::Basic => DETECT_PATH,
            AnalysisMode::Advanced => SKIN_ANALYZE_PATH,
        };
        format!("{}{}", self.base_url, path)
    }

    /// Send one analysis request and return the raw payload.
    ///
    /// The image must already have passed local validation.
    pub async fn analyze(&self, image: &[u8], mode: AnalysisMode) -> Result<Value, GatewayError> {
        self.credentials.validate()?;

        let url = self.endpoint(mode);
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(image);
        let form = form_fields(&self.credentials, mode, image_base64);

        tracing::info!(
            mode = mode.as_str(),
            endpoint = %url,
            bytes = image.len(),
            sha256 = %sha256_hex(image),
            "Sending image to vision API"
        );

        let response = self.client.post(&url).form(&form).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status, body_len = body.len(), "Vision API responded");

        let payload = Self::ensure_success(status, &body)?;
        Self::parse_response(mode, payload)
    }

    // ---- private helpers ----

    /// Map a non-2xx status or an in-body `error_message` to an
    /// [`UpstreamError`]. Returns the decoded JSON body on success.
    fn ensure_success(status: u16, body: &str) -> Result<Value, GatewayError> {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let error_message = parsed
            .as_ref()
            .and_then(|v| v.get("error_message"))
            .and_then(Value::as_str);

        let success = (200..300).contains(&status);
        if !success || error_message.is_some() {
            let category = UpstreamError::classify(status, error_message);
            tracing::warn!(
                status,
                upstream_error = error_message.unwrap_or("<none>"),
                code = category.code(),
                "Vision API rejected the request"
            );
            return Err(category.into());
        }

        parsed.ok_or_else(|| GatewayError::Decode("response body is not valid JSON".into()))
    }

    /// Check the payload has the shape `mode` expects.
    fn parse_response(mode: AnalysisMode, payload: Value) -> Result<Value, GatewayError> {
        if !payload.is_object() {
            return Err(GatewayError::Decode("response body is not a JSON object".into()));
        }

        if mode == AnalysisMode::Basic {
            let face_count = payload
                .get("faces")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            if face_count == 0 {
                tracing::warn!("Detection returned no faces");
                return Err(UpstreamError::NoFaceDetected.into());
            }
        }

        Ok(payload)
    }
}

/// Form body for one request.
pub fn form_fields(
    credentials: &Credentials,
    mode: AnalysisMode,
    image_base64: String,
) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("api_key", credentials.api_key.clone()),
        ("api_secret", credentials.api_secret.clone()),
        ("image_base64", image_base64),
    ];
    if mode == AnalysisMode::Basic {
        fields.push(("return_attributes", BASIC_RETURN_ATTRIBUTES.to_string()));
        fields.push(("return_landmark", BASIC_RETURN_LANDMARK.to_string()));
    }
    fields
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
