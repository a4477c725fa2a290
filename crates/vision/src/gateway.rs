//! Trait seam between the HTTP layer and the vision API.

use async_trait::async_trait;
use serde_json::Value;
use skinsight_core::types::AnalysisMode;

use crate::client::FaceppClient;
use crate::error::GatewayError;

/// Something that can turn an image into a raw analysis payload.
#[async_trait]
pub trait VisionGateway: Send + Sync {
    /// Issue one analysis request. No retries.
    async fn analyze(&self, image: &[u8], mode: AnalysisMode) -> Result<Value, GatewayError>;

    /// `true` when credentials are present and plausibly valid.
    fn is_configured(&self) -> bool;
}

#[async_trait]
impl VisionGateway for FaceppClient {
    async fn analyze(&self, image: &[u8], mode: AnalysisMode) -> Result<Value, GatewayError> {
        FaceppClient::analyze(self, image, mode).await
    }

    fn is_configured(&self) -> bool {
        self.credentials().is_configured()
    }
}
