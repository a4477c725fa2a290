//! Response body types for the analysis endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use skinsight_core::envelope::AnalysisEnvelope;

/// Successful analysis response: the envelope plus the time it was produced.
///
/// The timestamp lives outside the envelope so the envelope stays a pure
/// function of the upstream payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub envelope: AnalysisEnvelope,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResponse {
    pub fn new(envelope: AnalysisEnvelope) -> Self {
        Self {
            envelope,
            analyzed_at: Utc::now(),
        }
    }
}
