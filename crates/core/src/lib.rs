//! Skin-analysis core: turns a raw vision-API payload into a normalized,
//! scored and annotated result envelope. No I/O.

pub mod envelope;
pub mod error;
pub mod hashing;
pub mod labels;
pub mod normalize;
pub mod quality;
pub mod reading;
pub mod recommendations;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod types;
pub mod upload;

use serde_json::Value;

use crate::envelope::AnalysisEnvelope;
use crate::types::AnalysisMode;

/// Run the full pipeline on a raw upstream payload: normalize, score,
/// recommend and wrap.
pub fn analyze(raw: &Value, mode: AnalysisMode) -> AnalysisEnvelope {
    let normalized = normalize::normalize(raw, mode);
    let health = scoring::aggregate_health(&normalized.attributes);
    let categories = scoring::category_scores(&normalized.attributes);
    let recommendations = recommendations::recommend(&normalized.attributes);
    envelope::envelope(normalized, health, categories, recommendations)
}
