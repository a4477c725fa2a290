//! Versioned, mode-tagged result envelope.
//!
//! The envelope has the same shape for both modes; consumers branch only on
//! [`AnalysisEnvelope::mode`]. It carries no timestamp, so building it twice
//! from the same payload serializes to identical JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::labels::{EyelidType, SkinType};
use crate::normalize::{AttributeMap, FaceDetails, NormalizedAnalysis};
use crate::recommendations::Recommendation;
use crate::scoring::CategoryScore;
use crate::types::{AnalysisMode, AttributeId, AttributeReading, ReadingOrigin};

/// Current envelope schema version.
pub const ENVELOPE_VERSION: &str = "v1";

pub type ReadingMap = BTreeMap<AttributeId, AttributeReading>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisEnvelope {
    pub version: String,
    pub mode: AnalysisMode,
    /// Normalized readings keyed by attribute name.
    pub result: ReadingMap,
    pub health_score: u8,
    pub categories: Vec<CategoryScore>,
    pub recommendations: Vec<Recommendation>,
    pub skin_analysis: SkinAnalysis,
    pub skin_confidence: BTreeMap<AttributeId, Option<f64>>,
    pub demographics: Value,
    pub emotion: Value,
    pub emotion_confidence: Value,
    pub beauty: Value,
    #[serde(flatten)]
    pub face: FaceDetails,
    pub warnings: Vec<String>,
    pub quality_tips: Vec<String>,
}

/// Readings grouped for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinAnalysis {
    pub eyelids: ReadingMap,
    pub eye_area: ReadingMap,
    pub wrinkles: ReadingMap,
    pub pores: ReadingMap,
    pub skin_issues: ReadingMap,
    pub skin_type: Option<SkinTypeView>,
    /// Labelled eyelid codes, `None` unless the mode supplies both eyes.
    pub eyelid_types: Option<EyelidView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinTypeView {
    pub code: f64,
    pub label: SkinType,
    pub confidence: Option<f64>,
}

/// Eyelid codes with their labels, for renderers that show both eyes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyelidView {
    pub left: EyelidType,
    pub right: EyelidType,
}

impl EyelidView {
    fn from_attrs(attrs: &AttributeMap) -> Option<Self> {
        let label = |r: &AttributeReading| match r.origin {
            ReadingOrigin::Upstream => EyelidType::from_code(r.value),
            ReadingOrigin::Defaulted => EyelidType::Unknown,
        };
        Some(Self {
            left: label(attrs.get(AttributeId::LeftEyelids)?),
            right: label(attrs.get(AttributeId::RightEyelids)?),
        })
    }
}

/// Wrap a normalized analysis with its derived scores and advice.
pub fn envelope(
    normalized: NormalizedAnalysis,
    health_score: u8,
    categories: Vec<CategoryScore>,
    recommendations: Vec<Recommendation>,
) -> AnalysisEnvelope {
    let NormalizedAnalysis {
        mode,
        attributes,
        demographics,
        emotion,
        beauty,
        face,
        warnings,
        quality_tips,
    } = normalized;

    let skin_analysis = group(&attributes);
    let skin_confidence = attributes
        .readings()
        .iter()
        .map(|(id, r)| (*id, r.confidence))
        .collect();
    let emotion_confidence = rescale_percentages(&emotion);

    AnalysisEnvelope {
        version: ENVELOPE_VERSION.to_string(),
        mode,
        result: attributes.into_readings(),
        health_score,
        categories,
        recommendations,
        skin_analysis,
        skin_confidence,
        demographics,
        emotion,
        emotion_confidence,
        beauty,
        face,
        warnings,
        quality_tips,
    }
}

/// Group readings into the display sections. Each section only holds
/// attributes present in the map.
pub fn group(attrs: &AttributeMap) -> SkinAnalysis {
    use AttributeId as A;

    let pick = |ids: &[AttributeId]| -> ReadingMap {
        ids.iter()
            .filter_map(|id| attrs.get(*id).map(|r| (*id, r.clone())))
            .collect()
    };

    SkinAnalysis {
        eyelids: pick(&[A::LeftEyelids, A::RightEyelids]),
        eye_area: pick(&[A::EyePouch, A::DarkCircle]),
        wrinkles: pick(&A::WRINKLES),
        pores: pick(&A::PORES),
        skin_issues: pick(&[A::Blackhead, A::Acne, A::Mole, A::Stain]),
        skin_type: attrs.get(A::SkinType).map(|r| SkinTypeView {
            code: r.value,
            label: match r.origin {
                ReadingOrigin::Upstream => SkinType::from_code(r.value),
                ReadingOrigin::Defaulted => SkinType::Unknown,
            },
            confidence: r.confidence,
        }),
        eyelid_types: EyelidView::from_attrs(attrs),
    }
}

/// Upstream emotion percentages (0-100) as fractions in `[0, 1]`.
fn rescale_percentages(emotion: &Value) -> Value {
    let Some(obj) = emotion.as_object() else {
        return Value::Object(Map::new());
    };
    let scaled = obj
        .iter()
        .filter_map(|(k, v)| {
            let pct = v.as_f64()?;
            serde_json::Number::from_f64(pct / 100.0).map(|n| (k.clone(), Value::Number(n)))
        })
        .collect();
    Value::Object(scaled)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
