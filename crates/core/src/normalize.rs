//! Attribute normalizer.
//!
//! Turns a raw upstream payload into a [`NormalizedAnalysis`] whose attribute
//! map contains every attribute the mode is expected to supply. A bad field
//! degrades to the default reading for that attribute only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::quality;
use crate::reading::{self, RawReading};
use crate::types::{AnalysisMode, AttributeId, AttributeReading, AttributeScale, ReadingOrigin};

// ---------------------------------------------------------------------------
// Attribute map
// ---------------------------------------------------------------------------

/// Normalized readings for one analysis, tagged with the mode that produced
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeMap {
    mode: AnalysisMode,
    readings: BTreeMap<AttributeId, AttributeReading>,
}

impl AttributeMap {
    /// Build a map from readings. Attributes the mode expects but that are
    /// not in `readings` are filled with defaults.
    pub fn new(
        mode: AnalysisMode,
        readings: impl IntoIterator<Item = AttributeReading>,
    ) -> Self {
        let mut map: BTreeMap<_, _> = readings.into_iter().map(|r| (r.name, r)).collect();
        for id in mode.expected_attributes() {
            map.entry(id)
                .or_insert_with(|| AttributeReading::defaulted(id));
        }
        Self {
            mode,
            readings: map,
        }
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn get(&self, id: AttributeId) -> Option<&AttributeReading> {
        self.readings.get(&id)
    }

    /// Value of `id`, `0.0` if the attribute is not in the map.
    pub fn value(&self, id: AttributeId) -> f64 {
        self.get(id).map_or(0.0, |r| r.value)
    }

    pub fn readings(&self) -> &BTreeMap<AttributeId, AttributeReading> {
        &self.readings
    }

    pub fn into_readings(self) -> BTreeMap<AttributeId, AttributeReading> {
        self.readings
    }
}

// ---------------------------------------------------------------------------
// Normalized analysis
// ---------------------------------------------------------------------------

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAnalysis {
    pub mode: AnalysisMode,
    pub attributes: AttributeMap,
    /// `{ age, gender }` in basic mode; empty object otherwise.
    pub demographics: Value,
    pub emotion: Value,
    pub beauty: Value,
    pub face: FaceDetails,
    pub warnings: Vec<String>,
    pub quality_tips: Vec<String>,
}

/// Detection sections copied unchanged from the first face (basic mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetails {
    pub face_token: Option<String>,
    pub face_rectangle: Value,
    pub landmark: Value,
    pub smile: Value,
    pub blur: Value,
    pub eyestatus: Value,
    pub facequality: Value,
    pub mouthstatus: Value,
    pub eyegaze: Value,
    pub headpose: Value,
}

impl Default for FaceDetails {
    fn default() -> Self {
        Self {
            face_token: None,
            face_rectangle: Value::Null,
            landmark: empty_object(),
            smile: empty_object(),
            blur: empty_object(),
            eyestatus: empty_object(),
            facequality: empty_object(),
            mouthstatus: empty_object(),
            eyegaze: empty_object(),
            headpose: empty_object(),
        }
    }
}

impl FaceDetails {
    fn from_face(face: &Value) -> Self {
        let attrs = face.get("attributes");
        let section = |key: &str| object_or_empty(attrs.and_then(|a| a.get(key)));
        Self {
            face_token: face
                .get("face_token")
                .and_then(Value::as_str)
                .map(str::to_string),
            face_rectangle: face.get("face_rectangle").cloned().unwrap_or(Value::Null),
            landmark: object_or_empty(face.get("landmark")),
            smile: section("smile"),
            blur: section("blur"),
            eyestatus: section("eyestatus"),
            facequality: section("facequality"),
            mouthstatus: section("mouthstatus"),
            eyegaze: section("eyegaze"),
            headpose: section("headpose"),
        }
    }
}

/// Normalize a raw upstream payload. Never fails.
pub fn normalize(raw: &Value, mode: AnalysisMode) -> NormalizedAnalysis {
    let face_attributes = primary_face(raw).and_then(|face| face.get("attributes"));
    let skin = skin_section(raw, mode);

    let readings = mode
        .expected_attributes()
        .map(|id| read_attribute(skin, id, mode));
    let attributes = AttributeMap::new(mode, readings);

    let (demographics, emotion, beauty) = match (mode, face_attributes) {
        (AnalysisMode::Basic, Some(attrs)) => (
            lift_demographics(attrs),
            object_or_empty(attrs.get("emotion")),
            object_or_empty(attrs.get("beauty")),
        ),
        _ => (empty_object(), empty_object(), empty_object()),
    };

    let face = match mode {
        AnalysisMode::Basic => primary_face(raw).map(FaceDetails::from_face).unwrap_or_default(),
        AnalysisMode::Advanced => FaceDetails::default(),
    };

    let headpose = face_attributes
        .and_then(|attrs| attrs.get("headpose"))
        .or_else(|| raw.get("headpose"));
    let warnings = quality::collect_warnings(raw.get("warning"), headpose);
    let quality_tips = quality::quality_tips(&warnings);

    NormalizedAnalysis {
        mode,
        attributes,
        demographics,
        emotion,
        beauty,
        face,
        warnings,
        quality_tips,
    }
}

/// First detected face of a detection payload (`faces[0]`).
pub fn primary_face(raw: &Value) -> Option<&Value> {
    raw.get("faces")?.as_array()?.first()
}

/// Object holding the skin attributes for `mode`.
///
/// Basic: `faces[0].attributes.skinstatus`. Advanced: `result`.
pub fn skin_section(raw: &Value, mode: AnalysisMode) -> Option<&Map<String, Value>> {
    let section = match mode {
        AnalysisMode::Basic => primary_face(raw)?.get("attributes")?.get("skinstatus")?,
        AnalysisMode::Advanced => raw.get("result")?,
    };
    section.as_object()
}

fn read_attribute(
    skin: Option<&Map<String, Value>>,
    id: AttributeId,
    mode: AnalysisMode,
) -> AttributeReading {
    let field = skin.and_then(|s| s.get(id.upstream_key(mode)));
    let raw = reading::resolve(field);

    if let RawReading::Malformed(reason) = raw {
        tracing::debug!(attribute = %id, reason, "Upstream field unusable, using default");
    }

    match raw.parts() {
        Some((value, confidence)) => canonicalize(id, mode, value, confidence),
        None if id == AttributeId::Wrinkle => wrinkle_composite(skin, mode),
        None => AttributeReading::defaulted(id),
    }
}

/// Apply the attribute's scale to a resolved value.
fn canonicalize(
    id: AttributeId,
    mode: AnalysisMode,
    value: f64,
    confidence: Option<f64>,
) -> AttributeReading {
    let value = match id.scale(mode) {
        Some(AttributeScale::Flag) => reading::canonical_flag(value),
        Some(AttributeScale::Category) => value.round(),
        _ => value,
    };
    AttributeReading {
        name: id,
        value,
        confidence,
        origin: ReadingOrigin::Upstream,
    }
}

/// Composite wrinkle severity derived from the five wrinkle sub-flags:
/// `100 * set / 5`. Defaults when none of the sub-flags is present.
fn wrinkle_composite(skin: Option<&Map<String, Value>>, mode: AnalysisMode) -> AttributeReading {
    let subs: Vec<(f64, Option<f64>)> = AttributeId::WRINKLES
        .iter()
        .filter_map(|id| reading::resolve(skin.and_then(|s| s.get(id.upstream_key(mode)))).parts())
        .collect();

    if subs.is_empty() {
        return AttributeReading::defaulted(AttributeId::Wrinkle);
    }

    let set: f64 = subs.iter().map(|(v, _)| reading::canonical_flag(*v)).sum();
    // Max over set sub-flags, matching the advanced wrinkle recommendation.
    let confidence = subs
        .iter()
        .filter(|(v, _)| reading::canonical_flag(*v) == 1.0)
        .filter_map(|(_, c)| *c)
        .fold(None, |acc: Option<f64>, c| Some(acc.map_or(c, |m| m.max(c))));

    AttributeReading {
        name: AttributeId::Wrinkle,
        value: 100.0 * set / AttributeId::WRINKLES.len() as f64,
        confidence,
        origin: ReadingOrigin::Upstream,
    }
}

fn lift_demographics(attrs: &Value) -> Value {
    let mut out = Map::new();
    if let Some(age) = attrs.get("age").and_then(|a| a.get("value")) {
        out.insert("age".into(), age.clone());
    }
    if let Some(gender) = attrs.get("gender").and_then(|g| g.get("value")) {
        out.insert("gender".into(), gender.clone());
    }
    Value::Object(out)
}

fn object_or_empty(value: Option<&Value>) -> Value {
    match value {
        Some(v @ Value::Object(_)) => v.clone(),
        _ => empty_object(),
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
