//! Attribute model shared by the normalizer, aggregator and recommendation
//! engine.
//!
//! The per-attribute scale table lives here and nowhere else: every consumer
//! asks [`AttributeId::scale`] which raw scale a reading is on for a given
//! [`AnalysisMode`].

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Analysis mode
// ---------------------------------------------------------------------------

pub const MODE_BASIC: &str = "basic";
pub const MODE_ADVANCED: &str = "advanced";

/// All valid mode strings.
pub const VALID_MODES: &[&str] = &[MODE_BASIC, MODE_ADVANCED];

/// Analysis depth selector.
///
/// `Basic` uses the comprehensive face detection endpoint (skin status plus
/// demographics, emotion and beauty); `Advanced` uses the dedicated skin
/// analysis endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Basic,
    Advanced,
}

impl AnalysisMode {
    /// Parse a stored or user-supplied mode string.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            MODE_BASIC => Ok(Self::Basic),
            MODE_ADVANCED => Ok(Self::Advanced),
            _ => Err(format!(
                "Invalid analysis mode '{s}'. Must be one of: {}",
                VALID_MODES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => MODE_BASIC,
            Self::Advanced => MODE_ADVANCED,
        }
    }

    /// Attributes this mode is expected to supply, in canonical order.
    pub fn expected_attributes(self) -> impl Iterator<Item = AttributeId> {
        AttributeId::ALL
            .iter()
            .copied()
            .filter(move |id| id.scale(self).is_some())
    }
}

// ---------------------------------------------------------------------------
// Attribute identifiers
// ---------------------------------------------------------------------------

/// Closed set of skin attributes produced by the vision API.
///
/// Adding a variant is a versioned change of the result envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeId {
    Health,
    Acne,
    /// Skin spots. Upstream calls it `stain` in basic mode and `skin_spot`
    /// in advanced mode.
    Stain,
    DarkCircle,
    /// Composite wrinkle severity (basic mode only).
    Wrinkle,
    EyePouch,
    ForeheadWrinkle,
    CrowsFeet,
    EyeFinelines,
    GlabellaWrinkle,
    NasolabialFold,
    PoresForehead,
    PoresLeftCheek,
    PoresRightCheek,
    PoresJaw,
    Blackhead,
    Mole,
    SkinType,
    LeftEyelids,
    RightEyelids,
}

impl AttributeId {
    /// Every attribute, in canonical order.
    pub const ALL: [AttributeId; 20] = [
        Self::Health,
        Self::Acne,
        Self::Stain,
        Self::DarkCircle,
        Self::Wrinkle,
        Self::EyePouch,
        Self::ForeheadWrinkle,
        Self::CrowsFeet,
        Self::EyeFinelines,
        Self::GlabellaWrinkle,
        Self::NasolabialFold,
        Self::PoresForehead,
        Self::PoresLeftCheek,
        Self::PoresRightCheek,
        Self::PoresJaw,
        Self::Blackhead,
        Self::Mole,
        Self::SkinType,
        Self::LeftEyelids,
        Self::RightEyelids,
    ];

    /// The five wrinkle sub-attributes.
    pub const WRINKLES: [AttributeId; 5] = [
        Self::ForeheadWrinkle,
        Self::CrowsFeet,
        Self::EyeFinelines,
        Self::GlabellaWrinkle,
        Self::NasolabialFold,
    ];

    /// The four pore sub-attributes.
    pub const PORES: [AttributeId; 4] = [
        Self::PoresForehead,
        Self::PoresLeftCheek,
        Self::PoresRightCheek,
        Self::PoresJaw,
    ];

    /// Canonical (serialized) name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Acne => "acne",
            Self::Stain => "stain",
            Self::DarkCircle => "dark_circle",
            Self::Wrinkle => "wrinkle",
            Self::EyePouch => "eye_pouch",
            Self::ForeheadWrinkle => "forehead_wrinkle",
            Self::CrowsFeet => "crows_feet",
            Self::EyeFinelines => "eye_finelines",
            Self::GlabellaWrinkle => "glabella_wrinkle",
            Self::NasolabialFold => "nasolabial_fold",
            Self::PoresForehead => "pores_forehead",
            Self::PoresLeftCheek => "pores_left_cheek",
            Self::PoresRightCheek => "pores_right_cheek",
            Self::PoresJaw => "pores_jaw",
            Self::Blackhead => "blackhead",
            Self::Mole => "mole",
            Self::SkinType => "skin_type",
            Self::LeftEyelids => "left_eyelids",
            Self::RightEyelids => "right_eyelids",
        }
    }

    /// Field name the upstream payload uses for this attribute in `mode`.
    pub fn upstream_key(&self, mode: AnalysisMode) -> &'static str {
        match (self, mode) {
            (Self::Stain, AnalysisMode::Advanced) => "skin_spot",
            _ => self.as_str(),
        }
    }

    /// Raw scale of this attribute in `mode`, or `None` when the mode does
    /// not supply it.
    ///
    /// | attribute                         | basic    | advanced |
    /// |-----------------------------------|----------|----------|
    /// | health                            | score    | --       |
    /// | acne, stain, dark_circle          | severity | flag     |
    /// | wrinkle (composite)               | severity | --       |
    /// | eye_pouch, wrinkle/pore subs,     | --       | flag     |
    /// | blackhead, mole                   |          |          |
    /// | skin_type, left/right_eyelids     | --       | category |
    pub fn scale(&self, mode: AnalysisMode) -> Option<AttributeScale> {
        use AnalysisMode::{Advanced, Basic};
        use AttributeScale::{Category, Flag, Score, Severity};

        match (self, mode) {
            (Self::Health, Basic) => Some(Score),
            (Self::Health, Advanced) => None,

            (Self::Acne | Self::Stain | Self::DarkCircle, Basic) => Some(Severity),
            (Self::Acne | Self::Stain | Self::DarkCircle, Advanced) => Some(Flag),

            (Self::Wrinkle, Basic) => Some(Severity),
            (Self::Wrinkle, Advanced) => None,

            (
                Self::EyePouch
                | Self::ForeheadWrinkle
                | Self::CrowsFeet
                | Self::EyeFinelines
                | Self::GlabellaWrinkle
                | Self::NasolabialFold
                | Self::PoresForehead
                | Self::PoresLeftCheek
                | Self::PoresRightCheek
                | Self::PoresJaw
                | Self::Blackhead
                | Self::Mole,
                Advanced,
            ) => Some(Flag),

            (Self::SkinType | Self::LeftEyelids | Self::RightEyelids, Advanced) => Some(Category),

            _ => None,
        }
    }

    /// Returns `true` if a higher value means a worse skin condition in `mode`.
    pub fn is_issue(&self, mode: AnalysisMode) -> bool {
        self.scale(mode).is_some_and(|s| s.scale_factor().is_some())
    }
}

impl std::fmt::Display for AttributeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Scales
// ---------------------------------------------------------------------------

/// Raw scale an attribute value is reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeScale {
    /// 0-100, higher is better. Not an issue attribute.
    Score,
    /// 0-100 severity, precomputed upstream. 0 = none.
    Severity,
    /// Binary presence flag, canonicalized to `0.0` / `1.0`.
    Flag,
    /// Integer category code, never rescaled.
    Category,
}

impl AttributeScale {
    /// Multiplier that brings an issue value onto a 0-100 severity scale.
    ///
    /// `None` for scales that do not express severity.
    pub fn scale_factor(&self) -> Option<f64> {
        match self {
            Self::Severity => Some(1.0),
            Self::Flag => Some(100.0),
            Self::Score | Self::Category => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// Where a reading's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingOrigin {
    /// Resolved from an upstream field.
    Upstream,
    /// Upstream omitted the field or sent something unusable.
    Defaulted,
}

/// One normalized attribute measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeReading {
    pub name: AttributeId,
    /// Always a plain finite number regardless of the upstream encoding.
    pub value: f64,
    /// Upstream confidence in `[0, 1]`; `None` when omitted, never invented.
    pub confidence: Option<f64>,
    pub origin: ReadingOrigin,
}

impl AttributeReading {
    /// Default reading for an attribute the upstream did not supply.
    pub fn defaulted(name: AttributeId) -> Self {
        Self {
            name,
            value: 0.0,
            confidence: None,
            origin: ReadingOrigin::Defaulted,
        }
    }

    /// Returns `true` when a flag-scale reading is set.
    pub fn is_set(&self) -> bool {
        self.value >= 1.0
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Display grouping used for sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    EyeArea,
    Wrinkles,
    Pores,
    SkinIssues,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Self::EyeArea,
        Self::Wrinkles,
        Self::Pores,
        Self::SkinIssues,
    ];

    /// Attributes that contribute to this category. Callers restrict the
    /// list to what the active mode supplies.
    pub fn members(&self) -> &'static [AttributeId] {
        use AttributeId as A;
        match self {
            Self::EyeArea => &[A::EyePouch, A::DarkCircle],
            Self::Wrinkles => &[
                A::Wrinkle,
                A::ForeheadWrinkle,
                A::CrowsFeet,
                A::EyeFinelines,
                A::GlabellaWrinkle,
                A::NasolabialFold,
            ],
            Self::Pores => &[
                A::PoresForehead,
                A::PoresLeftCheek,
                A::PoresRightCheek,
                A::PoresJaw,
            ],
            Self::SkinIssues => &[A::Acne, A::Blackhead, A::Stain, A::Mole],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
