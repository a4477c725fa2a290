//! Label tables for categorical attributes.
//!
//! Category codes stay integers in the attribute map; these tables are the
//! only place a code is turned into a name.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Skin type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinType {
    Oily,
    Dry,
    Normal,
    Combination,
    Unknown,
}

impl SkinType {
    /// `0=oily, 1=dry, 2=normal, 3=combination`; any other code is `Unknown`.
    pub fn from_code(code: f64) -> Self {
        match code_of(code) {
            Some(0) => Self::Oily,
            Some(1) => Self::Dry,
            Some(2) => Self::Normal,
            Some(3) => Self::Combination,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oily => "oily",
            Self::Dry => "dry",
            Self::Normal => "normal",
            Self::Combination => "combination",
            Self::Unknown => "unknown",
        }
    }

    /// Care hint shown with the descriptive skin-type recommendation.
    pub fn care_hint(&self) -> &'static str {
        match self {
            Self::Oily => {
                "Use a gentle foaming cleanser and an oil-free, non-comedogenic moisturizer."
            }
            Self::Dry => "Use a cream cleanser and a rich moisturizer with ceramides or hyaluronic acid.",
            Self::Normal => "Keep a balanced routine with a mild cleanser, moisturizer and sunscreen.",
            Self::Combination => {
                "Use lightweight products on the T-zone and richer moisturizer on dry areas."
            }
            Self::Unknown => "Keep a simple routine with a mild cleanser, moisturizer and sunscreen.",
        }
    }
}

impl std::fmt::Display for SkinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Eyelids
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyelidType {
    SingleFold,
    ParallelDoubleFold,
    ScallopedDoubleFold,
    Unknown,
}

impl EyelidType {
    pub fn from_code(code: f64) -> Self {
        match code_of(code) {
            Some(0) => Self::SingleFold,
            Some(1) => Self::ParallelDoubleFold,
            Some(2) => Self::ScallopedDoubleFold,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleFold => "single_fold",
            Self::ParallelDoubleFold => "parallel_double_fold",
            Self::ScallopedDoubleFold => "scalloped_double_fold",
            Self::Unknown => "unknown",
        }
    }
}

fn code_of(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}
