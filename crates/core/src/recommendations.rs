//! Rule-based recommendation engine.
//!
//! Every rule is evaluated independently against the normalized attribute
//! map and all matching rules fire. The result is ordered by priority
//! (`high`, `medium`, `low`); ties keep the rule order below. Two generic
//! entries are always appended at `low` priority.
//!
//! | # | rule          | basic (severity 0-100)      | advanced (flags)   |
//! |---|---------------|-----------------------------|--------------------|
//! | 1 | acne          | > 50 high, > 30 medium      | set: high          |
//! | 2 | blackhead     | --                          | set: high          |
//! | 3 | stain         | > 50 high, > 30 medium      | set: high          |
//! | 4 | eye_pouch     | --                          | set: medium        |
//! | 5 | dark_circle   | > 30 high                   | set: medium        |
//! | 6 | wrinkles      | composite > 30 medium       | any sub set: medium|
//! | 7 | pores         | --                          | >= 2 set: medium   |
//! | 8 | skin_type     | --                          | from upstream: low |

use serde::{Deserialize, Serialize};

use crate::labels::SkinType;
use crate::normalize::AttributeMap;
use crate::types::{AnalysisMode, AttributeId, AttributeReading, ReadingOrigin};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Basic-mode severity above which acne/stain advice is urgent.
pub const SEVERITY_HIGH: f64 = 50.0;

/// Basic-mode severity above which preventive advice is given.
pub const SEVERITY_MEDIUM: f64 = 30.0;

/// Pore flags that must be set before the pore rule fires.
pub const MIN_PORE_FLAGS: usize = 2;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// One advice entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Confidence of the triggering reading, `None` for generic advice or
    /// when upstream sent none.
    pub confidence: Option<f64>,
}

impl Recommendation {
    fn new(title: &str, description: &str, priority: Priority, confidence: Option<f64>) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            priority,
            confidence,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Generate the ordered recommendation list for one analysis.
pub fn recommend(attrs: &AttributeMap) -> Vec<Recommendation> {
    let rules: [fn(&AttributeMap) -> Option<Recommendation>; 8] = [
        acne,
        blackhead,
        stain,
        eye_pouch,
        dark_circle,
        wrinkles,
        pores,
        skin_type,
    ];

    let mut out: Vec<Recommendation> = rules.iter().filter_map(|rule| rule(attrs)).collect();

    out.push(Recommendation::new(
        "Daily Skincare Routine",
        "Cleanse twice a day, apply sunscreen every morning and moisturizer every night.",
        Priority::Low,
        None,
    ));
    out.push(Recommendation::new(
        "Hydrate From Within",
        "Drink at least 8 glasses of water a day to keep your skin hydrated.",
        Priority::Low,
        None,
    ));

    // Stable: equal priorities keep rule order.
    out.sort_by_key(|r| r.priority);
    out
}

fn acne(attrs: &AttributeMap) -> Option<Recommendation> {
    let reading = attrs.get(AttributeId::Acne)?;
    match tier(attrs.mode(), reading)? {
        Priority::High => Some(Recommendation::new(
            "Treat Acne",
            "Use products with salicylic acid or benzoyl peroxide and avoid touching your face.",
            Priority::High,
            reading.confidence,
        )),
        _ => Some(Recommendation::new(
            "Prevent Breakouts",
            "Cleanse twice a day and choose non-comedogenic products.",
            Priority::Medium,
            reading.confidence,
        )),
    }
}

fn blackhead(attrs: &AttributeMap) -> Option<Recommendation> {
    let reading = flag_set(attrs, AttributeId::Blackhead)?;
    Some(Recommendation::new(
        "Clear Blackheads",
        "Exfoliate with a BHA product two to three times a week and use a clay mask weekly.",
        Priority::High,
        reading.confidence,
    ))
}

fn stain(attrs: &AttributeMap) -> Option<Recommendation> {
    let reading = attrs.get(AttributeId::Stain)?;
    match tier(attrs.mode(), reading)? {
        Priority::High => Some(Recommendation::new(
            "Fade Dark Spots",
            "Use products with vitamin C or glycolic acid to brighten skin and reduce spots.",
            Priority::High,
            reading.confidence,
        )),
        _ => Some(Recommendation::new(
            "Prevent Dark Spots",
            "Apply SPF 30+ sunscreen every day to prevent new spots.",
            Priority::Medium,
            reading.confidence,
        )),
    }
}

fn eye_pouch(attrs: &AttributeMap) -> Option<Recommendation> {
    let reading = flag_set(attrs, AttributeId::EyePouch)?;
    Some(Recommendation::new(
        "Reduce Eye Bags",
        "Use a cooling eye gel in the morning and sleep with your head slightly elevated.",
        Priority::Medium,
        reading.confidence,
    ))
}

fn dark_circle(attrs: &AttributeMap) -> Option<Recommendation> {
    let reading = attrs.get(AttributeId::DarkCircle)?;
    let priority = match attrs.mode() {
        AnalysisMode::Basic if reading.value > SEVERITY_MEDIUM => Priority::High,
        AnalysisMode::Advanced if reading.is_set() => Priority::Medium,
        _ => return None,
    };
    Some(Recommendation::new(
        "Brighten Dark Circles",
        "Use an eye cream with caffeine or retinol and get 7-8 hours of sleep per night.",
        priority,
        reading.confidence,
    ))
}

fn wrinkles(attrs: &AttributeMap) -> Option<Recommendation> {
    let confidence = match attrs.mode() {
        AnalysisMode::Basic => {
            let reading = attrs.get(AttributeId::Wrinkle)?;
            if reading.value <= SEVERITY_MEDIUM {
                return None;
            }
            reading.confidence
        }
        AnalysisMode::Advanced => {
            let set = set_flags(attrs, &AttributeId::WRINKLES);
            if set.is_empty() {
                return None;
            }
            max_confidence(&set)
        }
    };
    Some(Recommendation::new(
        "Smooth Fine Lines",
        "Use a moisturizer with retinol or peptides and protect your face from UV exposure.",
        Priority::Medium,
        confidence,
    ))
}

fn pores(attrs: &AttributeMap) -> Option<Recommendation> {
    if attrs.mode() != AnalysisMode::Advanced {
        return None;
    }
    let set = set_flags(attrs, &AttributeId::PORES);
    if set.len() < MIN_PORE_FLAGS {
        return None;
    }
    Some(Recommendation::new(
        "Refine Enlarged Pores",
        "Use a niacinamide serum and keep pores clear with regular gentle exfoliation.",
        Priority::Medium,
        max_confidence(&set),
    ))
}

fn skin_type(attrs: &AttributeMap) -> Option<Recommendation> {
    let reading = attrs.get(AttributeId::SkinType)?;
    if reading.origin != ReadingOrigin::Upstream {
        return None;
    }
    let skin_type = SkinType::from_code(reading.value);
    Some(Recommendation {
        title: format!("Care for {} Skin", capitalize(skin_type.as_str())),
        description: skin_type.care_hint().to_string(),
        priority: Priority::Low,
        confidence: reading.confidence,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Priority of a severity/flag attribute: flags are `High` when set; basic
/// severities are tiered on [`SEVERITY_HIGH`] and [`SEVERITY_MEDIUM`].
fn tier(mode: AnalysisMode, reading: &AttributeReading) -> Option<Priority> {
    match mode {
        AnalysisMode::Advanced => reading.is_set().then_some(Priority::High),
        AnalysisMode::Basic if reading.value > SEVERITY_HIGH => Some(Priority::High),
        AnalysisMode::Basic if reading.value > SEVERITY_MEDIUM => Some(Priority::Medium),
        AnalysisMode::Basic => None,
    }
}

fn flag_set(attrs: &AttributeMap, id: AttributeId) -> Option<&AttributeReading> {
    attrs.get(id).filter(|r| r.is_set())
}

fn set_flags<'a>(attrs: &'a AttributeMap, ids: &[AttributeId]) -> Vec<&'a AttributeReading> {
    ids.iter().filter_map(|&id| flag_set(attrs, id)).collect()
}

fn max_confidence(readings: &[&AttributeReading]) -> Option<f64> {
    readings
        .iter()
        .filter_map(|r| r.confidence)
        .fold(None, |acc, c| Some(acc.map_or(c, |m: f64| m.max(c))))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(name: AttributeId, value: f64, confidence: Option<f64>) -> AttributeReading {
        AttributeReading {
            name,
            value,
            confidence,
            origin: ReadingOrigin::Upstream,
        }
    }

    fn map(mode: AnalysisMode, readings: Vec<AttributeReading>) -> AttributeMap {
        AttributeMap::new(mode, readings)
    }

    fn titles(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn defaults_only_yield_generic_advice() {
        let recs = recommend(&map(AnalysisMode::Advanced, vec![]));
        assert_eq!(titles(&recs), vec!["Daily Skincare Routine", "Hydrate From Within"]);
        assert!(recs.iter().all(|r| r.priority == Priority::Low));
        assert!(recs.iter().all(|r| r.confidence.is_none()));
    }

    #[test]
    fn advanced_acne_flag_is_high_with_confidence() {
        let attrs = map(
            AnalysisMode::Advanced,
            vec![reading(AttributeId::Acne, 1.0, Some(0.9))],
        );
        let recs = recommend(&attrs);
        assert_eq!(recs[0].title, "Treat Acne");
        assert_eq!(recs[0].priority, Priority::High);
        assert_eq!(recs[0].confidence, Some(0.9));
    }

    #[test]
    fn ordering_is_priority_then_rule_order() {
        let attrs = map(
            AnalysisMode::Advanced,
            vec![
                reading(AttributeId::EyePouch, 1.0, None),
                reading(AttributeId::Stain, 1.0, None),
                reading(AttributeId::Acne, 1.0, None),
                reading(AttributeId::DarkCircle, 1.0, None),
                reading(AttributeId::SkinType, 1.0, Some(0.7)),
            ],
        );
        let recs = recommend(&attrs);
        assert_eq!(
            titles(&recs),
            vec![
                "Treat Acne",
                "Fade Dark Spots",
                "Reduce Eye Bags",
                "Brighten Dark Circles",
                "Care for Dry Skin",
                "Daily Skincare Routine",
                "Hydrate From Within",
            ]
        );
    }

    #[test]
    fn basic_severities_are_tiered() {
        let attrs = map(
            AnalysisMode::Basic,
            vec![
                reading(AttributeId::Acne, 40.0, None),
                reading(AttributeId::Stain, 75.0, None),
                reading(AttributeId::DarkCircle, 31.0, None),
                reading(AttributeId::Wrinkle, 30.0, None),
            ],
        );
        let recs = recommend(&attrs);
        assert_eq!(
            titles(&recs),
            vec![
                "Fade Dark Spots",
                "Brighten Dark Circles",
                "Prevent Breakouts",
                "Daily Skincare Routine",
                "Hydrate From Within",
            ]
        );
    }

    #[test]
    fn basic_wrinkle_composite_above_threshold() {
        let attrs = map(
            AnalysisMode::Basic,
            vec![reading(AttributeId::Wrinkle, 40.0, Some(0.5))],
        );
        let recs = recommend(&attrs);
        assert_eq!(recs[0].title, "Smooth Fine Lines");
        assert_eq!(recs[0].confidence, Some(0.5));
    }

    #[test]
    fn wrinkle_rule_takes_max_confidence_of_set_subs() {
        let attrs = map(
            AnalysisMode::Advanced,
            vec![
                reading(AttributeId::CrowsFeet, 1.0, Some(0.4)),
                reading(AttributeId::NasolabialFold, 1.0, Some(0.8)),
                reading(AttributeId::ForeheadWrinkle, 0.0, Some(0.99)),
            ],
        );
        let recs = recommend(&attrs);
        let wrinkle = recs.iter().find(|r| r.title == "Smooth Fine Lines").unwrap();
        assert_eq!(wrinkle.confidence, Some(0.8));
    }

    #[test]
    fn pores_need_two_flags() {
        let one = map(
            AnalysisMode::Advanced,
            vec![reading(AttributeId::PoresJaw, 1.0, None)],
        );
        assert!(!titles(&recommend(&one)).contains(&"Refine Enlarged Pores"));

        let two = map(
            AnalysisMode::Advanced,
            vec![
                reading(AttributeId::PoresJaw, 1.0, None),
                reading(AttributeId::PoresForehead, 1.0, None),
            ],
        );
        let recs = recommend(&two);
        let pores = recs.iter().find(|r| r.title == "Refine Enlarged Pores").unwrap();
        assert_eq!(pores.confidence, None);
    }

    #[test]
    fn defaulted_skin_type_is_silent() {
        let attrs = map(AnalysisMode::Advanced, vec![]);
        assert!(!recommend(&attrs).iter().any(|r| r.title.starts_with("Care for")));
    }

    #[test]
    fn low_health_and_moles_only_get_generic_advice() {
        let basic = map(
            AnalysisMode::Basic,
            vec![reading(AttributeId::Health, 20.0, None)],
        );
        let advanced = map(
            AnalysisMode::Advanced,
            vec![reading(AttributeId::Mole, 1.0, Some(0.9))],
        );
        for attrs in [basic, advanced] {
            assert_eq!(
                titles(&recommend(&attrs)),
                vec!["Daily Skincare Routine", "Hydrate From Within"]
            );
        }
    }

    #[test]
    fn priority_serializes_lowercase() {
        let json = serde_json::to_string(&Priority::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }
}
