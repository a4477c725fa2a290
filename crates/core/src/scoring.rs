//! Score aggregator: overall health score and category sub-scores.
//!
//! Both use the same rule: take the issue attributes in the set, bring each
//! onto a 0-100 severity scale with the factor from
//! [`AttributeScale::scale_factor`](crate::types::AttributeScale::scale_factor),
//! average, invert (`100 - avg`), clamp to `[0, 100]` and round. A set with
//! no contributing attributes scores [`NEUTRAL_SCORE`].

use serde::{Deserialize, Serialize};

use crate::normalize::AttributeMap;
use crate::types::{AttributeId, Category};

/// Score of a set with nothing to penalize.
pub const NEUTRAL_SCORE: u8 = 100;

/// Sub-score for one display category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: u8,
    /// Attributes that contributed, in canonical order.
    pub attributes: Vec<AttributeId>,
}

/// Overall health score over every issue attribute the mode supplies.
pub fn aggregate_health(attrs: &AttributeMap) -> u8 {
    let mode = attrs.mode();
    let issues: Vec<AttributeId> = mode
        .expected_attributes()
        .filter(|id| id.is_issue(mode))
        .collect();
    aggregate_category(attrs, &issues)
}

/// Score restricted to `ids`. Ids that are not issue attributes in the
/// map's mode, or that are absent from the map, do not contribute.
pub fn aggregate_category(attrs: &AttributeMap, ids: &[AttributeId]) -> u8 {
    let severities: Vec<f64> = contributing(attrs, ids)
        .map(|(id, factor)| severity(attrs.value(id), factor))
        .collect();

    if severities.is_empty() {
        return NEUTRAL_SCORE;
    }

    let avg = severities.iter().sum::<f64>() / severities.len() as f64;
    invert(avg)
}

/// Sub-scores for every [`Category`], in declaration order.
pub fn category_scores(attrs: &AttributeMap) -> Vec<CategoryScore> {
    Category::ALL
        .iter()
        .map(|&category| {
            let attributes: Vec<AttributeId> = contributing(attrs, category.members())
                .map(|(id, _)| id)
                .collect();
            CategoryScore {
                category,
                score: aggregate_category(attrs, &attributes),
                attributes,
            }
        })
        .collect()
}

/// Issue attributes of `ids` present in `attrs`, with their scale factor.
fn contributing<'a>(
    attrs: &'a AttributeMap,
    ids: &'a [AttributeId],
) -> impl Iterator<Item = (AttributeId, f64)> + 'a {
    let mode = attrs.mode();
    ids.iter().filter_map(move |&id| {
        attrs.get(id)?;
        let factor = id.scale(mode)?.scale_factor()?;
        Some((id, factor))
    })
}

fn severity(value: f64, factor: f64) -> f64 {
    let scaled = value * factor;
    if scaled.is_finite() {
        scaled
    } else {
        0.0
    }
}

fn invert(avg_severity: f64) -> u8 {
    let score = (100.0 - avg_severity).clamp(0.0, 100.0).round();
    // Clamped and rounded above, so the cast cannot truncate.
    score as u8
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
