use proptest::prelude::*;
use serde_json::{json, Value};
use skinsight_core::normalize::{normalize, AttributeMap};
use skinsight_core::recommendations::recommend;
use skinsight_core::scoring::{aggregate_category, aggregate_health, category_scores};
use skinsight_core::types::{AnalysisMode, AttributeId, AttributeReading, ReadingOrigin};

/// Every upstream encoding of a binary flag.
fn flag_encoding(set: bool) -> impl Strategy<Value = Value> {
    let n = u8::from(set);
    let s = n.to_string();
    prop_oneof![
        Just(json!(n)),
        Just(json!(s.clone())),
        (0.0f64..=1.0).prop_map(move |c| json!({ "value": n, "confidence": c })),
        Just(json!({ "value": s })),
    ]
}

/// Arbitrary JSON that may or may not be a usable reading.
fn junk() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e6f64..1.0e6).prop_map(|n| json!(n)),
        ".{0,12}".prop_map(Value::String),
        Just(json!([1, "2", null])),
        Just(json!({ "confidence": 0.3 })),
        Just(json!({ "value": { "nested": true } })),
    ]
}

fn mode() -> impl Strategy<Value = AnalysisMode> {
    prop_oneof![Just(AnalysisMode::Basic), Just(AnalysisMode::Advanced)]
}

fn advanced_raw(fields: Vec<Value>) -> Value {
    let result: serde_json::Map<String, Value> = AnalysisMode::Advanced
        .expected_attributes()
        .zip(fields)
        .map(|(id, v)| (id.upstream_key(AnalysisMode::Advanced).to_string(), v))
        .collect();
    json!({ "result": result })
}

fn basic_raw(fields: Vec<Value>) -> Value {
    let skinstatus: serde_json::Map<String, Value> = AnalysisMode::Basic
        .expected_attributes()
        .zip(fields)
        .map(|(id, v)| (id.upstream_key(AnalysisMode::Basic).to_string(), v))
        .collect();
    json!({ "faces": [{ "attributes": { "skinstatus": skinstatus } }] })
}

fn readings(mode: AnalysisMode, values: &[f64]) -> AttributeMap {
    AttributeMap::new(
        mode,
        mode.expected_attributes()
            .zip(values.iter().copied())
            .map(|(name, value)| AttributeReading {
                name,
                value,
                confidence: None,
                origin: ReadingOrigin::Upstream,
            }),
    )
}

proptest! {
    #[test]
    fn flag_encodings_canonicalize(
        (set, field) in any::<bool>().prop_flat_map(|set| (Just(set), flag_encoding(set))),
    ) {
        let raw = json!({ "result": { "blackhead": field } });
        let n = normalize(&raw, AnalysisMode::Advanced);
        let expected = if set { 1.0 } else { 0.0 };
        prop_assert_eq!(n.attributes.value(AttributeId::Blackhead), expected);
    }

    #[test]
    fn junk_never_panics_and_keeps_every_attribute(
        fields in prop::collection::vec(junk(), 18),
    ) {
        let n = normalize(&advanced_raw(fields), AnalysisMode::Advanced);
        for id in AnalysisMode::Advanced.expected_attributes() {
            let r = n.attributes.get(id);
            prop_assert!(r.is_some(), "missing {}", id);
            prop_assert!(r.unwrap().value.is_finite());
        }
    }

    #[test]
    fn advanced_flags_are_zero_or_one(fields in prop::collection::vec(junk(), 18)) {
        let n = normalize(&advanced_raw(fields), AnalysisMode::Advanced);
        for id in AnalysisMode::Advanced.expected_attributes().filter(|id| id.is_issue(AnalysisMode::Advanced)) {
            let v = n.attributes.value(id);
            prop_assert!(v == 0.0 || v == 1.0, "{} = {}", id, v);
        }
    }

    #[test]
    fn basic_junk_never_panics(fields in prop::collection::vec(junk(), 5)) {
        let n = normalize(&basic_raw(fields), AnalysisMode::Basic);
        prop_assert_eq!(n.attributes.readings().len(), 5);
    }

    #[test]
    fn health_is_always_in_range(
        mode in mode(),
        values in prop::collection::vec(-1.0e9f64..1.0e9, 0..18),
    ) {
        let attrs = readings(mode, &values);
        prop_assert!(aggregate_health(&attrs) <= 100);
        for score in category_scores(&attrs) {
            prop_assert!(score.score <= 100);
        }
    }

    #[test]
    fn category_subset_is_in_range(
        values in prop::collection::vec(0.0f64..=1.0, 18),
        take in 0usize..=AttributeId::ALL.len(),
    ) {
        let attrs = readings(AnalysisMode::Advanced, &values);
        let all = AttributeId::ALL;
        let ids = &all[..take];
        prop_assert!(aggregate_category(&attrs, ids) <= 100);
    }

    #[test]
    fn recommendations_are_deterministic_and_ordered(
        mode in mode(),
        values in prop::collection::vec(0.0f64..100.0, 18),
    ) {
        let attrs = readings(mode, &values);
        let first = recommend(&attrs);
        let second = recommend(&attrs);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.windows(2).all(|w| w[0].priority <= w[1].priority));
        prop_assert!(first.len() >= 2);
    }

    #[test]
    fn envelope_json_is_idempotent(fields in prop::collection::vec(junk(), 18)) {
        let raw = advanced_raw(fields);
        let a = serde_json::to_string(&skinsight_core::analyze(&raw, AnalysisMode::Advanced)).unwrap();
        let b = serde_json::to_string(&skinsight_core::analyze(&raw, AnalysisMode::Advanced)).unwrap();
        prop_assert_eq!(a, b);
    }
}

#[test]
fn empty_map_scores_one_hundred() {
    for mode in [AnalysisMode::Basic, AnalysisMode::Advanced] {
        let attrs = AttributeMap::new(mode, Vec::new());
        assert_eq!(aggregate_health(&attrs), 100);
    }
}

#[test]
fn acne_scenario_lowers_health_and_recommends() {
    let baseline = skinsight_core::analyze(&json!({ "result": {} }), AnalysisMode::Advanced);
    let raw = json!({ "result": { "acne": { "value": "1", "confidence": 0.9 }, "skin_spot": 0 } });
    let env = skinsight_core::analyze(&raw, AnalysisMode::Advanced);

    assert_eq!(env.result[&AttributeId::Acne].value, 1.0);
    assert_eq!(env.result[&AttributeId::Stain].value, 0.0);
    assert!(env.health_score < baseline.health_score);

    let acne = env
        .recommendations
        .iter()
        .find(|r| r.title == "Treat Acne")
        .expect("acne recommendation");
    assert_eq!(acne.priority.as_str(), "high");
    assert_eq!(acne.confidence, Some(0.9));
}
