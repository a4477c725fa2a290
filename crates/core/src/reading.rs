//! Reading resolver for duck-typed upstream attribute fields.
//!
//! The vision API reports the same attribute as a bare number, a numeric
//! string, a `{value, confidence}` object (whose `value` may itself be a
//! string), or -- for skin type -- a `{skin_type, details}` object. Every
//! call site goes through [`resolve`] so the rules are applied exactly once.

use serde_json::Value;

/// Resolved shape of one upstream attribute field.
#[derive(Debug, Clone, PartialEq)]
pub enum RawReading {
    /// Bare number, numeric string or boolean.
    Number(f64),
    /// `{ "value": <number|string>, "confidence": <number>? }`.
    Pair { value: f64, confidence: Option<f64> },
    /// `{ "skin_type": <code>, "details": { "<code>": { "confidence": .. } } }`.
    Classified { code: f64, confidence: Option<f64> },
    /// Field absent or `null`.
    Missing,
    /// Field present but unusable; carries a short reason for logging.
    Malformed(&'static str),
}

impl RawReading {
    /// Value and confidence, or `None` for missing/malformed fields.
    pub fn parts(&self) -> Option<(f64, Option<f64>)> {
        match *self {
            Self::Number(value) => Some((value, None)),
            Self::Pair { value, confidence } => Some((value, confidence)),
            Self::Classified { code, confidence } => Some((code, confidence)),
            Self::Missing | Self::Malformed(_) => None,
        }
    }
}

/// Resolve one upstream field into a [`RawReading`].
///
/// Never fails: anything unrecognized becomes [`RawReading::Malformed`].
pub fn resolve(field: Option<&Value>) -> RawReading {
    let Some(field) = field else {
        return RawReading::Missing;
    };

    match field {
        Value::Null => RawReading::Missing,
        Value::Object(obj) => {
            if let Some(value) = obj.get("value") {
                return match scalar(value) {
                    Some(value) => RawReading::Pair {
                        value,
                        confidence: obj.get("confidence").and_then(confidence),
                    },
                    None => RawReading::Malformed("unparseable value"),
                };
            }
            if let Some(code) = obj.get("skin_type") {
                return match scalar(code) {
                    Some(code) => RawReading::Classified {
                        code,
                        confidence: classified_confidence(obj.get("details"), code),
                    },
                    None => RawReading::Malformed("unparseable category code"),
                };
            }
            RawReading::Malformed("object without value")
        }
        Value::Array(_) => RawReading::Malformed("array"),
        other => match scalar(other) {
            Some(value) => RawReading::Number(value),
            None => RawReading::Malformed("unparseable scalar"),
        },
    }
}

/// Canonicalize a flag value: any non-zero value is `1.0`, everything else `0.0`.
///
/// This is the single truthiness rule for every binary attribute.
pub fn canonical_flag(value: f64) -> f64 {
    if value != 0.0 && value.is_finite() {
        1.0
    } else {
        0.0
    }
}

/// Interpret a JSON scalar as a finite number.
fn scalar(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn confidence(value: &Value) -> Option<f64> {
    value.as_f64().filter(|c| c.is_finite())
}

/// Confidence of the winning class in a `details` map keyed by class code.
fn classified_confidence(details: Option<&Value>, code: f64) -> Option<f64> {
    let key = format!("{}", code.round() as i64);
    details?.get(&key)?.get("confidence").and_then(confidence)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
