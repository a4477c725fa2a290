//! Capture-quality hints derived from the upstream payload.
//!
//! These are advisory only: they never fail an analysis.

use serde_json::Value;

/// Warning token appended when the head is rotated too far.
pub const WARNING_IMPROPER_HEADPOSE: &str = "improper_headpose";

/// Maximum absolute rotation (degrees) on any axis before the head-pose
/// warning fires.
pub const MAX_HEADPOSE_ANGLE: f64 = 45.0;

const HEADPOSE_ANGLES: &[&str] = &["roll_angle", "yaw_angle", "pitch_angle"];

pub const TIP_HEADPOSE: &str =
    "For better results, please ensure your face is facing straight forward to the camera.";
pub const TIP_FACE_VISIBILITY: &str =
    "For better skin analysis results, please ensure your face is clearly visible and well-lit.";
pub const TIP_LOW_QUALITY: &str =
    "Image quality could be improved for more accurate skin analysis.";

/// Returns `true` if any rotation angle in a head-pose object exceeds
/// [`MAX_HEADPOSE_ANGLE`]. Missing or non-numeric angles count as level.
pub fn headpose_exceeds_limit(headpose: &Value) -> bool {
    HEADPOSE_ANGLES.iter().any(|key| {
        headpose
            .get(key)
            .and_then(Value::as_f64)
            .is_some_and(|angle| angle.abs() > MAX_HEADPOSE_ANGLE)
    })
}

/// Merge upstream warnings with the derived head-pose hint.
///
/// Upstream warnings are kept in order; the head-pose token is appended at
/// most once.
pub fn collect_warnings(upstream: Option<&Value>, headpose: Option<&Value>) -> Vec<String> {
    let mut warnings: Vec<String> = upstream
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if headpose.is_some_and(headpose_exceeds_limit)
        && !warnings.iter().any(|w| w == WARNING_IMPROPER_HEADPOSE)
    {
        warnings.push(WARNING_IMPROPER_HEADPOSE.to_string());
    }

    warnings
}

/// Translate warning tokens into user-facing tips, deduplicated in warning
/// order.
pub fn quality_tips(warnings: &[String]) -> Vec<String> {
    let mut tips: Vec<String> = Vec::new();
    let mut push = |tip: &str| {
        if !tips.iter().any(|t| t == tip) {
            tips.push(tip.to_string());
        }
    };

    for warning in warnings {
        if warning == WARNING_IMPROPER_HEADPOSE {
            push(TIP_HEADPOSE);
        }
        if warning.contains("INVALID_IMAGE_FACE") {
            push(TIP_FACE_VISIBILITY);
        }
        if warning.contains("LOW_QUALITY") {
            push(TIP_LOW_QUALITY);
        }
    }

    tips
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
