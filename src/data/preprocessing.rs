//! Weight normalization applied at the input boundary

use serde_json::Value;

/// Clamp a raw weight into the range the clustering core accepts.
///
/// NaN, infinite and negative values carry no relation and map to `0.0`.
pub fn normalize_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// Read a weight out of a JSON value, treating anything non-numeric as `0.0`
pub fn sanitize_weight(value: &Value) -> f64 {
    value.as_f64().map(normalize_weight).unwrap_or(0.0)
}
