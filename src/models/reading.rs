use serde_json::Value;

/// Rendered in place of any value that is missing or could not be computed.
pub const PLACEHOLDER: &str = "—";

/// The single validation routine for loosely-typed readings.
///
/// Returns `Some` only for finite JSON numbers. Strings, booleans, nulls and
/// absent keys are all `None`; nothing is coerced to zero.
pub fn numeric(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|v| v.is_finite())
}

/// Format an optional reading with its unit, or the placeholder.
pub fn display_reading(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if unit.is_empty() => format!("{}", v),
        Some(v) => format!("{} {}", v, unit),
        None => PLACEHOLDER.to_string(),
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
