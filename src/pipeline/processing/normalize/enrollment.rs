use serde_json::Value;

/// Coerce a raw enrollment value to a float.
///
/// Null stays `None`. Numbers pass through, booleans become 1.0/0.0 and text
/// is parsed after trimming. Anything else returns the offending value as text.
pub fn coerce_enrollment(raw: &Value) -> Result<Option<f64>, String> {
    match raw {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
        Value::Number(n) => n.as_f64().map(Some).ok_or_else(|| n.to_string()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| format!("{:?}", s)),
        other => Err(other.to_string()),
    }
}

/// Negative and non-finite enrollment counts are not usable
pub fn sanitize_enrollment(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_numbers_and_text() {
        assert_eq!(coerce_enrollment(&json!(120)), Ok(Some(120.0)));
        assert_eq!(coerce_enrollment(&json!(12.5)), Ok(Some(12.5)));
        assert_eq!(coerce_enrollment(&json!(" 340 ")), Ok(Some(340.0)));
        assert_eq!(coerce_enrollment(&json!(true)), Ok(Some(1.0)));
        assert_eq!(coerce_enrollment(&Value::Null), Ok(None));
    }

    #[test]
    fn test_coerce_rejects_non_numeric() {
        assert!(coerce_enrollment(&json!("about forty")).is_err());
        assert!(coerce_enrollment(&json!("")).is_err());
        assert!(coerce_enrollment(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_enrollment(0.0), Some(0.0));
        assert_eq!(sanitize_enrollment(35.0), Some(35.0));
        assert_eq!(sanitize_enrollment(-5.0), None);
        assert_eq!(sanitize_enrollment(f64::NAN), None);
        assert_eq!(sanitize_enrollment(f64::INFINITY), None);
    }
}
