use serde_json::Value;

use super::base::{LevelOutcome, SourceNormalizer};
use crate::domain::{SchoolLevel, SchoolSource};

/// Normalizer for the private school survey.
/// `level_` holds a small integer code.
pub struct PrivateSchoolNormalizer;

impl PrivateSchoolNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PrivateSchoolNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceNormalizer for PrivateSchoolNormalizer {
    fn source(&self) -> SchoolSource {
        SchoolSource::Private
    }

    fn name(&self) -> &str {
        "Private Schools"
    }

    fn clean_level(&self, raw: &Value) -> LevelOutcome {
        let code = match raw {
            Value::Null => return LevelOutcome::NoLevel,
            Value::Number(n) => n.as_i64().or_else(|| {
                // 2.0 from a float column is still code 2
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            }),
            _ => None,
        };

        code.and_then(SchoolLevel::from_private_code)
            .map(LevelOutcome::Mapped)
            .unwrap_or(LevelOutcome::Unmapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_private_codes_map() {
        let normalizer = PrivateSchoolNormalizer::new();
        assert_eq!(
            normalizer.clean_level(&json!(1)),
            LevelOutcome::Mapped(SchoolLevel::Elementary)
        );
        assert_eq!(
            normalizer.clean_level(&json!(2.0)),
            LevelOutcome::Mapped(SchoolLevel::High)
        );
        assert_eq!(
            normalizer.clean_level(&json!(3)),
            LevelOutcome::Mapped(SchoolLevel::Combined)
        );
    }

    #[test]
    fn test_unknown_private_values() {
        let normalizer = PrivateSchoolNormalizer::new();
        assert_eq!(normalizer.clean_level(&json!(7)), LevelOutcome::Unmapped);
        assert_eq!(normalizer.clean_level(&json!(1.5)), LevelOutcome::Unmapped);
        assert_eq!(normalizer.clean_level(&json!("1")), LevelOutcome::Unmapped);
        assert_eq!(normalizer.clean_level(&Value::Null), LevelOutcome::NoLevel);
    }
}
