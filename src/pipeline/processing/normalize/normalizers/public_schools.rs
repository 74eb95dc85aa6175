use serde_json::Value;

use super::base::{LevelOutcome, SourceNormalizer};
use crate::domain::{PublicLevelLookup, SchoolLevel, SchoolSource};

/// Normalizer for the public school directory.
/// `level_` holds a text label such as "High" or "Not Reported".
pub struct PublicSchoolNormalizer;

impl PublicSchoolNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PublicSchoolNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceNormalizer for PublicSchoolNormalizer {
    fn source(&self) -> SchoolSource {
        SchoolSource::Public
    }

    fn name(&self) -> &str {
        "Public Schools"
    }

    fn clean_level(&self, raw: &Value) -> LevelOutcome {
        match raw {
            Value::Null => LevelOutcome::NoLevel,
            Value::String(label) => match SchoolLevel::lookup_public_label(label) {
                PublicLevelLookup::Level(level) => LevelOutcome::Mapped(level),
                PublicLevelLookup::NoLevel => LevelOutcome::NoLevel,
                PublicLevelLookup::Unknown => LevelOutcome::Unmapped,
            },
            _ => LevelOutcome::Unmapped,
        }
    }
}
