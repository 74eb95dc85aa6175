use serde_json::Value;

use crate::domain::{SchoolLevel, SchoolSource};

/// What a source's raw `level_` value resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    Mapped(SchoolLevel),
    /// Recognised value that carries no grade band (including null)
    NoLevel,
    /// Value outside the source's lookup table
    Unmapped,
}

impl LevelOutcome {
    pub fn level(self) -> Option<SchoolLevel> {
        match self {
            LevelOutcome::Mapped(level) => Some(level),
            LevelOutcome::NoLevel | LevelOutcome::Unmapped => None,
        }
    }
}

/// Base trait for source-specific normalizers
pub trait SourceNormalizer: Send + Sync {
    /// The school source this normalizer handles
    fn source(&self) -> SchoolSource;

    /// Get a human-readable name for this normalizer
    fn name(&self) -> &str;

    /// Resolve a raw `level_` value to a grade band
    fn clean_level(&self, raw: &Value) -> LevelOutcome;
}
