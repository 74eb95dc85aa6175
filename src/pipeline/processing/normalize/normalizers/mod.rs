// Source-specific normalizers
pub mod base;
pub mod private_schools;
pub mod public_schools;

pub use base::{LevelOutcome, SourceNormalizer};
pub use private_schools::PrivateSchoolNormalizer;
pub use public_schools::PublicSchoolNormalizer;

use crate::domain::SchoolSource;

/// Get the normalizer for a school source
pub fn normalizer_for(source: SchoolSource) -> Box<dyn SourceNormalizer> {
    match source {
        SchoolSource::Private => Box::new(PrivateSchoolNormalizer::new()),
        SchoolSource::Public => Box::new(PublicSchoolNormalizer::new()),
    }
}
