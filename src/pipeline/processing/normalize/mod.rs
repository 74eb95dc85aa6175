// Per-source normalization: reprojection, column names, level and enrollment cleaning

pub mod enrollment;
pub mod normalizers;

use std::collections::HashSet;
use std::time::Instant;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::constants::{self, ENROLLMENT_COLUMN, LEVEL_CLEAN_COLUMN, LEVEL_COLUMN};
use crate::crs::{reproject_geometry, Crs};
use crate::domain::{SchoolFrame, SchoolSource};
use crate::error::{Result, SchoolDataError};
use crate::metrics::NormalizeMetrics;

pub use enrollment::{coerce_enrollment, sanitize_enrollment};
pub use normalizers::{normalizer_for, LevelOutcome, SourceNormalizer};

/// Counts gathered while normalizing one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationStats {
    pub source: Option<SchoolSource>,
    pub rows: usize,
    /// Rows whose `level_` value was outside the source's lookup table
    pub unmapped_levels: usize,
    /// Negative or non-finite enrollment values replaced with null
    pub enrollment_nulled: usize,
    pub null_geometries: usize,
}

/// Run every normalization step on one frame.
///
/// The frame must carry a CRS; the result is always in WGS84.
#[instrument(skip(frame, normalizer), fields(source = %normalizer.source(), rows = frame.len()))]
pub fn normalize_frame(
    frame: SchoolFrame,
    normalizer: &dyn SourceNormalizer,
) -> Result<(SchoolFrame, NormalizationStats)> {
    let started = Instant::now();
    let source = frame.source;

    let mut frame = reproject_frame(frame)?;
    lowercase_columns(&mut frame)?;
    check_required_columns(&frame)?;

    let unmapped_levels = derive_level_clean(&mut frame, normalizer);
    let enrollment_nulled = clean_enrollment(&mut frame)?;

    let stats = NormalizationStats {
        source: Some(source),
        rows: frame.len(),
        unmapped_levels,
        enrollment_nulled,
        null_geometries: frame.records.iter().filter(|r| r.geometry.is_none()).count(),
    };

    NormalizeMetrics::record_frame_normalized(
        source,
        stats.rows,
        stats.unmapped_levels,
        stats.enrollment_nulled,
        started.elapsed().as_secs_f64(),
    );
    info!(
        "Normalized {} {} rows with {} ({} unmapped levels, {} enrollment values nulled)",
        stats.rows,
        source,
        normalizer.name(),
        stats.unmapped_levels,
        stats.enrollment_nulled
    );
    if stats.null_geometries > 0 {
        warn!("{} {} rows have no geometry", stats.null_geometries, source);
    }

    Ok((frame, stats))
}

/// Transform every geometry to WGS84 longitude/latitude.
pub fn reproject_frame(mut frame: SchoolFrame) -> Result<SchoolFrame> {
    let from = frame.crs.ok_or(SchoolDataError::MissingCrs(frame.source))?;
    debug!("Reprojecting {} {} rows from {}", frame.len(), frame.source, from);

    for (row, record) in frame.records.iter_mut().enumerate() {
        if let Some(geometry) = record.geometry.as_ref() {
            let projected = reproject_geometry(geometry, from).map_err(|reason| {
                SchoolDataError::Reprojection {
                    dataset: frame.source,
                    row,
                    reason,
                }
            })?;
            record.geometry = Some(projected);
        }
    }

    frame.crs = Some(Crs::Wgs84);
    Ok(frame)
}

/// Lowercase column names on the frame and on every row.
pub fn lowercase_columns(frame: &mut SchoolFrame) -> Result<()> {
    let mut seen = HashSet::new();
    let mut lowered = Vec::with_capacity(frame.columns.len());
    for column in &frame.columns {
        let lower = column.to_lowercase();
        if !seen.insert(lower.clone()) {
            return Err(SchoolDataError::DuplicateColumn {
                dataset: frame.source,
                column: lower,
            });
        }
        lowered.push(lower);
    }
    frame.columns = lowered;

    for record in &mut frame.records {
        let properties = std::mem::take(&mut record.properties);
        record.properties = properties
            .into_iter()
            .map(|(key, value)| (key.to_lowercase(), value))
            .collect::<Map<String, Value>>();
    }
    Ok(())
}

/// Required columns are only enforced when there is at least one row.
pub fn check_required_columns(frame: &SchoolFrame) -> Result<()> {
    if frame.is_empty() {
        return Ok(());
    }
    match constants::required_columns()
        .into_iter()
        .find(|column| !frame.has_column(column))
    {
        Some(column) => Err(SchoolDataError::MissingColumn {
            dataset: frame.source,
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

/// Append `level_clean` and return how many rows had an unmapped `level_`.
pub fn derive_level_clean(frame: &mut SchoolFrame, normalizer: &dyn SourceNormalizer) -> usize {
    let mut unmapped = 0;
    let mut levels = Vec::with_capacity(frame.len());

    for (row, record) in frame.records.iter().enumerate() {
        let raw = record.get(LEVEL_COLUMN);
        let outcome = normalizer.clean_level(raw);
        if outcome == LevelOutcome::Unmapped {
            debug!("{} row {}: unmapped level {}", frame.source, row, raw);
            unmapped += 1;
        }
        levels.push(
            outcome
                .level()
                .map(|level| Value::String(level.as_str().to_string()))
                .unwrap_or(Value::Null),
        );
    }

    frame.set_column(LEVEL_CLEAN_COLUMN, levels);
    unmapped
}

/// Coerce `enrollment` to a float, nulling negative values.
/// Returns how many values were nulled.
pub fn clean_enrollment(frame: &mut SchoolFrame) -> Result<usize> {
    let mut nulled = 0;
    let mut cleaned = Vec::with_capacity(frame.len());

    for (row, record) in frame.records.iter().enumerate() {
        let value = coerce_enrollment(record.get(ENROLLMENT_COLUMN)).map_err(|value| {
            SchoolDataError::InvalidEnrollment {
                dataset: frame.source,
                row,
                value,
            }
        })?;

        let value = match value {
            Some(v) => match sanitize_enrollment(v) {
                Some(v) => Value::from(v),
                None => {
                    debug!("{} row {}: enrollment {} set to null", frame.source, row, v);
                    nulled += 1;
                    Value::Null
                }
            },
            None => Value::Null,
        };
        cleaned.push(value);
    }

    if frame.has_column(ENROLLMENT_COLUMN) {
        frame.set_column(ENROLLMENT_COLUMN, cleaned);
    }
    Ok(nulled)
}
