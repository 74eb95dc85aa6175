// GeoJSON writer for the merged school collection

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use geojson::{Feature, FeatureCollection, JsonObject};
use serde_json::{json, Map, Value};
use tracing::{info, instrument, warn};

use crate::constants::OUTPUT_CRS_NAME;
use crate::domain::UnifiedSchools;
use crate::error::{Result, SchoolDataError};
use crate::metrics::MergeMetrics;

/// Build the output FeatureCollection, properties in column order.
pub fn to_feature_collection(schools: &UnifiedSchools) -> FeatureCollection {
    let features = schools
        .records
        .iter()
        .map(|record| {
            let properties = schools
                .columns
                .iter()
                .map(|column| (column.clone(), record.get(column).clone()))
                .collect::<Map<String, Value>>();
            Feature {
                bbox: None,
                geometry: record
                    .geometry
                    .as_ref()
                    .map(|g| geojson::Geometry::new(geojson::Value::from(g))),
                id: record.id.clone(),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let mut foreign_members = JsonObject::new();
    foreign_members.insert(
        "crs".to_string(),
        json!({"type": "name", "properties": {"name": OUTPUT_CRS_NAME}}),
    );

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    }
}

/// Write the collection to `path`, replacing any existing file.
/// Returns the number of bytes written.
#[instrument(skip(schools), fields(rows = schools.len()))]
pub fn write_geojson(schools: &UnifiedSchools, path: &Path, pretty: bool) -> Result<u64> {
    let missing = schools.records.iter().filter(|r| r.geometry.is_none()).count();
    if missing > 0 {
        warn!("Writing {} features with a null geometry", missing);
    }

    let collection = to_feature_collection(schools);
    let mut writer = BufWriter::new(File::create(path)?);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, &collection)?;
    } else {
        serde_json::to_writer(&mut writer, &collection)?;
    }
    writer.write_all(b"\n")?;
    writer
        .into_inner()
        .map_err(|e| SchoolDataError::Io(e.into_error()))?
        .sync_all()?;

    let bytes = fs::metadata(path)?.len();
    MergeMetrics::record_written(bytes);
    info!("Wrote {} features ({} bytes) to {}", schools.len(), bytes, path.display());
    Ok(bytes)
}
