// Pipeline ingestion: reading school inputs from GeoJSON files

use std::fs;
use std::path::{Path, PathBuf};

use geojson::{Feature, GeoJson};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use crate::config::PipelineConfig;
use crate::crs::Crs;
use crate::domain::{SchoolFrame, SchoolRecord, SchoolSource};
use crate::error::{Result, SchoolDataError};
use crate::metrics::LoadMetrics;

/// Where an input frame came from
#[derive(Debug, Clone, Serialize)]
pub struct InputProvenance {
    pub source: SchoolSource,
    pub path: PathBuf,
    /// Hex SHA-256 of the bytes read
    pub sha256: String,
    pub bytes: usize,
    pub features: usize,
    /// CRS as declared by the file, `None` when it declared none
    pub declared_crs: Option<String>,
}

/// A loaded input frame plus its provenance
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub frame: SchoolFrame,
    pub provenance: InputProvenance,
}

/// Read one GeoJSON FeatureCollection from disk.
#[instrument(skip(config))]
pub fn load_school_file(
    path: &Path,
    source: SchoolSource,
    config: &PipelineConfig,
) -> Result<LoadedInput> {
    let loaded = fs::read(path)
        .map_err(SchoolDataError::from)
        .and_then(|bytes| {
            let frame = parse_school_frame(&bytes, source, config)?;
            Ok((bytes, frame))
        });

    let (bytes, frame) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            LoadMetrics::record_load_error(source);
            return Err(e);
        }
    };

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let sha256 = hex::encode(hasher.finalize());

    LoadMetrics::record_file_loaded(source, frame.len(), bytes.len());
    info!(
        "Loaded {} {} features ({} columns, crs {}) from {}",
        frame.len(),
        source,
        frame.columns.len(),
        frame.crs.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string()),
        path.display()
    );

    let provenance = InputProvenance {
        source,
        path: path.to_path_buf(),
        sha256,
        bytes: bytes.len(),
        features: frame.len(),
        declared_crs: frame.crs.map(|c| c.to_string()),
    };

    Ok(LoadedInput { frame, provenance })
}

/// Parse GeoJSON bytes into a frame, keeping the declared CRS.
pub fn parse_school_frame(
    bytes: &[u8],
    source: SchoolSource,
    config: &PipelineConfig,
) -> Result<SchoolFrame> {
    let value: Value = serde_json::from_slice(bytes)?;
    let crs = declared_crs(&value, config)?;

    let collection = match GeoJson::from_json_value(value)? {
        GeoJson::FeatureCollection(collection) => collection,
        GeoJson::Feature(_) => {
            return Err(SchoolDataError::NotFeatureCollection {
                dataset: source,
                found: "Feature".to_string(),
            })
        }
        GeoJson::Geometry(_) => {
            return Err(SchoolDataError::NotFeatureCollection {
                dataset: source,
                found: "Geometry".to_string(),
            })
        }
    };

    frame_from_features(collection.features, source, crs)
}

/// Resolve the CRS a GeoJSON document declares through its legacy `crs` member.
///
/// An absent member means RFC 7946 lon/lat when `assume_wgs84_when_undeclared`
/// is set. An explicit `null`, or a member without a usable name, means no CRS.
pub fn declared_crs(document: &Value, config: &PipelineConfig) -> Result<Option<Crs>> {
    let member = match document.get("crs") {
        None => {
            return Ok(config.assume_wgs84_when_undeclared.then_some(Crs::Wgs84));
        }
        Some(Value::Null) => return Ok(None),
        Some(member) => member,
    };

    let properties = member.get("properties");
    if let Some(name) = properties.and_then(|p| p.get("name")).and_then(|n| n.as_str()) {
        return Crs::parse(name).map(Some);
    }

    // Pre-2008 drafts used {"type": "EPSG", "properties": {"code": 4326}}
    if let Some(code) = properties.and_then(|p| p.get("code")).and_then(|c| c.as_u64()) {
        return u32::try_from(code)
            .ok()
            .and_then(Crs::from_epsg)
            .map(Some)
            .ok_or_else(|| SchoolDataError::UnsupportedCrs(format!("EPSG:{}", code)));
    }

    debug!("crs member without a name or code: {}", member);
    Ok(None)
}

fn frame_from_features(
    features: Vec<Feature>,
    source: SchoolSource,
    crs: Option<Crs>,
) -> Result<SchoolFrame> {
    let mut frame = SchoolFrame::new(source, crs);
    frame.records.reserve(features.len());

    for feature in features {
        let geometry = feature
            .geometry
            .map(geo::Geometry::<f64>::try_from)
            .transpose()?;
        let properties = feature.properties.unwrap_or_default();

        for column in properties.keys() {
            frame.add_column(column);
        }
        frame
            .records
            .push(SchoolRecord::new(geometry, properties).with_id(feature.id));
    }

    Ok(frame)
}
