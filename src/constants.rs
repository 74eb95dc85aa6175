/// Column and label constants to keep names consistent across the pipeline stages.
/// Every column name here is the lowercased form used after normalization.

// Columns read from both school sources
pub const LEVEL_COLUMN: &str = "level_";
pub const ENROLLMENT_COLUMN: &str = "enrollment";
pub const CITY_COLUMN: &str = "city";
pub const COUNTY_COLUMN: &str = "county";

// Columns derived by the pipeline
pub const LEVEL_CLEAN_COLUMN: &str = "level_clean";
pub const SCHOOL_ID_COLUMN: &str = "school_id";

/// Region every output row must belong to
pub const DEFAULT_REGION_NAME: &str = "San Francisco";

/// CRS name written into the output FeatureCollection (EPSG:4326 in lon/lat order)
pub const OUTPUT_CRS_NAME: &str = "urn:ogc:def:crs:OGC:1.3:CRS84";

pub const USAGE: &str = "Usage: sf_schools private.geojson public.geojson output.geojson";

/// Columns every non-empty input must carry after lowercasing
pub fn required_columns() -> Vec<&'static str> {
    vec![LEVEL_COLUMN, ENROLLMENT_COLUMN, CITY_COLUMN, COUNTY_COLUMN]
}

/// Columns the region filter looks at by default
pub fn default_region_columns() -> Vec<String> {
    vec![CITY_COLUMN.to_string(), COUNTY_COLUMN.to_string()]
}
