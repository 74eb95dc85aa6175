//! Coordinate reference systems understood by the pipeline and reprojection
//! of geometries to WGS84 longitude/latitude.

pub mod projections;

use std::fmt;

use geo::{Coord, Geometry, MapCoords};
use thiserror::Error;

use crate::error::{Result, SchoolDataError};
use projections::{
    web_mercator_inverse, AlbersEqualArea, Ellipsoid, LambertConformalConic, TransverseMercator,
    US_SURVEY_FOOT,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("non-finite result for input ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datum {
    Wgs84,
    Nad83,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinearUnit {
    Metre,
    UsSurveyFoot,
}

/// Supported coordinate reference systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crs {
    /// EPSG:4326 / OGC:CRS84, longitude/latitude degrees
    Wgs84,
    /// EPSG:4269, longitude/latitude degrees
    Nad83,
    /// EPSG:3857
    WebMercator,
    /// EPSG:326xx / 327xx on WGS84, EPSG:269xx on NAD83
    Utm { zone: u8, north: bool, datum: Datum },
    /// EPSG:3310
    CaliforniaAlbers,
    /// EPSG:26943 (metres) or EPSG:2227 (US survey feet)
    CaliforniaZone3 { unit: LinearUnit },
}

impl Crs {
    pub fn from_epsg(code: u32) -> Option<Crs> {
        match code {
            4326 => Some(Crs::Wgs84),
            4269 => Some(Crs::Nad83),
            3857 | 3785 | 900_913 | 102_100 | 102_113 => Some(Crs::WebMercator),
            32_601..=32_660 => Some(Crs::Utm {
                zone: (code - 32_600) as u8,
                north: true,
                datum: Datum::Wgs84,
            }),
            32_701..=32_760 => Some(Crs::Utm {
                zone: (code - 32_700) as u8,
                north: false,
                datum: Datum::Wgs84,
            }),
            26_901..=26_923 => Some(Crs::Utm {
                zone: (code - 26_900) as u8,
                north: true,
                datum: Datum::Nad83,
            }),
            3310 => Some(Crs::CaliforniaAlbers),
            26_943 => Some(Crs::CaliforniaZone3 {
                unit: LinearUnit::Metre,
            }),
            2227 => Some(Crs::CaliforniaZone3 {
                unit: LinearUnit::UsSurveyFoot,
            }),
            _ => None,
        }
    }

    pub fn epsg_code(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::Nad83 => 4269,
            Crs::WebMercator => 3857,
            Crs::Utm {
                zone,
                north: true,
                datum: Datum::Wgs84,
            } => 32_600 + u32::from(*zone),
            Crs::Utm {
                zone,
                north: false,
                datum: Datum::Wgs84,
            } => 32_700 + u32::from(*zone),
            Crs::Utm {
                zone,
                datum: Datum::Nad83,
                ..
            } => 26_900 + u32::from(*zone),
            Crs::CaliforniaAlbers => 3310,
            Crs::CaliforniaZone3 {
                unit: LinearUnit::Metre,
            } => 26_943,
            Crs::CaliforniaZone3 {
                unit: LinearUnit::UsSurveyFoot,
            } => 2227,
        }
    }

    /// Parse a CRS name as found in a GeoJSON `crs` member, e.g.
    /// `EPSG:3857`, `urn:ogc:def:crs:EPSG::2227` or `urn:ogc:def:crs:OGC:1.3:CRS84`.
    pub fn parse(name: &str) -> Result<Crs> {
        let upper = name.trim().to_ascii_uppercase();
        if upper == "CRS84" || upper.ends_with(":CRS84") || upper.ends_with("/CRS84") {
            return Ok(Crs::Wgs84);
        }

        epsg_code_from_name(&upper)
            .and_then(Crs::from_epsg)
            .ok_or_else(|| SchoolDataError::UnsupportedCrs(name.to_string()))
    }

    pub fn is_geographic(&self) -> bool {
        matches!(self, Crs::Wgs84 | Crs::Nad83)
    }

    /// Transform one coordinate from this CRS into WGS84 longitude/latitude degrees.
    ///
    /// Geographic input passes through unchanged, even outside the usual range.
    /// Projected longitudes are wrapped into [-180, 180].
    pub fn to_wgs84(&self, coord: Coord<f64>) -> std::result::Result<Coord<f64>, ProjectionError> {
        let Coord { x, y } = coord;
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::NonFinite { x, y });
        }
        if self.is_geographic() {
            return Ok(coord);
        }

        let (lon, lat) = match self {
            Crs::Wgs84 | Crs::Nad83 => (x, y),
            Crs::WebMercator => web_mercator_inverse(x, y),
            Crs::Utm { zone, north, datum } => {
                let ellipsoid = match datum {
                    Datum::Wgs84 => Ellipsoid::WGS84,
                    Datum::Nad83 => Ellipsoid::GRS80,
                };
                TransverseMercator::utm(*zone, *north, ellipsoid).inverse(x, y)
            }
            Crs::CaliforniaAlbers => AlbersEqualArea::california().inverse(x, y),
            Crs::CaliforniaZone3 { unit } => {
                let scale = match unit {
                    LinearUnit::Metre => 1.0,
                    LinearUnit::UsSurveyFoot => US_SURVEY_FOOT,
                };
                LambertConformalConic::california_zone_3().inverse(x * scale, y * scale)
            }
        };

        if !lon.is_finite() || !lat.is_finite() {
            return Err(ProjectionError::NonFinite { x, y });
        }
        Ok(Coord {
            x: wrap_longitude(lon),
            y: lat,
        })
    }
}

/// Bring a longitude into [-180, 180]
fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg_code())
    }
}

fn epsg_code_from_name(upper: &str) -> Option<u32> {
    if let Some(rest) = upper
        .strip_prefix("EPSG:")
        .or_else(|| upper.strip_prefix("ESRI:"))
    {
        return rest.trim().parse().ok();
    }
    if upper.starts_with("URN:OGC:DEF:CRS:EPSG:") {
        return upper.rsplit(':').next()?.parse().ok();
    }
    if upper.contains("OPENGIS.NET/DEF/CRS/EPSG/") {
        return upper.trim_end_matches('/').rsplit('/').next()?.parse().ok();
    }
    None
}

/// Reproject every coordinate of `geometry` from `from` to WGS84.
pub fn reproject_geometry(
    geometry: &Geometry<f64>,
    from: Crs,
) -> std::result::Result<Geometry<f64>, ProjectionError> {
    geometry.try_map_coords(|coord| from.to_wgs84(coord))
}
