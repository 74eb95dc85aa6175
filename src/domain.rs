//! Domain data shapes shared across the pipeline stages.

use std::fmt;

use geo::Geometry;
use geojson::feature::Id;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::crs::Crs;

/// Which of the two school inputs a frame or row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolSource {
    Private,
    Public,
}

impl SchoolSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolSource::Private => "private",
            SchoolSource::Public => "public",
        }
    }
}

impl fmt::Display for SchoolSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse grade band a school is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchoolLevel {
    Elementary,
    Middle,
    High,
    Combined,
}

impl SchoolLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolLevel::Elementary => "Elementary",
            SchoolLevel::Middle => "Middle",
            SchoolLevel::High => "High",
            SchoolLevel::Combined => "Combined",
        }
    }

    /// Private-school level codes: 1, 2 and 3 are the only assigned values.
    pub fn from_private_code(code: i64) -> Option<SchoolLevel> {
        match code {
            1 => Some(SchoolLevel::Elementary),
            2 => Some(SchoolLevel::High),
            3 => Some(SchoolLevel::Combined),
            _ => None,
        }
    }

    /// Look up a public-school level label. The label is uppercased before matching.
    pub fn lookup_public_label(label: &str) -> PublicLevelLookup {
        match label.to_uppercase().as_str() {
            "ELEMENTARY" | "PREKINDERGARTEN" => PublicLevelLookup::Level(SchoolLevel::Elementary),
            "MIDDLE" => PublicLevelLookup::Level(SchoolLevel::Middle),
            "HIGH" => PublicLevelLookup::Level(SchoolLevel::High),
            "SECONDARY" | "OTHER" | "UNGRADED" => PublicLevelLookup::Level(SchoolLevel::Combined),
            "NOT REPORTED" | "NOT APPLICABLE" | "ADULT EDUCATION" => PublicLevelLookup::NoLevel,
            _ => PublicLevelLookup::Unknown,
        }
    }

    pub fn from_public_label(label: &str) -> Option<SchoolLevel> {
        match Self::lookup_public_label(label) {
            PublicLevelLookup::Level(level) => Some(level),
            PublicLevelLookup::NoLevel | PublicLevelLookup::Unknown => None,
        }
    }
}

impl fmt::Display for SchoolLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a public level label lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicLevelLookup {
    /// Label maps to a grade band
    Level(SchoolLevel),
    /// Label is known but deliberately carries no grade band
    NoLevel,
    /// Label is not in the table
    Unknown,
}

/// One school: a geometry plus its attribute columns
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolRecord {
    /// Feature `id` member, written back out unchanged
    pub id: Option<Id>,
    pub geometry: Option<Geometry<f64>>,
    pub properties: Map<String, Value>,
}

impl SchoolRecord {
    pub fn new(geometry: Option<Geometry<f64>>, properties: Map<String, Value>) -> Self {
        Self {
            id: None,
            geometry,
            properties,
        }
    }

    pub fn with_id(mut self, id: Option<Id>) -> Self {
        self.id = id;
        self
    }

    /// Attribute value, treating an absent key as null
    pub fn get(&self, column: &str) -> &Value {
        self.properties.get(column).unwrap_or(&Value::Null)
    }
}

/// A tabular collection of school features sharing one CRS and column list
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolFrame {
    pub source: SchoolSource,
    /// Declared coordinate reference system, `None` when the input carried none
    pub crs: Option<Crs>,
    /// Attribute column names in order (geometry is kept separately)
    pub columns: Vec<String>,
    pub records: Vec<SchoolRecord>,
}

impl SchoolFrame {
    pub fn new(source: SchoolSource, crs: Option<Crs>) -> Self {
        Self {
            source,
            crs,
            columns: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Append a column name if not present yet
    pub fn add_column(&mut self, column: &str) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
    }

    /// Set `column` on every row from `values`, adding the column if needed.
    /// `values` must yield one entry per row.
    pub fn set_column<I>(&mut self, column: &str, values: I)
    where
        I: IntoIterator<Item = Value>,
    {
        self.add_column(column);
        for (record, value) in self.records.iter_mut().zip(values) {
            record.properties.insert(column.to_string(), value);
        }
    }
}

/// The merged output: rows from both sources on one schema, always in WGS84
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedSchools {
    pub crs: Crs,
    pub columns: Vec<String>,
    pub records: Vec<SchoolRecord>,
}

impl UnifiedSchools {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
