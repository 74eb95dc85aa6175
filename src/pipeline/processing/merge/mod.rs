use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::constants::SCHOOL_ID_COLUMN;
use crate::crs::Crs;
use crate::domain::{SchoolFrame, SchoolRecord, UnifiedSchools};
use crate::metrics::MergeMetrics;

/// Sorted union of the column names of every frame.
/// `school_id` is left out; the merge appends it last.
pub fn union_columns(frames: &[&SchoolFrame]) -> Vec<String> {
    frames
        .iter()
        .flat_map(|frame| frame.columns.iter())
        .filter(|column| column.as_str() != SCHOOL_ID_COLUMN)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Copy of `frame` whose columns are exactly `columns`, in that order.
/// Values missing from a row become null and columns outside the target are dropped.
pub fn align_to_schema(frame: &SchoolFrame, columns: &[String]) -> SchoolFrame {
    let records = frame
        .records
        .iter()
        .map(|record| {
            let properties = columns
                .iter()
                .map(|column| (column.clone(), record.get(column).clone()))
                .collect::<Map<String, Value>>();
            SchoolRecord::new(record.geometry.clone(), properties).with_id(record.id.clone())
        })
        .collect();

    SchoolFrame {
        source: frame.source,
        crs: frame.crs,
        columns: columns.to_vec(),
        records,
    }
}

/// Concatenate private then public rows on a shared schema and number them.
#[instrument(skip_all, fields(private = private.len(), public = public.len()))]
pub fn merge_frames(private: &SchoolFrame, public: &SchoolFrame) -> UnifiedSchools {
    if private.has_column(SCHOOL_ID_COLUMN) || public.has_column(SCHOOL_ID_COLUMN) {
        warn!("Input column '{}' is replaced by the generated id", SCHOOL_ID_COLUMN);
    }

    let mut columns = union_columns(&[private, public]);
    let private = align_to_schema(private, &columns);
    let public = align_to_schema(public, &columns);

    let records: Vec<SchoolRecord> = private
        .records
        .into_iter()
        .chain(public.records)
        .enumerate()
        .map(|(index, mut record)| {
            record
                .properties
                .insert(SCHOOL_ID_COLUMN.to_string(), Value::from(index as u64));
            record
        })
        .collect();
    columns.push(SCHOOL_ID_COLUMN.to_string());

    MergeMetrics::record_merged(records.len(), columns.len());
    info!("Merged {} rows over {} columns", records.len(), columns.len());

    UnifiedSchools {
        crs: Crs::Wgs84,
        columns,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SchoolSource;
    use serde_json::json;

    fn frame(source: SchoolSource, rows: Vec<Value>) -> SchoolFrame {
        let mut frame = SchoolFrame::new(source, Some(Crs::Wgs84));
        for row in rows {
            let properties = row.as_object().cloned().unwrap();
            for key in properties.keys() {
                frame.add_column(key);
            }
            frame.records.push(SchoolRecord::new(None, properties));
        }
        frame
    }

    #[test]
    fn test_align_fills_nulls_in_target_order() {
        let f = frame(SchoolSource::Private, vec![json!({"b": 1, "a": 2})]);
        let target = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let aligned = align_to_schema(&f, &target);

        assert_eq!(aligned.columns, target);
        let keys: Vec<&String> = aligned.records[0].properties.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(aligned.records[0].get("c"), &Value::Null);
        // input untouched
        assert_eq!(f.columns, vec!["b", "a"]);
    }

    #[test]
    fn test_align_keeps_feature_id() {
        let mut f = frame(SchoolSource::Public, vec![json!({"a": 1})]);
        f.records[0].id = Some(geojson::feature::Id::Number(7.into()));

        let aligned = align_to_schema(&f, &["a".to_string()]);

        assert_eq!(aligned.records[0].id, f.records[0].id);
    }

    #[test]
    fn test_disjoint_columns_are_unioned() {
        let private = frame(SchoolSource::Private, vec![json!({"city": "SF", "a": "p"})]);
        let public = frame(
            SchoolSource::Public,
            vec![json!({"city": "SF", "b": "q"}), json!({"city": "SF", "b": "r"})],
        );

        let merged = merge_frames(&private, &public);

        assert_eq!(merged.columns, vec!["a", "b", "city", "school_id"]);
        assert_eq!(merged.records[0].get("b"), &Value::Null);
        assert_eq!(merged.records[1].get("a"), &Value::Null);
        assert_eq!(merged.records[2].get("b"), &json!("r"));
        assert_eq!(merged.crs, Crs::Wgs84);
    }

    #[test]
    fn test_school_ids_are_positional() {
        let private = frame(SchoolSource::Private, vec![json!({"n": 1}), json!({"n": 2})]);
        let public = frame(SchoolSource::Public, vec![json!({"n": 3, "school_id": 99})]);

        let merged = merge_frames(&private, &public);

        let ids: Vec<&Value> = merged.records.iter().map(|r| r.get("school_id")).collect();
        assert_eq!(ids, vec![&json!(0), &json!(1), &json!(2)]);
        assert_eq!(merged.records[2].get("n"), &json!(3));
        assert_eq!(merged.columns.last().map(String::as_str), Some("school_id"));
        assert_eq!(merged.columns.iter().filter(|c| *c == "school_id").count(), 1);
    }

    #[test]
    fn test_empty_inputs_still_have_schema() {
        let private = SchoolFrame {
            columns: vec!["level_clean".to_string()],
            ..SchoolFrame::new(SchoolSource::Private, Some(Crs::Wgs84))
        };
        let public = SchoolFrame::new(SchoolSource::Public, Some(Crs::Wgs84));

        let merged = merge_frames(&private, &public);

        assert!(merged.is_empty());
        assert_eq!(merged.columns, vec!["level_clean", "school_id"]);
    }
}
