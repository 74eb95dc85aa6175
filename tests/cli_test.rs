use std::fs;
use std::process::Command;

use serde_json::{json, Value};
use tempfile::tempdir;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sf_schools"))
}

#[test]
fn test_wrong_argument_count_prints_usage() {
    for args in [vec![], vec!["a.geojson", "b.geojson"], vec!["a", "b", "c", "d"]] {
        let output = binary().args(&args).output().unwrap();
        assert_eq!(output.status.code(), Some(1));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.contains("Usage: sf_schools private.geojson public.geojson output.geojson"),
            "{}",
            stdout
        );
    }
}

#[test]
fn test_help_and_version_flags_print_usage() {
    for flag in ["--help", "-h", "--version", "-V"] {
        let output = binary().arg(flag).output().unwrap();
        assert_eq!(output.status.code(), Some(1), "{}", flag);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(
            stdout.trim_end(),
            "Usage: sf_schools private.geojson public.geojson output.geojson"
        );
    }
}

#[test]
fn test_successful_run_prints_progress() {
    let dir = tempdir().unwrap();
    let private = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [-122.4194, 37.7749]},
            "properties": {"level_": 3, "enrollment": 120, "city": "San Francisco", "county": "San Francisco"}
        }]
    });
    let public = json!({"type": "FeatureCollection", "features": []});
    let private_path = dir.path().join("private.geojson");
    let public_path = dir.path().join("public.geojson");
    let output_path = dir.path().join("out.geojson");
    fs::write(&private_path, private.to_string()).unwrap();
    fs::write(&public_path, public.to_string()).unwrap();

    let output = binary()
        .arg(&private_path)
        .arg(&public_path)
        .arg(&output_path)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Loading input files...".to_string(),
            "Processing...".to_string(),
            format!("Saving cleaned dataset to: {}", output_path.display()),
            "Done!".to_string(),
        ]
    );

    let written: Value = serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(written["features"][0]["properties"]["level_clean"], "Combined");
    assert_eq!(written["features"][0]["properties"]["school_id"], 0);
}

#[test]
fn test_pipeline_error_exits_with_status_one() {
    let dir = tempdir().unwrap();
    let output = binary()
        .arg(dir.path().join("missing_private.geojson"))
        .arg(dir.path().join("missing_public.geojson"))
        .arg(dir.path().join("out.geojson"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}
