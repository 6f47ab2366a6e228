use crate::support::{bounded_config, editor, record};
use geo::{polygon, Geometry};
use geoedit_core::{AppEvent, EventCategory, EventFilter, Mode, ModeEvent, OutputEvent};
use geoedit_editor::geometry::io;
use geoedit_editor::{HeadlessBackend, MapEditor};
use geoedit_settings::EditorConfig;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

fn feature_collection(count: usize) -> serde_json::Value {
    let features: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            let x = i as f64 * 10.0;
            json!({
                "type": "Feature",
                "properties": { "index": i },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[x, 0.0], [x + 5.0, 0.0], [x + 5.0, 5.0], [x, 5.0], [x, 0.0]]]
                }
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

#[test]
fn test_bulk_load_syncs_once() {
    let mut editor = editor(EditorConfig::default());
    let outputs = Arc::new(Mutex::new(Vec::new()));
    let sink = outputs.clone();
    editor.bus().subscribe(
        EventFilter::Categories(vec![EventCategory::Output]),
        move |event| sink.lock().push(event),
    );
    let syncs = editor.edit_layer().sync_count();

    let ids = editor
        .load_geojson(&feature_collection(50))
        .expect("valid GeoJSON");

    assert_eq!(ids.len(), 50);
    assert_eq!(editor.edit_layer().len(), 50);
    assert_eq!(editor.edit_layer().sync_count(), syncs + 1);

    let outputs = outputs.lock();
    assert_eq!(outputs.len(), 1);
    let AppEvent::Output(OutputEvent::Changed {
        geojson,
        total_area,
    }) = &outputs[0]
    else {
        panic!("expected an output event");
    };
    assert_eq!(*total_area, 50.0 * 25.0);

    let parsed = io::parse_features(&serde_json::from_str(geojson).expect("json")).expect("features");
    assert_eq!(parsed.len(), 50);
    assert_eq!(parsed[7].1.get("index"), Some(&json!(7)));
}

#[test]
fn test_output_carries_crs() {
    let mut editor = editor(EditorConfig {
        crs: "EPSG:2056".to_string(),
        ..Default::default()
    });
    let square: Geometry<f64> =
        polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)].into();
    editor.add_feature(square, Default::default());

    let output = editor.output().expect("output");
    let value: serde_json::Value = serde_json::from_str(&output.geojson).expect("json");
    assert_eq!(value["crs"]["properties"]["name"], json!("EPSG:2056"));
    assert_eq!(output.total_area, 4.0);
}

#[test]
fn test_invalid_geojson_is_rejected() {
    let mut editor = editor(EditorConfig::default());
    let result = editor.load_geojson(&json!({ "type": "Nonsense" }));
    assert!(result.is_err_and(|e| e.is_geometry_error()));
    assert!(editor.edit_layer().is_empty());
}

#[test]
fn test_invalid_bounds_fail_construction() {
    let config = EditorConfig {
        bounds: Some(json!({ "type": "Point", "coordinates": [0.0, 0.0] })),
        ..Default::default()
    };
    let result = MapEditor::new(Arc::new(config), crate::support::backend());
    assert!(result.is_err_and(|e| e.is_config_error()));
}

#[test]
fn test_bounded_editor_exposes_bounds() {
    let editor = editor(bounded_config());
    let events = record(&editor);
    assert_eq!(editor.bounds().map(|b| b.polygons().len()), Some(1));
    assert!(events.lock().is_empty());
}

#[tokio::test]
async fn test_async_receiver_sees_mode_changes() {
    let mut editor = editor(EditorConfig::default());
    let mut receiver = editor.bus().receiver();

    editor.set_mode(Mode::ZoomBox);

    let event = receiver.recv().await.expect("event");
    assert!(matches!(
        event,
        AppEvent::Mode(ModeEvent::Changed { mode: Mode::ZoomBox })
    ));
}

#[test]
fn test_load_with_toml_config() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("editor.toml");
    std::fs::write(
        &path,
        r#"
editable = true
crs = "EPSG:2056"
maxViewHistory = 5

[buffer]
defaultRadius = 12.5
defaultSegments = 4
"#,
    )
    .expect("write config");

    let config = EditorConfig::load_from_file(&path).expect("config");
    assert_eq!(config.buffer.default_segments, 4);

    let mut editor = MapEditor::new(Arc::new(config), HeadlessBackend::default()).expect("editor");
    assert_eq!(editor.mode(), Mode::View);
    assert_eq!(editor.history().max_len(), 5);
    assert_eq!(editor.buffer_state().radius, 12.5);

    let ids = editor
        .load_geojson(&json!({
            "type": "Feature",
            "properties": { "name": "plot" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [3.0, 0.0], [3.0, 3.0], [0.0, 3.0], [0.0, 0.0]]]
            }
        }))
        .expect("geojson");
    assert_eq!(ids.len(), 1);

    let output = editor.output().expect("output");
    assert_eq!(output.total_area, 9.0);
    assert!(output.geojson.contains("EPSG:2056"));
    assert!(output.geojson.contains("plot"));
}
