use crate::support::{bounded_config, editor, pixel, record};
use geo::{line_string, polygon, BoundingRect, Geometry};
use geoedit_core::{AppEvent, BufferEvent, GeometryError, Mode};
use geoedit_editor::bounds::BoundsValidator;
use geoedit_editor::pipeline::compute_buffer;
use geoedit_editor::{GeoEngine, GeometryEngine, MapEvent};
use geoedit_settings::EditorConfig;
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_accept_buffer_replaces_target() {
    let mut editor = editor(bounded_config());
    let target = editor.add_feature(
        line_string![(x: 100.0, y: 500.0), (x: 900.0, y: 500.0)].into(),
        Default::default(),
    );

    editor.set_mode(Mode::BufferFeatures);
    editor.set_buffer_params(300.0, 3).expect("valid params");
    editor.handle_event(MapEvent::Click {
        pixel: pixel(500.0, 500.0),
    });
    assert_eq!(editor.selection(), &[target]);
    assert_eq!(editor.buffer_previews().len(), 1);
    assert_eq!(editor.sketch().len(), 1);

    // previews leave the source untouched
    assert!(matches!(
        editor.edit_layer().get(target).map(|f| &f.geometry),
        Some(Geometry::LineString(_))
    ));

    assert_eq!(editor.accept_buffer(), 1);
    assert!(editor.edit_layer().get(target).is_none());
    assert_eq!(editor.edit_layer().len(), 1);
    assert!(editor.sketch().is_empty());
    assert!(editor.selection().is_empty());

    let buffered = editor.edit_layer().store().iter().next().expect("buffer");
    assert!(matches!(
        buffered.geometry,
        Geometry::Polygon(_) | Geometry::MultiPolygon(_)
    ));

    let rect = buffered.geometry.bounding_rect().expect("extent");
    assert!(rect.min().x >= -1e-6 && rect.max().x <= 1000.0 + 1e-6);
    assert!((rect.min().y - 200.0).abs() < 1e-6 && (rect.max().y - 800.0).abs() < 1e-6);

    let area = GeoEngine::new().area(&buffered.geometry);
    assert!(area > 800.0 * 600.0 && area <= 1000.0 * 600.0 + 1e-6);
    assert_eq!(editor.output().map(|o| o.total_area), Some(area));
}

#[test]
fn test_cancel_buffer_drops_previews() {
    let mut editor = editor(EditorConfig::default());
    editor.add_feature(
        line_string![(x: 400.0, y: 500.0), (x: 600.0, y: 500.0)].into(),
        Default::default(),
    );
    editor.set_mode(Mode::BufferFeatures);
    editor.handle_event(MapEvent::Click {
        pixel: pixel(500.0, 500.0),
    });
    assert_eq!(editor.buffer_previews().len(), 1);

    editor.cancel_buffer();
    assert!(editor.buffer_previews().is_empty());
    assert!(editor.sketch().is_empty());
    assert!(editor.selection().is_empty());
    assert_eq!(editor.accept_buffer(), 0);
}

#[test]
fn test_buffer_edit_keeps_selection() {
    let mut editor = editor(EditorConfig::default());
    let target = editor.add_feature(
        line_string![(x: 400.0, y: 500.0), (x: 600.0, y: 500.0)].into(),
        Default::default(),
    );
    editor.set_mode(Mode::BufferFeatures);
    editor.handle_event(MapEvent::Click {
        pixel: pixel(500.0, 500.0),
    });

    editor.set_mode(Mode::BufferFeaturesEdit);
    assert_eq!(editor.selection(), &[target]);
    assert_eq!(editor.buffer_previews().len(), 1);

    editor.set_mode(Mode::View);
    assert!(editor.selection().is_empty());
    assert!(editor.sketch().is_empty());
}

#[test]
fn test_buffer_params_validation() {
    let mut editor = editor(EditorConfig::default());
    let events = record(&editor);

    assert_eq!(
        editor.set_buffer_params(10.0, 0),
        Err(GeometryError::InvalidBuffer {
            radius: 10.0,
            segments: 0
        })
    );
    assert!(editor.set_buffer_params(f64::NAN, 4).is_err());

    editor.set_buffer_params(25.0, 6).expect("valid params");
    assert_eq!(editor.buffer_state().radius, 25.0);
    assert_eq!(editor.buffer_state().segments, 6);
    assert!(events.lock().iter().any(|event| matches!(
        event,
        AppEvent::Buffer(BufferEvent::Changed { radius, segments: 6, .. }) if *radius == 25.0
    )));
}

#[test]
fn test_buffered_drawing() {
    let mut editor = editor(EditorConfig::default());
    editor.set_buffer(true);
    editor.set_mode(Mode::DrawLines);
    assert!(editor.buffer_state().is_armed());

    let line: Geometry<f64> = line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)].into();
    editor.handle_event(MapEvent::DrawStart);
    editor.handle_event(MapEvent::DrawUpdate {
        geometry: line.clone(),
    });
    assert_eq!(editor.sketch().len(), 1);

    editor.handle_event(MapEvent::DrawEnd { geometry: line });
    editor.handle_event(MapEvent::InteractionFinished);
    assert!(editor.sketch().is_empty());

    let feature = editor.edit_layer().store().iter().next().expect("feature");
    assert!(matches!(feature.geometry, Geometry::Polygon(_)));

    editor.set_mode(Mode::View);
    assert!(!editor.buffer_state().is_armed());
}

#[test]
fn test_dynamic_mode_always_buffers() {
    let mut editor = editor(EditorConfig::default());
    editor.set_mode(Mode::BufferFeaturesDynamic);
    assert!(!editor.buffer_state().on);
    assert!(editor.buffer_state().is_armed());
}

#[test]
fn test_clipped_buffer_is_subset() {
    let engine: Arc<dyn GeometryEngine> = Arc::new(GeoEngine::new());
    let bounds = BoundsValidator::from_geojson(
        &json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [50.0, 0.0], [50.0, 50.0], [0.0, 50.0], [0.0, 0.0]]]
        }),
        engine.clone(),
    )
    .expect("bounds");

    let square: Geometry<f64> = polygon![
        (x: 30.0, y: 30.0),
        (x: 45.0, y: 30.0),
        (x: 45.0, y: 45.0),
        (x: 30.0, y: 45.0),
    ]
    .into();

    let raw = compute_buffer(engine.as_ref(), &square, 10.0, 4, None).expect("raw");
    let direct = engine.buffer(&square, 10.0, 4).expect("direct");
    assert_eq!(raw, direct);

    let clipped = compute_buffer(engine.as_ref(), &square, 10.0, 4, Some(&bounds)).expect("clipped");
    assert!(engine.area(&clipped) < engine.area(&raw));
    assert!(engine.area(&clipped) >= 15.0 * 15.0);
}

#[test]
fn test_buffer_outside_all_bounds_is_unclipped() {
    let engine: Arc<dyn GeometryEngine> = Arc::new(GeoEngine::new());
    let bounds = BoundsValidator::from_geojson(
        &json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]]
        }),
        engine.clone(),
    )
    .expect("bounds");

    let far: Geometry<f64> = line_string![(x: 100.0, y: 100.0), (x: 120.0, y: 100.0)].into();
    let raw = compute_buffer(engine.as_ref(), &far, 2.0, 4, None).expect("raw");
    let clipped = compute_buffer(engine.as_ref(), &far, 2.0, 4, Some(&bounds)).expect("clipped");
    assert_eq!(raw, clipped);
}
