use crate::support::{editor, pixel, record};
use geo::{polygon, Geometry};
use geoedit_core::{AppEvent, FeatureEvent, FeatureId, LayerId, Mode, SelectionEvent};
use geoedit_editor::{Feature, FeatureStyle, Key, MapEvent, ReferenceLayer};
use geoedit_settings::EditorConfig;
use serde_json::json;

fn square(min: f64, max: f64) -> Geometry<f64> {
    polygon![(x: min, y: min), (x: max, y: min), (x: max, y: max), (x: min, y: max)].into()
}

fn two_squares(editor: &mut crate::support::Editor) -> (FeatureId, FeatureId) {
    let a = editor.add_feature(square(100.0, 200.0), Default::default());
    let b = editor.add_feature(square(300.0, 400.0), Default::default());
    (a, b)
}

fn click(editor: &mut crate::support::Editor, x: f64, y: f64) {
    editor.handle_event(MapEvent::Click { pixel: pixel(x, y) });
}

#[test]
fn test_click_toggles_selection() {
    let mut editor = editor(EditorConfig::default());
    let (a, b) = two_squares(&mut editor);
    editor.set_mode(Mode::ModifyFeatures);

    click(&mut editor, 150.0, 150.0);
    assert_eq!(editor.selection(), &[a]);

    click(&mut editor, 350.0, 350.0);
    assert_eq!(editor.selection(), &[b]);

    editor.handle_event(MapEvent::KeyDown(Key::Shift));
    assert!(editor.is_multi_select());
    click(&mut editor, 150.0, 150.0);
    assert_eq!(editor.selection(), &[b, a]);
    click(&mut editor, 350.0, 350.0);
    assert_eq!(editor.selection(), &[a]);

    // empty clicks are ignored while multi-selecting
    click(&mut editor, 800.0, 800.0);
    assert_eq!(editor.selection(), &[a]);

    editor.handle_event(MapEvent::KeyUp(Key::Shift));
    assert!(!editor.is_multi_select());
    click(&mut editor, 800.0, 800.0);
    assert!(editor.selection().is_empty());
}

#[test]
fn test_multi_reset_clears_on_next_click() {
    let config = EditorConfig {
        select_multi_reset: true,
        ..Default::default()
    };
    let mut editor = editor(config);
    let (a, b) = two_squares(&mut editor);
    editor.set_mode(Mode::ModifyFeatures);

    editor.handle_event(MapEvent::KeyDown(Key::Shift));
    click(&mut editor, 150.0, 150.0);
    click(&mut editor, 350.0, 350.0);
    assert_eq!(editor.selection(), &[a, b]);
    editor.handle_event(MapEvent::KeyUp(Key::Shift));

    click(&mut editor, 150.0, 150.0);
    assert_eq!(editor.selection(), &[a]);
}

#[test]
fn test_selection_events() {
    let mut editor = editor(EditorConfig::default());
    two_squares(&mut editor);
    editor.set_mode(Mode::ModifyFeatures);
    let events = record(&editor);

    editor.handle_event(MapEvent::KeyDown(Key::Shift));
    click(&mut editor, 150.0, 150.0);
    click(&mut editor, 350.0, 350.0);
    editor.handle_event(MapEvent::KeyUp(Key::Shift));

    let seen: Vec<String> = events
        .lock()
        .iter()
        .filter_map(|event| match event {
            AppEvent::Selection(SelectionEvent::MultiSelect { on }) => Some(format!("multi:{}", on)),
            AppEvent::Selection(SelectionEvent::Changed { count }) => Some(format!("count:{}", count)),
            _ => None,
        })
        .collect();
    assert_eq!(seen, vec!["multi:true", "count:1", "count:2", "multi:false"]);
}

#[test]
fn test_selection_cleared_between_groups() {
    let mut editor = editor(EditorConfig::default());
    let (a, _) = two_squares(&mut editor);
    editor.set_mode(Mode::ModifyFeatures);
    click(&mut editor, 150.0, 150.0);
    assert_eq!(editor.selection(), &[a]);

    editor.set_mode(Mode::CutFeatures);
    assert!(editor.selection().is_empty());
}

#[test]
fn test_delete_key_removes_selection() {
    let mut editor = editor(EditorConfig::default());
    let (a, b) = two_squares(&mut editor);
    editor.set_mode(Mode::ModifyFeatures);
    click(&mut editor, 150.0, 150.0);

    let syncs = editor.edit_layer().sync_count();
    editor.handle_event(MapEvent::KeyDown(Key::Delete));
    assert!(editor.edit_layer().get(a).is_none());
    assert!(editor.edit_layer().get(b).is_some());
    assert!(editor.selection().is_empty());
    assert_eq!(editor.edit_layer().sync_count(), syncs + 1);
}

#[test]
fn test_delete_mode_click() {
    let mut editor = editor(EditorConfig::default());
    let (a, b) = two_squares(&mut editor);
    let locked = editor.insert_feature(Feature::new(square(500.0, 600.0)).read_only());
    editor.set_mode(Mode::DeleteFeatures);

    click(&mut editor, 350.0, 350.0);
    click(&mut editor, 550.0, 550.0);
    assert!(editor.edit_layer().get(b).is_none());
    assert!(editor.edit_layer().get(a).is_some());
    assert!(editor.edit_layer().get(locked).is_some());
}

#[test]
fn test_hover_and_style_precedence() {
    let mut editor = editor(EditorConfig::default());
    let (a, b) = two_squares(&mut editor);
    let events = record(&editor);
    editor.set_mode(Mode::ModifyFeatures);

    editor.handle_event(MapEvent::PointerMove {
        pixel: pixel(150.0, 150.0),
    });
    assert_eq!(editor.feature_style(a), FeatureStyle::Hover);
    assert_eq!(editor.feature_style(b), FeatureStyle::Default);

    click(&mut editor, 150.0, 150.0);
    assert_eq!(editor.feature_style(a), FeatureStyle::Selected);

    editor.handle_event(MapEvent::PointerMove {
        pixel: pixel(800.0, 800.0),
    });
    assert!(editor.hovered().is_none());

    let pointer: Vec<&'static str> = events
        .lock()
        .iter()
        .filter_map(|event| match event {
            AppEvent::Feature(FeatureEvent::Hover(_)) => Some("hover"),
            AppEvent::Feature(FeatureEvent::Leave(_)) => Some("leave"),
            _ => None,
        })
        .collect();
    assert_eq!(pointer, vec!["hover", "leave"]);
}

#[test]
fn test_search_parcel_click_fits_view() {
    let mut editor = editor(EditorConfig::default());
    let mut parcels = ReferenceLayer::new("parcels");
    let mut properties = serde_json::Map::new();
    properties.insert("parcel".to_string(), json!("12/4"));
    parcels.add(square(450.0, 550.0), properties);
    editor.add_reference_layer(parcels);
    let events = record(&editor);

    editor.set_mode(Mode::SearchParcel);
    let zoom_before = editor.backend().viewport().zoom();
    click(&mut editor, 500.0, 500.0);

    let clicked: Vec<_> = events
        .lock()
        .iter()
        .filter_map(|event| match event {
            AppEvent::Feature(FeatureEvent::Click(info)) => Some(info.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(clicked.len(), 1);
    assert_eq!(clicked[0].layer_id, LayerId::Reference("parcels".to_string()));
    assert_eq!(clicked[0].properties.get("parcel"), Some(&json!("12/4")));
    assert!(editor.backend().viewport().zoom() > zoom_before);
}

#[test]
fn test_hidden_reference_layer_leaves_snap_index() {
    let mut editor = editor(EditorConfig::default());
    let mut parcels = ReferenceLayer::new("parcels");
    let id = parcels.add(square(0.0, 10.0), Default::default());
    editor.add_reference_layer(parcels);
    let layer = LayerId::Reference("parcels".to_string());
    assert!(editor.snap_index().contains(&layer, id));

    assert!(editor.set_layer_visible("parcels", false));
    assert!(!editor.snap_index().contains(&layer, id));
    assert!(!editor.set_layer_visible("missing", true));
}

#[test]
fn test_select_features_builds_buffer_previews() {
    let mut editor = editor(EditorConfig::default());
    let (a, b) = two_squares(&mut editor);
    let locked = editor.insert_feature(Feature::new(square(500.0, 600.0)).read_only());
    let events = record(&editor);

    // outside selectable modes nothing is selected
    assert_eq!(editor.select_features([a]), 0);

    editor.set_mode(Mode::BufferFeatures);
    assert_eq!(editor.select_features([a, b, locked, FeatureId(999)]), 2);
    assert_eq!(editor.selection(), &[a, b]);
    assert_eq!(editor.buffer_previews().len(), 2);

    // the same selection again is not a change
    assert_eq!(editor.select_features([a, b]), 2);
    let changes = events
        .lock()
        .iter()
        .filter(|event| matches!(event, AppEvent::Selection(SelectionEvent::Changed { .. })))
        .count();
    assert_eq!(changes, 1);
}
