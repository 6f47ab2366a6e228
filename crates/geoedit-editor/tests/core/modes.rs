use crate::support::{backend, editor, pixel, record, Editor};
use geo::{point, polygon};
use geoedit_core::{AppEvent, FeatureId, Mode, ModeEvent, SnapEvent};
use geoedit_editor::{
    DrawKind, EditStyle, InteractionKind, Key, MapEditor, MapEvent, ModifyTarget,
};
use geoedit_settings::EditorConfig;
use std::sync::Arc;

#[test]
fn test_reentering_mode_is_idempotent() {
    let mut editor = editor(EditorConfig::default());
    for mode in Mode::ALL {
        editor.set_mode(mode);
        let kinds = editor.backend().interaction_kinds();
        let marker = editor.backend().marker();
        let style = editor.backend().edit_style();
        let armed = editor.buffer_state().is_armed();

        editor.set_mode(mode);
        assert_eq!(editor.mode(), mode);
        assert_eq!(editor.backend().interaction_kinds(), kinds, "{}", mode);
        assert_eq!(editor.backend().marker(), marker, "{}", mode);
        assert_eq!(editor.backend().edit_style(), style, "{}", mode);
        assert_eq!(editor.buffer_state().is_armed(), armed, "{}", mode);
        assert!(editor.sketch().is_empty());
        assert!(editor.pending().is_empty());
    }
}

#[test]
fn test_mode_change_emits_event_and_marker() {
    let mut editor = editor(EditorConfig::default());
    let events = record(&editor);
    editor.set_mode(Mode::ZoomBox);

    assert_eq!(editor.backend().marker(), Some("mode-zoom-box"));
    assert!(events.lock().iter().any(|event| matches!(
        event,
        AppEvent::Mode(ModeEvent::Changed { mode: Mode::ZoomBox })
    )));
}

#[test]
fn test_interactions_per_mode() {
    let mut editor = editor(EditorConfig::default());

    editor.set_mode(Mode::View);
    assert_eq!(
        editor.backend().interaction_kinds(),
        vec![
            InteractionKind::DragPan,
            InteractionKind::MouseWheelZoom,
            InteractionKind::DoubleClickZoom,
            InteractionKind::KeyboardPan,
        ]
    );

    editor.set_mode(Mode::DrawPolygons);
    let kinds = editor.backend().interaction_kinds();
    assert_eq!(kinds[0], InteractionKind::Draw(DrawKind::Polygon));
    assert_eq!(kinds[1], InteractionKind::Snap);

    editor.set_mode(Mode::BufferFeaturesEdit);
    let kinds = editor.backend().interaction_kinds();
    assert_eq!(kinds[0], InteractionKind::Modify(ModifyTarget::Sketch));
    assert_eq!(editor.backend().edit_style(), EditStyle::Interactive);
}

#[test]
fn test_snapping_toggle_reinstalls_interactions() {
    let mut editor = editor(EditorConfig::default());
    editor.set_mode(Mode::DrawLines);
    assert!(editor
        .backend()
        .interaction_kinds()
        .contains(&InteractionKind::Snap));

    let events = record(&editor);
    editor.set_snapping(false);
    assert!(!editor.is_snapping());
    assert!(!editor
        .backend()
        .interaction_kinds()
        .contains(&InteractionKind::Snap));
    assert!(events
        .lock()
        .iter()
        .any(|event| matches!(event, AppEvent::Snap(SnapEvent::Toggled { on: false }))));

    editor.set_snapping(true);
    assert!(editor
        .backend()
        .interaction_kinds()
        .contains(&InteractionKind::Snap));
}

#[test]
fn test_snapping_unavailable_without_show() {
    let mut config = EditorConfig::default();
    config.snapping.show = false;
    let mut editor = editor(config);
    editor.set_mode(Mode::DrawLines);
    editor.set_snapping(true);

    assert!(!editor.is_snapping());
    assert!(!editor
        .backend()
        .interaction_kinds()
        .contains(&InteractionKind::Snap));
}

#[test]
fn test_snap_follows_edit_layer() {
    let mut editor = editor(EditorConfig::default());
    editor.set_mode(Mode::DrawPoints);
    editor.add_feature(point!(x: 100.0, y: 100.0).into(), Default::default());

    let snapped = editor.backend().snap(geo::Coord { x: 103.0, y: 100.0 });
    assert_eq!(snapped, geo::Coord { x: 100.0, y: 100.0 });
}

#[test]
fn test_read_only_editor_falls_back_to_view() {
    let config = EditorConfig {
        editable: false,
        ..Default::default()
    };
    let mut editor = MapEditor::new(Arc::new(config), backend()).expect("editor");
    editor.set_mode(Mode::DrawPolygons);

    assert_eq!(editor.mode(), Mode::DrawPolygons);
    assert!(!editor
        .backend()
        .interaction_kinds()
        .iter()
        .any(|kind| matches!(kind, InteractionKind::Draw(_))));

    editor.handle_event(MapEvent::DrawStart);
    editor.handle_event(MapEvent::DrawEnd {
        geometry: point!(x: 1.0, y: 1.0).into(),
    });
    assert!(editor.edit_layer().is_empty());
}

fn read_only_with_square() -> (Editor, FeatureId) {
    let config = EditorConfig {
        editable: false,
        ..Default::default()
    };
    let mut editor = MapEditor::new(Arc::new(config), backend()).expect("editor");
    let id = editor.add_feature(
        polygon![
            (x: 100.0, y: 100.0),
            (x: 200.0, y: 100.0),
            (x: 200.0, y: 200.0),
            (x: 100.0, y: 200.0),
        ]
        .into(),
        Default::default(),
    );
    (editor, id)
}

#[test]
fn test_read_only_editor_ignores_delete_click() {
    let (mut editor, id) = read_only_with_square();
    editor.set_mode(Mode::DeleteFeatures);
    assert!(!editor.can_edit());

    editor.handle_event(MapEvent::Click {
        pixel: pixel(150.0, 150.0),
    });
    assert!(editor.edit_layer().get(id).is_some());
}

#[test]
fn test_read_only_editor_ignores_delete_key() {
    let (mut editor, id) = read_only_with_square();
    editor.set_mode(Mode::ModifyFeatures);
    editor.handle_event(MapEvent::Click {
        pixel: pixel(150.0, 150.0),
    });
    assert!(editor.selection().is_empty());

    editor.handle_event(MapEvent::KeyDown(Key::Delete));
    assert_eq!(editor.delete_selected(), 0);
    assert!(editor.edit_layer().get(id).is_some());
}

#[test]
fn test_read_only_editor_never_accepts_buffers() {
    let (mut editor, id) = read_only_with_square();
    editor.set_mode(Mode::BufferFeatures);
    editor.handle_event(MapEvent::Click {
        pixel: pixel(150.0, 150.0),
    });
    assert!(editor.buffer_previews().is_empty());

    assert_eq!(editor.accept_buffer(), 0);
    assert_eq!(editor.edit_layer().len(), 1);
    assert!(editor.edit_layer().get(id).is_some());

    editor.set_mode(Mode::BufferFeaturesDynamic);
    assert!(!editor.buffer_state().is_armed());
    editor.set_buffer(true);
    assert!(!editor.buffer_state().is_armed());
}

#[test]
fn test_zoom_box_fits_extent() {
    let mut editor = editor(EditorConfig::default());
    editor.set_mode(Mode::ZoomBox);
    editor.handle_event(MapEvent::BoxEnd {
        extent: geo::Rect::new(
            geo::Coord { x: 0.0, y: 0.0 },
            geo::Coord { x: 100.0, y: 100.0 },
        ),
    });

    let center = editor.backend().viewport().center();
    assert_eq!(center, geo::Coord { x: 50.0, y: 50.0 });
}
