use geo::Coord;
use geoedit_core::{AppEvent, EventFilter, Pixel};
use geoedit_editor::viewport::MAX_RESOLUTION;
use geoedit_editor::{HeadlessBackend, MapEditor, MapViewport};
use geoedit_settings::EditorConfig;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

pub type Editor = MapEditor<HeadlessBackend>;

/// 1200x800 view centered on (500, 500) at one map unit per pixel.
pub fn backend() -> HeadlessBackend {
    let mut viewport = MapViewport::default();
    viewport.set_center(Coord { x: 500.0, y: 500.0 });
    viewport.set_zoom(MAX_RESOLUTION.log2());
    HeadlessBackend::new(viewport, 5.0)
}

/// Pixel showing map coordinate `(x, y)` in [`backend`].
pub fn pixel(x: f64, y: f64) -> Pixel {
    Pixel::new(600.0 + (x - 500.0), 400.0 - (y - 500.0))
}

pub fn bounded_config() -> EditorConfig {
    EditorConfig {
        bounds: Some(json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1000.0, 0.0], [1000.0, 1000.0], [0.0, 1000.0], [0.0, 0.0]]]
        })),
        bounds_message: "Outside the parcel".to_string(),
        ..Default::default()
    }
}

pub fn editor(config: EditorConfig) -> Editor {
    MapEditor::new(Arc::new(config), backend()).expect("editor")
}

/// Collects every event published on the editor's bus.
pub fn record(editor: &Editor) -> Arc<Mutex<Vec<AppEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    editor
        .bus()
        .subscribe(EventFilter::All, move |event| sink.lock().push(event));
    events
}
