//! Loads a GeoJSON file into a headless editor and prints the synchronized
//! edit layer output.
//!
//! ```text
//! geoedit <features.geojson> [config.json|config.toml]
//! ```

use anyhow::{bail, Context};
use geo::{BoundingRect, GeometryCollection};
use geoedit::{init_logging, EditorConfig, HeadlessBackend, MapBackend, MapEditor, MapViewport};
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let Some(input) = args.next() else {
        bail!("usage: geoedit <features.geojson> [config.json|config.toml]");
    };

    let config = match args.next() {
        Some(path) => EditorConfig::load_from_file(&path)?,
        None => EditorConfig::load_or_default()?,
    };

    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", input.display()))?;

    let backend = HeadlessBackend::new(MapViewport::default(), config.hit_tolerance);
    let mut editor = MapEditor::new(Arc::new(config), backend)?;
    let ids = editor.load_geojson(&value)?;

    if let Some(bounds) = editor.bounds() {
        let outside = ids
            .iter()
            .filter_map(|id| editor.edit_layer().get(*id))
            .filter(|feature| !bounds.contains_geometry(&feature.geometry))
            .count();
        if outside > 0 {
            tracing::warn!("{} feature(s) lie outside the configured bounds", outside);
        }
    }

    let loaded: GeometryCollection<f64> = editor
        .edit_layer()
        .store()
        .iter()
        .map(|feature| feature.geometry.clone())
        .collect();
    if let Some(extent) = loaded.bounding_rect() {
        editor.backend_mut().fit(extent);
        tracing::info!("View: {}", editor.backend().viewport());
    }

    match editor.output() {
        Some(output) => {
            println!("{}", output.geojson);
            tracing::info!("Total area: {:.2}", output.total_area);
        }
        None => tracing::info!("Nothing loaded"),
    }

    Ok(())
}
