//! The mode controller.
//!
//! [`MapEditor`] owns the edit layer, the transient collections (sketch,
//! measurement, selection, snap index, view history) and a [`MapBackend`].
//! Backend events arrive through [`MapEditor::handle_event`]; mode
//! transitions go through [`MapEditor::set_mode`].

mod buffer;
mod cut;
mod drawing;
mod events;
mod modes;
mod navigation;

pub use buffer::{BufferPreview, BufferState};
pub use events::{Key, MapEvent};
pub use navigation::scale_for_resolution;

use geo::Geometry;
use geoedit_core::{
    AppEvent, EventBus, EventBusError, FeatureId, LayerId, Mode, Result, SelectionEvent,
};
use geoedit_settings::EditorConfig;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::backend::{FeatureStyle, LayerHit, LayerStack, MapBackend};
use crate::bounds::BoundsValidator;
use crate::geometry::{io, GeoEngine, GeometryEngine};
use crate::interactions::InteractionRegistry;
use crate::layer::EditLayer;
use crate::model::{Feature, FeatureStore, Properties, ReferenceLayer};
use crate::output::{EditOutput, OutputSynchronizer};
use crate::pipeline::{self, Split};
use crate::selection_manager::SelectionManager;
use crate::snap::SnapIndex;
use crate::view_history::ViewHistory;

/// Work deferred until the running interaction reports it has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    RemoveFeature(FeatureId),
    ClearSketch,
    SetMode(Mode),
}

#[derive(Debug, Default)]
struct DrawSession {
    error: bool,
    preview: Option<FeatureId>,
}

pub struct MapEditor<B: MapBackend> {
    config: Arc<EditorConfig>,
    bus: Arc<EventBus>,
    engine: Arc<dyn GeometryEngine>,
    backend: B,
    registry: InteractionRegistry,
    mode: Mode,
    edit: EditLayer,
    references: Vec<ReferenceLayer>,
    sketch: FeatureStore,
    measure: FeatureStore,
    bounds: Option<BoundsValidator>,
    snap: SnapIndex,
    snapping: bool,
    selection: SelectionManager,
    history: ViewHistory,
    buffer: BufferState,
    previews: Vec<BufferPreview>,
    draw: Option<DrawSession>,
    hovered: Option<LayerHit>,
    pending: Vec<Continuation>,
}

impl<B: MapBackend> MapEditor<B> {
    pub fn new(config: Arc<EditorConfig>, backend: B) -> Result<Self> {
        Self::with_engine(config, backend, Arc::new(GeoEngine::new()))
    }

    pub fn with_engine(
        config: Arc<EditorConfig>,
        backend: B,
        engine: Arc<dyn GeometryEngine>,
    ) -> Result<Self> {
        Self::with_bus(config, backend, engine, Arc::new(EventBus::new()))
    }

    /// Builds an editor publishing on an existing bus.
    pub fn with_bus(
        config: Arc<EditorConfig>,
        backend: B,
        engine: Arc<dyn GeometryEngine>,
        bus: Arc<EventBus>,
    ) -> Result<Self> {
        config.validate()?;

        let bounds = config
            .bounds
            .as_ref()
            .map(|value| BoundsValidator::from_geojson(value, engine.clone()))
            .transpose()?;

        let output = OutputSynchronizer::new(bus.clone(), engine.clone(), config.crs.clone());
        let history = ViewHistory::with_epsilons(
            config.max_view_history,
            config.view_history.center_epsilon,
            config.view_history.zoom_epsilon,
        );

        let mut editor = Self {
            registry: InteractionRegistry::standard(config.editable),
            snapping: config.snapping.active && config.snapping_available(),
            selection: SelectionManager::new(config.select_multi_reset),
            buffer: BufferState::new(
                config.buffer.default_radius,
                config.buffer.default_segments,
            ),
            config,
            bus,
            engine,
            backend,
            mode: Mode::View,
            edit: EditLayer::new(output),
            references: Vec::new(),
            sketch: FeatureStore::new(),
            measure: FeatureStore::new(),
            bounds,
            snap: SnapIndex::new(),
            history,
            previews: Vec::new(),
            draw: None,
            hovered: None,
            pending: Vec::new(),
        };

        editor.set_mode(Mode::View);
        tracing::info!(
            "Map editor ready (editable: {}, bounds: {}, snapping: {})",
            editor.config.editable,
            editor.bounds.is_some(),
            editor.snapping
        );
        Ok(editor)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The editor's event bus; subscribe here for UI notifications.
    pub fn bus(&self) -> Arc<EventBus> {
        self.bus.clone()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn registry_mut(&mut self) -> &mut InteractionRegistry {
        &mut self.registry
    }

    pub fn edit_layer(&self) -> &EditLayer {
        &self.edit
    }

    pub fn output(&self) -> Option<&EditOutput> {
        self.edit.output()
    }

    pub fn sketch(&self) -> &FeatureStore {
        &self.sketch
    }

    pub fn measure_layer(&self) -> &FeatureStore {
        &self.measure
    }

    pub fn bounds(&self) -> Option<&BoundsValidator> {
        self.bounds.as_ref()
    }

    pub fn snap_index(&self) -> &SnapIndex {
        &self.snap
    }

    pub fn is_snapping(&self) -> bool {
        self.snapping
    }

    pub fn history(&self) -> &ViewHistory {
        &self.history
    }

    pub fn pending(&self) -> &[Continuation] {
        &self.pending
    }

    /// The selection; always empty outside selectable modes.
    pub fn selection(&self) -> &[FeatureId] {
        if self.mode.is_selectable() {
            self.selection.selected()
        } else {
            &[]
        }
    }

    /// Selects edit layer features without clicks, e.g. from a search result.
    /// Ids that are unknown or read-only are skipped. Returns the new
    /// selection size.
    pub fn select_features(&mut self, ids: impl IntoIterator<Item = FeatureId>) -> usize {
        if !(self.mode.is_selectable() && self.can_edit()) {
            tracing::warn!("Cannot select features in {}", self.mode);
            return 0;
        }
        let edit = &self.edit;
        let ids = ids
            .into_iter()
            .filter(|id| edit.get(*id).is_some_and(|f| f.editable));
        if self.selection.select(ids) {
            self.selection_changed();
            if matches!(self.mode, Mode::BufferFeatures | Mode::BufferFeaturesEdit) {
                self.refresh_buffer_previews();
            }
        }
        self.selection.len()
    }

    pub fn is_multi_select(&self) -> bool {
        self.selection.is_multi()
    }

    /// Whether the active mode may change the edit layer. Always false in a
    /// read-only editor, whatever mode was requested.
    pub fn can_edit(&self) -> bool {
        self.config.editable && self.mode.is_editing()
    }

    pub fn hovered(&self) -> Option<&LayerHit> {
        self.hovered.as_ref()
    }

    /// Style of an edit layer feature: selected beats hovered.
    pub fn feature_style(&self, id: FeatureId) -> FeatureStyle {
        if self.selection().contains(&id) {
            FeatureStyle::Selected
        } else if self
            .hovered
            .as_ref()
            .is_some_and(|hit| hit.layer == LayerId::Edit && hit.feature == id)
        {
            FeatureStyle::Hover
        } else {
            FeatureStyle::Default
        }
    }

    /// Groups edit layer mutations so the output syncs once at the end.
    pub fn batch(&mut self) -> EditBatch<'_, B> {
        self.edit.begin_silent();
        EditBatch { editor: self }
    }

    pub fn add_feature(&mut self, geometry: Geometry<f64>, properties: Properties) -> FeatureId {
        self.insert_feature(Feature::new(geometry).with_properties(properties))
    }

    pub fn insert_feature(&mut self, feature: Feature) -> FeatureId {
        self.snap.insert_feature(&LayerId::Edit, &feature);
        self.edit.insert(feature)
    }

    pub fn remove_feature(&mut self, id: FeatureId) -> Option<Feature> {
        let removed = self.edit.remove(id)?;
        self.snap.remove_feature(&LayerId::Edit, id);

        let sketch = &mut self.sketch;
        self.previews.retain(|preview| {
            if preview.target == id {
                sketch.remove(preview.preview);
                false
            } else {
                true
            }
        });

        if self
            .hovered
            .as_ref()
            .is_some_and(|hit| hit.layer == LayerId::Edit && hit.feature == id)
        {
            self.hovered = None;
        }
        if self.selection.remove(id) {
            self.selection_changed();
        }
        Some(removed)
    }

    pub fn set_feature_geometry(
        &mut self,
        id: FeatureId,
        geometry: Geometry<f64>,
    ) -> Option<Geometry<f64>> {
        let previous = self.edit.set_geometry(id, geometry)?;
        if let Some(feature) = self.edit.get(id) {
            self.snap.update_feature(&LayerId::Edit, feature);
        }
        Some(previous)
    }

    /// Bulk-loads GeoJSON into the edit layer with a single output sync.
    pub fn load_geojson(&mut self, value: &serde_json::Value) -> Result<Vec<FeatureId>> {
        let parsed = io::parse_features(value)?;
        let mut batch = self.batch();
        let ids: Vec<FeatureId> = parsed
            .into_iter()
            .map(|(geometry, properties)| batch.add_feature(geometry, properties))
            .collect();
        tracing::info!("Loaded {} feature(s) into the edit layer", ids.len());
        Ok(ids)
    }

    /// Removes every selected feature.
    pub fn delete_selected(&mut self) -> usize {
        if !self.can_edit() {
            tracing::warn!("Not deleting in {}: the edit layer is read-only", self.mode);
            return 0;
        }
        let ids = self.selection().to_vec();
        let mut batch = self.batch();
        let removed = ids
            .into_iter()
            .filter(|id| batch.remove_feature(*id).is_some())
            .count();
        tracing::debug!("Deleted {} selected feature(s)", removed);
        removed
    }

    pub fn add_reference_layer(&mut self, layer: ReferenceLayer) {
        if layer.visible {
            self.snap.add_layer(&layer.id, layer.store.iter());
        }
        tracing::debug!("Reference layer {} added", layer.id);
        self.references.retain(|other| other.id != layer.id);
        self.references.push(layer);
    }

    pub fn reference_layer(&self, name: &str) -> Option<&ReferenceLayer> {
        self.references.iter().find(|layer| layer.name() == name)
    }

    /// Shows or hides a reference layer and mirrors it in the snap index.
    pub fn set_layer_visible(&mut self, name: &str, visible: bool) -> bool {
        let Some(layer) = self.references.iter_mut().find(|layer| layer.name() == name) else {
            tracing::warn!("Unknown reference layer {}", name);
            return false;
        };
        if layer.visible == visible {
            return true;
        }
        layer.visible = visible;
        if visible {
            self.snap.add_layer(&layer.id, layer.store.iter());
        } else {
            self.snap.remove_layer(&layer.id);
        }
        true
    }

    /// Hit-testable layers: the edit layer on top, then visible reference
    /// layers, most recently added first.
    pub fn layer_stack(&self) -> LayerStack<'_> {
        let mut stack = LayerStack::new();
        stack.push(LayerId::Edit, self.edit.store());
        for layer in self.references.iter().rev().filter(|layer| layer.visible) {
            stack.push(layer.id.clone(), &layer.store);
        }
        stack
    }

    pub(crate) fn find_feature(&self, layer: &LayerId, id: FeatureId) -> Option<&Feature> {
        match layer {
            LayerId::Edit => self.edit.get(id),
            LayerId::Sketch => self.sketch.get(id),
            LayerId::Measure => self.measure.get(id),
            LayerId::Bounds => None,
            LayerId::Reference(_) => self
                .references
                .iter()
                .find(|reference| &reference.id == layer)
                .and_then(|reference| reference.store.get(id)),
        }
    }

    pub(crate) fn split_multi_polygons(&mut self) -> Vec<Split> {
        let splits = self
            .edit
            .mutate(pipeline::split_multi_polygons, |splits| !splits.is_empty());
        let mut deselected = false;
        for split in &splits {
            self.snap.remove_feature(&LayerId::Edit, split.removed);
            deselected |= self.selection.remove(split.removed);
            for id in &split.added {
                if let Some(feature) = self.edit.get(*id) {
                    self.snap.insert_feature(&LayerId::Edit, feature);
                }
            }
        }
        if deselected {
            self.selection_changed();
        }
        splits
    }

    pub(crate) fn selection_changed(&self) {
        self.emit(AppEvent::Selection(SelectionEvent::Changed {
            count: self.selection().len(),
        }));
    }

    pub(crate) fn emit(&self, event: AppEvent) {
        match self.bus.publish(event) {
            Ok(_) | Err(EventBusError::NoSubscribers) => {}
            Err(e) => tracing::warn!("Event delivery failed: {}", e),
        }
    }
}

impl<B: MapBackend + std::fmt::Debug> std::fmt::Debug for MapEditor<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapEditor")
            .field("mode", &self.mode)
            .field("features", &self.edit.len())
            .field("selection", &self.selection())
            .field("backend", &self.backend)
            .finish()
    }
}

/// Scope returned by [`MapEditor::batch`]. Dereferences to the editor; the
/// edit layer syncs at most once when the scope ends.
pub struct EditBatch<'a, B: MapBackend> {
    editor: &'a mut MapEditor<B>,
}

impl<B: MapBackend> Deref for EditBatch<'_, B> {
    type Target = MapEditor<B>;

    fn deref(&self) -> &MapEditor<B> {
        self.editor
    }
}

impl<B: MapBackend> DerefMut for EditBatch<'_, B> {
    fn deref_mut(&mut self) -> &mut MapEditor<B> {
        self.editor
    }
}

impl<B: MapBackend> Drop for EditBatch<'_, B> {
    fn drop(&mut self) {
        self.editor.edit.end_silent();
    }
}
