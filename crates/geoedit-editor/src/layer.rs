//! The edit layer.
//!
//! Owns every feature the user may mutate. Each add/remove/change runs the
//! [`OutputSynchronizer`] unless a silent scope is open; nested scopes are
//! counted and the outermost one syncs once on exit if anything changed.

use geo::Geometry;
use geoedit_core::FeatureId;
use std::ops::{Deref, DerefMut};

use crate::model::{Feature, FeatureStore, Properties};
use crate::output::{EditOutput, OutputSynchronizer};

#[derive(Debug)]
pub struct EditLayer {
    store: FeatureStore,
    output: OutputSynchronizer,
    silent_depth: usize,
    dirty: bool,
}

impl EditLayer {
    pub fn new(output: OutputSynchronizer) -> Self {
        Self {
            store: FeatureStore::new(),
            output,
            silent_depth: 0,
            dirty: false,
        }
    }

    pub fn add(&mut self, geometry: Geometry<f64>, properties: Properties) -> FeatureId {
        let id = self.store.add(geometry, properties);
        self.changed();
        id
    }

    pub fn insert(&mut self, feature: Feature) -> FeatureId {
        let id = self.store.insert(feature);
        self.changed();
        id
    }

    pub fn remove(&mut self, id: FeatureId) -> Option<Feature> {
        let removed = self.store.remove(id)?;
        self.changed();
        Some(removed)
    }

    pub fn set_geometry(&mut self, id: FeatureId, geometry: Geometry<f64>) -> Option<Geometry<f64>> {
        let previous = self.store.set_geometry(id, geometry)?;
        self.changed();
        Some(previous)
    }

    /// Runs a bulk mutation on the underlying store. Syncs once afterwards
    /// if `changed` reports that the result touched the store.
    pub fn mutate<R>(
        &mut self,
        f: impl FnOnce(&mut FeatureStore) -> R,
        changed: impl FnOnce(&R) -> bool,
    ) -> R {
        let result = f(&mut self.store);
        if changed(&result) {
            self.changed();
        }
        result
    }

    pub fn clear(&mut self) -> Vec<Feature> {
        let removed = self.store.clear();
        if !removed.is_empty() {
            self.changed();
        }
        removed
    }

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.store.get(id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn output(&self) -> Option<&EditOutput> {
        self.output.last()
    }

    pub fn sync_count(&self) -> usize {
        self.output.sync_count()
    }

    pub fn is_silent(&self) -> bool {
        self.silent_depth > 0
    }

    /// Opens a silent scope. Pair with [`EditLayer::end_silent`], or use
    /// [`EditLayer::silent`] for a guard.
    pub fn begin_silent(&mut self) {
        self.silent_depth += 1;
    }

    /// Closes a silent scope; the outermost close syncs if anything changed.
    pub fn end_silent(&mut self) {
        if self.silent_depth == 0 {
            tracing::warn!("end_silent called without an open silent scope");
            return;
        }
        self.silent_depth -= 1;
        if self.silent_depth == 0 && self.dirty {
            self.dirty = false;
            self.output.sync(&self.store);
        }
    }

    /// Guard that keeps the layer silent until dropped.
    pub fn silent(&mut self) -> SilentScope<'_> {
        self.begin_silent();
        SilentScope { layer: self }
    }

    /// Forces a sync regardless of pending changes.
    pub fn sync(&mut self) -> Option<&EditOutput> {
        self.dirty = false;
        self.output.sync(&self.store)
    }

    fn changed(&mut self) {
        if self.silent_depth > 0 {
            self.dirty = true;
        } else {
            self.output.sync(&self.store);
        }
    }
}

/// Silent scope guard returned by [`EditLayer::silent`].
pub struct SilentScope<'a> {
    layer: &'a mut EditLayer,
}

impl Deref for SilentScope<'_> {
    type Target = EditLayer;

    fn deref(&self) -> &EditLayer {
        self.layer
    }
}

impl DerefMut for SilentScope<'_> {
    fn deref_mut(&mut self) -> &mut EditLayer {
        self.layer
    }
}

impl Drop for SilentScope<'_> {
    fn drop(&mut self) {
        self.layer.end_silent();
    }
}
