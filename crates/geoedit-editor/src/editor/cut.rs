//! Cutting features with a drawn polygon.

use geo::Geometry;
use geoedit_core::{FeatureId, Mode};

use super::{Continuation, MapEditor};
use crate::backend::MapBackend;
use crate::geometry;
use crate::pipeline;

impl<B: MapBackend> MapEditor<B> {
    /// Cuts the selected features, or every editable feature touching the
    /// cutter when nothing is selected, then returns to `CutFeatures`.
    /// Returns the number of features that were cut.
    pub(super) fn finish_cut(&mut self, cutter: &Geometry<f64>) -> usize {
        let targets: Vec<FeatureId> = if self.selection.is_empty() {
            self.edit
                .store()
                .iter()
                .filter(|feature| feature.editable)
                .filter(|feature| self.engine.intersects(&feature.geometry, cutter))
                .map(|feature| feature.id)
                .collect()
        } else {
            self.selection.selected().to_vec()
        };

        let mut cut = 0;
        {
            let mut batch = self.batch();
            for id in targets {
                let Some(target) = batch.edit.get(id) else {
                    continue;
                };
                let result = match pipeline::cut(batch.engine.as_ref(), &target.geometry, cutter) {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::debug!("Feature {} not cut: {}", id, e);
                        continue;
                    }
                };

                if geometry::is_empty(&result) {
                    batch.remove_feature(id);
                } else {
                    batch.set_feature_geometry(id, result);
                }
                cut += 1;
            }
            batch.split_multi_polygons();
        }
        tracing::info!("Cut {} feature(s)", cut);

        if self.selection.clear() {
            self.selection_changed();
        }
        self.pending.push(Continuation::ClearSketch);
        self.pending.push(Continuation::SetMode(Mode::CutFeatures));
        cut
    }
}
