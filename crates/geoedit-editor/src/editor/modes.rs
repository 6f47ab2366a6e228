//! Mode transitions: leave, swap interactions, enter.

use geoedit_core::{AppEvent, BufferEvent, Mode, ModeEvent, SnapEvent};

use super::{Continuation, MapEditor};
use crate::backend::{EditStyle, MapBackend, SketchStyle};
use crate::interactions::{Interaction, InteractionContext};

/// Modes sharing one selection; moving between groups clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionGroup {
    Modify,
    Buffer,
    Cut,
}

fn selection_group(mode: Mode) -> Option<SelectionGroup> {
    match mode {
        Mode::ModifyFeatures => Some(SelectionGroup::Modify),
        Mode::BufferFeatures | Mode::BufferFeaturesEdit => Some(SelectionGroup::Buffer),
        Mode::CutFeatures | Mode::CutFeaturesDraw => Some(SelectionGroup::Cut),
        _ => None,
    }
}

impl<B: MapBackend> MapEditor<B> {
    /// Switches to `next`. Always accepted, also when `next` is the current
    /// mode, in which case leave and enter run again and cancel out.
    pub fn set_mode(&mut self, next: Mode) {
        let previous = self.mode;
        tracing::debug!("Mode {} -> {}", previous, next);

        self.leave(previous, next);
        self.backend.clear_interactions();
        let interactions = self.resolve_interactions(next);
        self.backend.install_interactions(interactions);
        self.mode = next;
        self.enter(next);
        self.backend.set_mode_marker(next.marker());

        self.emit(AppEvent::Mode(ModeEvent::Changed { mode: next }));
    }

    /// Turns snapping on or off and reinstalls the active interactions.
    pub fn set_snapping(&mut self, on: bool) {
        if !self.config.snapping_available() {
            tracing::warn!("Snapping is not available with the current configuration");
            return;
        }
        self.snapping = on;
        self.backend.clear_interactions();
        let interactions = self.resolve_interactions(self.mode);
        self.backend.install_interactions(interactions);
        self.emit(AppEvent::Snap(SnapEvent::Toggled { on }));
    }

    fn resolve_interactions(&self, mode: Mode) -> Vec<Interaction> {
        let context = InteractionContext {
            snap: self.snap_enabled_for(mode).then(|| {
                (self.snap.shared(), self.config.snapping.tolerance)
            }),
        };

        match self.registry.resolve(mode, &context) {
            Some(interactions) => interactions,
            None => {
                tracing::warn!(
                    "No interactions registered for {}, falling back to {}",
                    mode,
                    Mode::View
                );
                self.registry
                    .resolve(Mode::View, &context)
                    .unwrap_or_default()
            }
        }
    }

    fn snap_enabled_for(&self, mode: Mode) -> bool {
        self.snapping && self.config.snapping_available() && mode.supports_snapping()
    }

    fn leave(&mut self, current: Mode, next: Mode) {
        self.flush_pending();

        if self.draw.is_some() {
            self.abort_draw(true);
        }

        match current {
            Mode::MeasureLine | Mode::MeasureArea => {
                self.measure.clear();
            }
            Mode::BufferFeatures | Mode::BufferFeaturesEdit => self.clear_buffer_previews(),
            Mode::CutFeaturesDraw => self.clear_sketch(),
            mode if mode.draws_features() => self.clear_sketch(),
            _ => {}
        }

        self.buffer.armed = false;
        self.backend.set_edit_style(EditStyle::Default);
        self.backend.set_sketch_style(SketchStyle::Normal);

        let keep_selection =
            selection_group(current).is_some() && selection_group(current) == selection_group(next);
        if !keep_selection && self.selection.clear() {
            self.selection_changed();
        }
    }

    fn enter(&mut self, mode: Mode) {
        let style = if mode.is_selectable() || matches!(mode, Mode::View | Mode::DeleteFeatures) {
            EditStyle::Interactive
        } else {
            EditStyle::Default
        };
        self.backend.set_edit_style(style);
        self.backend.set_sketch_style(SketchStyle::Normal);

        if mode.supports_snapping() && self.config.snapping_available() {
            self.emit(AppEvent::Snap(SnapEvent::Toggled { on: self.snapping }));
        }

        if self.can_edit()
            && (mode == Mode::BufferFeaturesDynamic || (mode.draws_features() && self.buffer.on))
        {
            self.buffer.armed = true;
            self.emit(AppEvent::Buffer(BufferEvent::Toggled {
                on: true,
                radius: self.buffer.radius,
                segments: self.buffer.segments,
            }));
        }

        if matches!(mode, Mode::BufferFeatures | Mode::BufferFeaturesEdit) && self.can_edit() {
            self.refresh_buffer_previews();
        }
    }

    /// Runs every queued continuation now.
    pub(crate) fn run_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for continuation in pending {
            self.run_continuation(continuation);
        }
    }

    /// Runs queued cleanup before a mode change. Queued mode switches are
    /// dropped since a transition is already under way.
    fn flush_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for continuation in pending {
            match continuation {
                Continuation::SetMode(mode) => {
                    tracing::debug!("Dropping queued switch to {}", mode);
                }
                other => self.run_continuation(other),
            }
        }
    }

    fn run_continuation(&mut self, continuation: Continuation) {
        match continuation {
            Continuation::RemoveFeature(id) => {
                self.remove_feature(id);
            }
            Continuation::ClearSketch => self.clear_sketch(),
            Continuation::SetMode(mode) => self.set_mode(mode),
        }
    }

    pub(crate) fn clear_sketch(&mut self) {
        self.sketch.clear();
        self.previews.clear();
        if let Some(session) = self.draw.as_mut() {
            session.preview = None;
        }
    }
}
