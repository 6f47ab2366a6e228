//! View history navigation.

use geoedit_core::{AppEvent, ViewEvent, ViewSnapshot};

use super::MapEditor;
use crate::backend::{MapBackend, ViewTarget};

const INCHES_PER_METER: f64 = 39.37;
const DOTS_PER_INCH: f64 = 96.0;
const HISTORY_ANIMATION_MS: u32 = 250;
const SAME_VIEW_EPSILON: f64 = 1e-9;

/// Scale denominator for a resolution in meters per pixel.
pub fn scale_for_resolution(resolution: f64) -> f64 {
    resolution * INCHES_PER_METER * DOTS_PER_INCH
}

impl<B: MapBackend> MapEditor<B> {
    pub(super) fn view_changed(&mut self) {
        let view = self.backend.view();
        if self.history.push(view) {
            tracing::trace!("View history now holds {} entries", self.history.len());
        }
        self.emit(AppEvent::View(ViewEvent::Navigated {
            center: view.center,
            zoom: view.zoom,
            scale: scale_for_resolution(self.backend.resolution()),
        }));
    }

    /// Moves to the previous history entry, wrapping to the newest.
    /// Returns false on an empty history.
    pub fn history_prev(&mut self) -> bool {
        let target = self.history.prev();
        self.navigate_to(target)
    }

    /// Moves to the next history entry, wrapping to the oldest.
    pub fn history_next(&mut self) -> bool {
        let target = self.history.next();
        self.navigate_to(target)
    }

    /// Jumps to an entry; negative indices count from the end.
    pub fn history_goto(&mut self, index: isize) -> bool {
        let target = self.history.goto(index);
        self.navigate_to(target)
    }

    fn navigate_to(&mut self, target: Option<ViewSnapshot>) -> bool {
        let Some(target) = target else {
            return false;
        };

        if self
            .backend
            .view()
            .is_near(&target, SAME_VIEW_EPSILON, SAME_VIEW_EPSILON)
        {
            // no view change will follow to reset the flag
            self.history.finish_navigation();
        } else {
            self.backend.animate(ViewTarget {
                center: target.center,
                zoom: target.zoom,
                duration_ms: HISTORY_ANIMATION_MS,
            });
        }
        true
    }
}
