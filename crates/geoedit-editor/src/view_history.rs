//! Viewport history for previous/next navigation

use geoedit_core::ViewSnapshot;
use std::collections::VecDeque;

/// Bounded, deduplicated stack of viewport snapshots
#[derive(Debug, Clone)]
pub struct ViewHistory {
    entries: VecDeque<ViewSnapshot>,
    index: usize,
    max_len: usize,
    center_epsilon: f64,
    zoom_epsilon: f64,
    navigating: bool,
}

impl ViewHistory {
    /// Create a history with the default thresholds (10 map units, 0.1 zoom)
    pub fn new(max_len: usize) -> Self {
        Self::with_epsilons(max_len, 10.0, 0.1)
    }

    /// Create with custom deduplication thresholds
    pub fn with_epsilons(max_len: usize, center_epsilon: f64, zoom_epsilon: f64) -> Self {
        let max_len = max_len.max(1);
        Self {
            entries: VecDeque::with_capacity(max_len),
            index: 0,
            max_len,
            center_epsilon,
            zoom_epsilon,
            navigating: false,
        }
    }

    /// Record a viewport after a move
    ///
    /// Returns false when the push was suppressed: either the move was caused
    /// by history navigation, or the view is within epsilon of the top entry.
    pub fn push(&mut self, snapshot: ViewSnapshot) -> bool {
        if self.navigating {
            self.navigating = false;
            return false;
        }

        if self
            .entries
            .back()
            .is_some_and(|top| top.is_near(&snapshot, self.center_epsilon, self.zoom_epsilon))
        {
            return false;
        }

        self.entries.push_back(snapshot);
        while self.entries.len() > self.max_len {
            self.entries.pop_front();
        }
        self.index = self.entries.len() - 1;
        true
    }

    /// Jump to an entry, wrapping out-of-range indices
    ///
    /// Marks the history as navigating so the resulting view change is not
    /// pushed again. Returns None on an empty history.
    pub fn goto(&mut self, index: isize) -> Option<ViewSnapshot> {
        if self.entries.is_empty() {
            return None;
        }
        let len = self.entries.len() as isize;
        self.index = index.rem_euclid(len) as usize;
        self.navigating = true;
        self.entries.get(self.index).copied()
    }

    /// Step back one entry, wrapping to the newest
    pub fn prev(&mut self) -> Option<ViewSnapshot> {
        self.goto(self.index as isize - 1)
    }

    /// Step forward one entry, wrapping to the oldest
    pub fn next(&mut self) -> Option<ViewSnapshot> {
        self.goto(self.index as isize + 1)
    }

    /// Drop the navigating flag when no view change will follow
    pub fn finish_navigation(&mut self) {
        self.navigating = false;
    }

    pub fn is_navigating(&self) -> bool {
        self.navigating
    }

    pub fn current(&self) -> Option<&ViewSnapshot> {
        self.entries.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Entries oldest first
    pub fn entries(&self) -> impl Iterator<Item = &ViewSnapshot> {
        self.entries.iter()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
        self.navigating = false;
    }
}
