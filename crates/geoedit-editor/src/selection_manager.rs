use geoedit_core::FeatureId;

/// Manages the feature selection of the edit layer.
///
/// `SelectionManager` is responsible for:
/// - Tracking the ordered set of selected features
/// - Applying click toggles in single- and multi-select mode
/// - Arming the "reset after multi-select" rule on modifier release
/// - Pruning ids of features that no longer exist
///
/// # Selection Model
///
/// - **Single select**: a click on an unselected feature replaces the selection
///   with that feature, a click on a selected feature deselects it, and a click
///   on empty map clears everything
/// - **Multi-select**: while the modifier key is held a click toggles membership
///   of the clicked feature without touching the others
/// - **Reset after multi-select**: when configured, the first click after the
///   modifier is released starts from an empty selection
///
/// Entries are ids, not feature handles, so the manager never keeps a removed
/// feature alive; callers prune removed ids with [`SelectionManager::remove`].
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    /// Selected features, in selection order
    selected: Vec<FeatureId>,
    /// Whether the multi-select modifier is held
    multi: bool,
    /// Whether releasing the modifier arms a reset
    reset_after_multi: bool,
    /// Whether the next click clears the selection first
    reset_armed: bool,
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use geoedit_editor::selection_manager::SelectionManager;
    ///
    /// let manager = SelectionManager::new(false);
    /// assert!(manager.is_empty());
    /// ```
    pub fn new(reset_after_multi: bool) -> Self {
        Self {
            reset_after_multi,
            ..Default::default()
        }
    }

    /// Returns the selected features in selection order.
    pub fn selected(&self) -> &[FeatureId] {
        &self.selected
    }

    pub fn contains(&self, id: FeatureId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// Applies a click.
    ///
    /// # Arguments
    ///
    /// * `hit` - The topmost selectable feature under the pointer, if any
    ///
    /// # Returns
    ///
    /// `true` if the selection membership changed.
    pub fn toggle(&mut self, hit: Option<FeatureId>) -> bool {
        let before = self.selected.clone();

        if self.reset_armed {
            self.reset_armed = false;
            self.selected.clear();
        }

        match (hit, self.multi) {
            (Some(id), true) => {
                if !self.remove_inner(id) {
                    self.selected.push(id);
                }
            }
            (Some(id), false) => {
                if !self.remove_inner(id) {
                    self.selected = vec![id];
                }
            }
            (None, true) => {}
            (None, false) => self.selected.clear(),
        }

        self.selected != before
    }

    /// Switches multi-select on (modifier pressed) or off (modifier released).
    ///
    /// # Returns
    ///
    /// `true` if the multi-select state changed.
    pub fn set_multi(&mut self, on: bool) -> bool {
        if self.multi == on {
            return false;
        }
        self.multi = on;
        if on {
            self.reset_armed = false;
        } else if self.reset_after_multi {
            self.reset_armed = true;
        }
        true
    }

    /// Replaces the selection programmatically.
    ///
    /// # Returns
    ///
    /// `true` if the selection changed.
    pub fn select(&mut self, ids: impl IntoIterator<Item = FeatureId>) -> bool {
        let before = std::mem::take(&mut self.selected);
        for id in ids {
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }
        self.reset_armed = false;
        self.selected != before
    }

    /// Clears the selection.
    ///
    /// # Returns
    ///
    /// `true` if anything was selected.
    pub fn clear(&mut self) -> bool {
        self.reset_armed = false;
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Drops a feature from the selection, e.g. after it was removed from its layer.
    pub fn remove(&mut self, id: FeatureId) -> bool {
        let before = self.selected.len();
        self.selected.retain(|&other| other != id);
        self.selected.len() != before
    }
}
