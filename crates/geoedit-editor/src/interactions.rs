//! Interaction registry.
//!
//! Maps each [`Mode`] to the ordered list of interactions the backend installs
//! while that mode is active. Draw and modify come first so they win
//! pointer-down over pan; snap follows the interaction it corrects.

use geoedit_core::Mode;
use std::collections::HashMap;

use crate::snap::SnapFeatureSet;

/// Geometry type produced by a draw interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawKind {
    Point,
    LineString,
    Polygon,
}

/// Which collection a modify interaction edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifyTarget {
    /// Selected edit layer features
    Selection,
    /// Preview features in the sketch layer
    Sketch,
}

/// A concrete interaction handed to the backend.
#[derive(Debug, Clone)]
pub enum Interaction {
    DragPan,
    MouseWheelZoom,
    DoubleClickZoom,
    KeyboardPan,
    DragZoom,
    Draw { kind: DrawKind },
    Modify { target: ModifyTarget },
    Snap { features: SnapFeatureSet, tolerance: f64 },
}

impl Interaction {
    pub fn kind(&self) -> InteractionKind {
        match self {
            Interaction::DragPan => InteractionKind::DragPan,
            Interaction::MouseWheelZoom => InteractionKind::MouseWheelZoom,
            Interaction::DoubleClickZoom => InteractionKind::DoubleClickZoom,
            Interaction::KeyboardPan => InteractionKind::KeyboardPan,
            Interaction::DragZoom => InteractionKind::DragZoom,
            Interaction::Draw { kind } => InteractionKind::Draw(*kind),
            Interaction::Modify { target } => InteractionKind::Modify(*target),
            Interaction::Snap { .. } => InteractionKind::Snap,
        }
    }
}

/// Template for an [`Interaction`], stored in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    DragPan,
    MouseWheelZoom,
    DoubleClickZoom,
    KeyboardPan,
    DragZoom,
    Draw(DrawKind),
    Modify(ModifyTarget),
    Snap,
}

/// Runtime inputs needed to turn templates into interactions.
#[derive(Debug, Clone, Default)]
pub struct InteractionContext {
    /// Snap features and tolerance, or `None` when snapping is off.
    pub snap: Option<(SnapFeatureSet, f64)>,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionRegistry {
    sets: HashMap<Mode, Vec<InteractionKind>>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock interaction sets. Editing modes are only registered when
    /// `editable` is set.
    pub fn standard(editable: bool) -> Self {
        use InteractionKind::*;

        let navigation = [DragPan, MouseWheelZoom, DoubleClickZoom, KeyboardPan];
        let with_nav = |head: &[InteractionKind]| -> Vec<InteractionKind> {
            head.iter().copied().chain(navigation).collect()
        };

        let mut registry = Self::new();
        registry.register(Mode::View, with_nav(&[]));
        registry.register(Mode::ZoomBox, with_nav(&[DragZoom]));
        registry.register(Mode::MeasureLine, with_nav(&[Draw(DrawKind::LineString)]));
        registry.register(Mode::MeasureArea, with_nav(&[Draw(DrawKind::Polygon)]));
        registry.register(Mode::SearchParcel, with_nav(&[]));

        if editable {
            registry.register(Mode::DrawPoints, with_nav(&[Draw(DrawKind::Point), Snap]));
            registry.register(Mode::DrawLines, with_nav(&[Draw(DrawKind::LineString), Snap]));
            registry.register(Mode::DrawPolygons, with_nav(&[Draw(DrawKind::Polygon), Snap]));
            registry.register(
                Mode::ModifyFeatures,
                with_nav(&[Modify(ModifyTarget::Selection), Snap]),
            );
            registry.register(Mode::DeleteFeatures, with_nav(&[]));
            registry.register(Mode::BufferFeatures, with_nav(&[]));
            registry.register(
                Mode::BufferFeaturesEdit,
                with_nav(&[Modify(ModifyTarget::Sketch), Snap]),
            );
            registry.register(
                Mode::BufferFeaturesDynamic,
                with_nav(&[Draw(DrawKind::LineString), Snap]),
            );
            registry.register(Mode::CutFeatures, with_nav(&[]));
            registry.register(
                Mode::CutFeaturesDraw,
                with_nav(&[Draw(DrawKind::Polygon), Snap]),
            );
        }

        registry
    }

    pub fn register(&mut self, mode: Mode, interactions: Vec<InteractionKind>) {
        self.sets.insert(mode, interactions);
    }

    pub fn unregister(&mut self, mode: Mode) -> Option<Vec<InteractionKind>> {
        self.sets.remove(&mode)
    }

    pub fn contains(&self, mode: Mode) -> bool {
        self.sets.contains_key(&mode)
    }

    pub fn kinds(&self, mode: Mode) -> Option<&[InteractionKind]> {
        self.sets.get(&mode).map(Vec::as_slice)
    }

    /// Builds the interactions for `mode`, or `None` if nothing is registered.
    /// `Snap` entries are dropped when the context carries no snap set.
    pub fn resolve(&self, mode: Mode, context: &InteractionContext) -> Option<Vec<Interaction>> {
        let kinds = self.sets.get(&mode)?;
        Some(
            kinds
                .iter()
                .filter_map(|kind| instantiate(*kind, context))
                .collect(),
        )
    }
}

fn instantiate(kind: InteractionKind, context: &InteractionContext) -> Option<Interaction> {
    Some(match kind {
        InteractionKind::DragPan => Interaction::DragPan,
        InteractionKind::MouseWheelZoom => Interaction::MouseWheelZoom,
        InteractionKind::DoubleClickZoom => Interaction::DoubleClickZoom,
        InteractionKind::KeyboardPan => Interaction::KeyboardPan,
        InteractionKind::DragZoom => Interaction::DragZoom,
        InteractionKind::Draw(kind) => Interaction::Draw { kind },
        InteractionKind::Modify(target) => Interaction::Modify { target },
        InteractionKind::Snap => {
            let (features, tolerance) = context.snap.clone()?;
            Interaction::Snap {
                features,
                tolerance,
            }
        }
    })
}
