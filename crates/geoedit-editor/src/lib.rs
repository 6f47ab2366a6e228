//! # GeoEdit Editor
//!
//! The interactive map-editing core. It turns pointer and keyboard events
//! reported by a map backend into feature mutations on an edit layer while
//! keeping the transient collections consistent across mode changes.
//!
//! ## Core Components
//!
//! ### Editing
//! - **MapEditor**: The mode controller; owns every layer and collection
//! - **InteractionRegistry**: Which interactions each mode installs
//! - **EditLayer**: Feature store with batched output synchronization
//!
//! ### Geometry
//! - **GeometryEngine**: Buffer, difference, intersection and predicates
//! - **BoundsValidator**: Containment checks against configured polygons
//! - **Pipeline**: Clipped buffering, cutting and multi-polygon splitting
//!
//! ### Navigation
//! - **MapViewport**: Center, zoom and pixel/map conversions
//! - **ViewHistory**: Bounded, deduplicated viewport stack
//!
//! ## Architecture
//!
//! ```text
//! MapBackend (rendering, hit tests, interactions)
//!   └── MapEvent ──> MapEditor
//!                      ├── EditLayer ──> OutputSynchronizer ──> EventBus
//!                      ├── Sketch / Measure stores
//!                      ├── SelectionManager
//!                      ├── SnapIndex
//!                      └── ViewHistory
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geoedit_editor::{HeadlessBackend, MapEditor};
//! use geoedit_core::Mode;
//!
//! let mut editor = MapEditor::new(config, HeadlessBackend::default())?;
//! editor.set_mode(Mode::DrawPolygons);
//! ```

pub mod backend;
pub mod bounds;
pub mod editor;
pub mod geometry;
pub mod headless;
pub mod interactions;
pub mod layer;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod selection_manager;
pub mod snap;
pub mod view_history;
pub mod viewport;

pub use backend::{
    EditStyle, FeatureStyle, LayerHit, LayerStack, MapBackend, SketchStyle, ViewTarget,
};
pub use bounds::BoundsValidator;
pub use editor::{
    BufferPreview, BufferState, Continuation, EditBatch, Key, MapEditor, MapEvent,
};
pub use geometry::{GeoEngine, GeometryEngine};
pub use headless::HeadlessBackend;
pub use interactions::{
    DrawKind, Interaction, InteractionContext, InteractionKind, InteractionRegistry, ModifyTarget,
};
pub use layer::{EditLayer, SilentScope};
pub use model::{Feature, FeatureStore, Properties, ReferenceLayer};
pub use output::{EditOutput, OutputSynchronizer};
pub use selection_manager::SelectionManager;
pub use snap::{SnapFeatureSet, SnapIndex, SnapTarget};
pub use view_history::ViewHistory;
pub use viewport::MapViewport;
