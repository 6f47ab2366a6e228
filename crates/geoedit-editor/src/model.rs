//! Features and feature collections.
//!
//! A [`Feature`] is a geometry plus a property map plus an `editable` flag.
//! Its [`FeatureId`] is allocated once and survives geometry mutation. A
//! [`FeatureStore`] keeps features in draw order (last drawn is on top).

use geo::Geometry;
use geoedit_core::{FeatureId, LayerId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Feature properties, as found in GeoJSON.
pub type Properties = serde_json::Map<String, serde_json::Value>;

static NEXT_FEATURE_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates a process-wide unique feature id.
pub fn next_feature_id() -> FeatureId {
    FeatureId(NEXT_FEATURE_ID.fetch_add(1, Ordering::Relaxed))
}

/// A map feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry<f64>,
    pub properties: Properties,
    pub editable: bool,
}

impl Feature {
    /// Creates an editable feature with a fresh id and no properties.
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            id: next_feature_id(),
            geometry,
            properties: Properties::new(),
            editable: true,
        }
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Copies properties and the editable flag onto a new geometry with a new id.
    pub fn derive(&self, geometry: Geometry<f64>) -> Self {
        Self {
            id: next_feature_id(),
            geometry,
            properties: self.properties.clone(),
            editable: self.editable,
        }
    }

    /// GeoJSON type name of the geometry.
    pub fn kind(&self) -> &'static str {
        geometry_kind(&self.geometry)
    }
}

/// GeoJSON type name of a geometry.
pub fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Features of one layer, in draw order.
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    features: HashMap<FeatureId, Feature>,
    order: Vec<FeatureId>,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an editable feature and returns its id.
    pub fn add(&mut self, geometry: Geometry<f64>, properties: Properties) -> FeatureId {
        self.insert(Feature::new(geometry).with_properties(properties))
    }

    /// Inserts a feature, replacing any feature with the same id in place.
    pub fn insert(&mut self, feature: Feature) -> FeatureId {
        let id = feature.id;
        if self.features.insert(id, feature).is_none() {
            self.order.push(id);
        }
        id
    }

    pub fn remove(&mut self, id: FeatureId) -> Option<Feature> {
        let removed = self.features.remove(&id)?;
        self.order.retain(|&other| other != id);
        Some(removed)
    }

    /// Replaces a feature's geometry, returning the previous one.
    pub fn set_geometry(&mut self, id: FeatureId, geometry: Geometry<f64>) -> Option<Geometry<f64>> {
        self.features
            .get_mut(&id)
            .map(|feature| std::mem::replace(&mut feature.geometry, geometry))
    }

    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id)
    }

    pub fn contains(&self, id: FeatureId) -> bool {
        self.features.contains_key(&id)
    }

    /// Features in draw order, bottom first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Feature> + '_ {
        self.order.iter().filter_map(|id| self.features.get(id))
    }

    pub fn ids(&self) -> Vec<FeatureId> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Removes every feature and returns them in draw order.
    pub fn clear(&mut self) -> Vec<Feature> {
        let order = std::mem::take(&mut self.order);
        let mut features = std::mem::take(&mut self.features);
        order
            .into_iter()
            .filter_map(|id| features.remove(&id))
            .collect()
    }
}

/// A read-only vector layer shown under the edit layer.
#[derive(Debug, Clone)]
pub struct ReferenceLayer {
    pub id: LayerId,
    pub visible: bool,
    pub store: FeatureStore,
}

impl ReferenceLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LayerId::Reference(name.into()),
            visible: true,
            store: FeatureStore::new(),
        }
    }

    pub fn name(&self) -> &str {
        match &self.id {
            LayerId::Reference(name) => name,
            _ => "",
        }
    }

    /// Adds a non-editable feature.
    pub fn add(&mut self, geometry: Geometry<f64>, properties: Properties) -> FeatureId {
        self.store
            .insert(Feature::new(geometry).with_properties(properties).read_only())
    }
}
