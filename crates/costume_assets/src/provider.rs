use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::colormap::{Colormap, ColormapRef};
use crate::model::ModelData;
use crate::storage::ColormapCache;

/// Resource lookups a costume performs while it is being built (and when its
/// colormap is swapped at runtime). Implementations own loading and caching.
pub trait ResourceProvider {
    /// Resolves a colormap by exact name.
    fn colormap(&self, name: &str) -> Option<ColormapRef>;

    /// Resolves a model's joint hierarchy by file name.
    fn model(&self, _name: &str) -> Option<Arc<ModelData>> {
        None
    }
}

/// In-memory [`ResourceProvider`] backed by a [`ColormapCache`] and a model table.
#[derive(Default)]
pub struct ResourceLibrary {
    pub colormaps: ColormapCache,
    models: FxHashMap<String, Arc<ModelData>>,
}

impl ResourceLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for registering a colormap.
    #[must_use]
    pub fn with_colormap(self, colormap: Colormap) -> Self {
        self.colormaps.insert(colormap);
        self
    }

    /// Builder-style helper for registering a model.
    #[must_use]
    pub fn with_model(mut self, model: ModelData) -> Self {
        self.add_model(model);
        self
    }

    pub fn add_model(&mut self, model: ModelData) -> Arc<ModelData> {
        let model = Arc::new(model);
        self.models.insert(model.name.clone(), Arc::clone(&model));
        model
    }
}

impl ResourceProvider for ResourceLibrary {
    fn colormap(&self, name: &str) -> Option<ColormapRef> {
        self.colormaps.get_by_name(name)
    }

    fn model(&self, name: &str) -> Option<Arc<ModelData>> {
        self.models.get(name).cloned()
    }
}

impl ResourceProvider for ColormapCache {
    fn colormap(&self, name: &str) -> Option<ColormapRef> {
        self.get_by_name(name)
    }
}
