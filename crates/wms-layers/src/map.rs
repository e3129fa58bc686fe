//! Ordered layer collection of a map.
//!
//! The collection has a single writer: callers serialize mutation through
//! `&mut Map`, there is no internal locking.

use tracing::debug;

use wms_common::LayerId;

use crate::layer::RenderableLayer;

/// Layers in rendering order, bottom first.
#[derive(Debug, Clone, Default)]
pub struct Map {
    layers: Vec<RenderableLayer>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer on top.
    pub fn add_layer(&mut self, layer: RenderableLayer) -> &RenderableLayer {
        let index = self.layers.len();
        self.insert_at(index, layer)
    }

    /// Insert a layer at `index`, clamped to the collection length. Layers
    /// already present keep their relative order.
    pub fn insert_at(&mut self, index: usize, layer: RenderableLayer) -> &RenderableLayer {
        let index = index.min(self.layers.len());
        debug!(id = %layer.id(), index, "Inserting layer");
        self.layers.insert(index, layer);
        &self.layers[index]
    }

    pub fn get(&self, id: &LayerId) -> Option<&RenderableLayer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    pub fn index_of(&self, id: &LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == id)
    }

    /// Remove the first layer with `id`.
    pub fn remove(&mut self, id: &LayerId) -> Option<RenderableLayer> {
        let index = self.index_of(id)?;
        Some(self.layers.remove(index))
    }

    pub fn layers(&self) -> &[RenderableLayer] {
        &self.layers
    }

    pub fn ids(&self) -> impl Iterator<Item = &LayerId> {
        self.layers.iter().map(RenderableLayer::id)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
