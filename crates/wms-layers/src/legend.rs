//! Legend retrieval.

use async_trait::async_trait;

use wms_protocol::LegendGraphic;

use crate::layer::RenderableLayer;

/// Produces the legend of a layer.
///
/// Implementations never fail: a missing legend shows the alt text of the
/// returned graphic. The current implementation resolves on first poll, but
/// callers must treat the call as a suspension point.
#[async_trait]
pub trait LegendProvider: Send + Sync {
    async fn get_legend(&self, layer: &RenderableLayer) -> LegendGraphic;
}
