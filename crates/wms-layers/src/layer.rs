//! Renderable layer descriptors handed to the 2D map engine.

use serde::Serialize;
use std::sync::Arc;

use wms_common::{BoundingBox, CrsCode, LayerId};

use crate::imagery::{derive_imagery_provider, ImageryContext, ImageryProviderDescriptor};
use crate::params::LayerParams;

/// How the map engine requests the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// One image per view, from a single endpoint.
    SingleImage,
    /// 256px tiles spread over several subdomain endpoints.
    Tiled,
}

/// WMS source of a layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WmsSource {
    params: LayerParams,
    urls: Vec<String>,
    gutter: u32,
    ratio: f64,
    /// Projection requested from the server; `None` means the map CRS.
    projection: Option<CrsCode>,
}

impl WmsSource {
    pub(crate) fn new(
        params: LayerParams,
        urls: Vec<String>,
        gutter: u32,
        ratio: f64,
        projection: Option<CrsCode>,
    ) -> Self {
        Self {
            params,
            urls,
            gutter,
            ratio,
            projection,
        }
    }

    pub fn params(&self) -> &LayerParams {
        &self.params
    }

    /// Parameters can change after construction, e.g. a new `TIME`.
    pub fn params_mut(&mut self) -> &mut LayerParams {
        &mut self.params
    }

    /// First endpoint.
    pub fn url(&self) -> &str {
        self.urls.first().map(String::as_str).unwrap_or_default()
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn gutter(&self) -> u32 {
        self.gutter
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn projection(&self) -> Option<CrsCode> {
        self.projection
    }
}

/// Capability of deriving an imagery provider for the 3D renderer.
pub trait ImageryProvidable {
    fn derive_imagery_provider(&self) -> ImageryProviderDescriptor;
}

/// A WMS layer ready to be added to a map.
#[derive(Debug, Clone, Serialize)]
pub struct RenderableLayer {
    pub(crate) id: LayerId,
    /// Endpoint as given, subdomain template included.
    pub(crate) url: String,
    pub(crate) mode: RenderMode,
    pub(crate) source: WmsSource,
    pub opacity: f64,
    pub visible: bool,
    pub attribution: Option<String>,
    pub extent: Option<BoundingBox>,
    pub(crate) preview: bool,
    pub(crate) display_in_layer_manager: bool,
    pub(crate) use_third_party_data: bool,
    pub(crate) label: Option<String>,
    #[serde(skip)]
    pub(crate) imagery: Arc<ImageryContext>,
}

impl RenderableLayer {
    pub fn id(&self) -> &LayerId {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn source(&self) -> &WmsSource {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut WmsSource {
        &mut self.source
    }

    pub fn params(&self) -> &LayerParams {
        self.source.params()
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub fn display_in_layer_manager(&self) -> bool {
        self.display_in_layer_manager
    }

    pub fn use_third_party_data(&self) -> bool {
        self.use_third_party_data
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl ImageryProvidable for RenderableLayer {
    fn derive_imagery_provider(&self) -> ImageryProviderDescriptor {
        derive_imagery_provider(&self.url, self.source.params(), &self.imagery)
    }
}
