//! WMS layer factory.
//!
//! Builds [`RenderableLayer`]s from service parameters or capability entries.
//! Construction performs no network I/O; the only inputs besides the
//! arguments are the global options, the layer-config registry and the
//! current language, all handed in at construction.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use wms_common::layer::ID_SEPARATOR;
use wms_common::{BoundingBox, CrsCode, WmsError, WmsLayerId, WmsResult};
use wms_protocol::{CapabilityLayer, GetLegendGraphic, LegendGraphic};

use crate::config::GlobalOptions;
use crate::imagery::{ImageryContext, ImageryProviderDescriptor};
use crate::lang::LanguageProvider;
use crate::layer::{ImageryProvidable, RenderMode, RenderableLayer, WmsSource};
use crate::legend::LegendProvider;
use crate::map::Map;
use crate::params::{LayerOptions, LayerParams};
use crate::registry::LayerConfigRegistry;
use crate::url_utils::{first_concrete_url, multidomain_urls, UrlUtils, DEFAULT_SUBDOMAINS};

/// Projection requested from servers when a layer is reprojected client side.
pub const REPROJECTION_CRS: CrsCode = CrsCode::Epsg4326;

pub struct WmsLayerFactory {
    options: GlobalOptions,
    registry: Arc<LayerConfigRegistry>,
    lang: Arc<dyn LanguageProvider>,
    url_utils: UrlUtils,
    imagery: Arc<ImageryContext>,
}

impl WmsLayerFactory {
    pub fn new(
        options: GlobalOptions,
        registry: Arc<LayerConfigRegistry>,
        lang: Arc<dyn LanguageProvider>,
    ) -> Self {
        let url_utils = UrlUtils::from_options(&options);
        let imagery = Arc::new(ImageryContext::new(&options, &url_utils));
        Self {
            options,
            registry,
            lang,
            url_utils,
            imagery,
        }
    }

    pub fn options(&self) -> &GlobalOptions {
        &self.options
    }

    pub fn url_utils(&self) -> &UrlUtils {
        &self.url_utils
    }

    /// Build a layer from service parameters and display options.
    pub fn create_layer(
        &self,
        params: LayerParams,
        options: LayerOptions,
    ) -> WmsResult<RenderableLayer> {
        if params.layers.trim().is_empty() {
            return Err(WmsError::InvalidLayerRequest(
                "LAYERS must name at least one layer".to_string(),
            ));
        }
        if options.url.trim().is_empty() {
            return Err(WmsError::InvalidLayerRequest(format!(
                "no service url for layer '{}'",
                params.layers
            )));
        }

        let gutter = self
            .registry
            .gutter_for(&params.layers)
            .or(options.gutter)
            .unwrap_or(0);
        let ratio = options.ratio.filter(|r| *r > 0.0).unwrap_or(1.0);

        let reprojected = params.version.is_some() && options.use_reprojection;
        let projection = reprojected.then_some(REPROJECTION_CRS);
        let wms_id = WmsLayerId::new(
            options.label.clone().unwrap_or_default(),
            options.url.clone(),
            params.layers.clone(),
            params.version,
            reprojected,
        );
        if let Some(component) = wms_id.ambiguous_component() {
            return Err(WmsError::InvalidLayerRequest(format!(
                "{component} of layer '{}' must not contain '{ID_SEPARATOR}'",
                params.layers
            )));
        }
        let id = wms_id.to_layer_id();

        let urls = multidomain_urls(&options.url, &DEFAULT_SUBDOMAINS);
        let mode = if urls.len() > 1 {
            RenderMode::Tiled
        } else {
            RenderMode::SingleImage
        };

        debug!(
            id = %id,
            mode = ?mode,
            endpoints = urls.len(),
            gutter,
            "Created WMS layer"
        );

        let use_third_party_data = self.url_utils.is_third_party_valid(&options.url);
        Ok(RenderableLayer {
            id,
            mode,
            source: WmsSource::new(params, urls, gutter, ratio, projection),
            opacity: options.opacity.unwrap_or(1.0),
            visible: options.visible.unwrap_or(true),
            attribution: options.attribution,
            extent: options.extent,
            preview: options.preview,
            display_in_layer_manager: !options.preview,
            use_third_party_data,
            label: options.label,
            url: options.url,
            imagery: Arc::clone(&self.imagery),
        })
    }

    /// Build a layer from a GetCapabilities entry.
    pub fn layer_from_capabilities(&self, entry: &CapabilityLayer) -> WmsResult<RenderableLayer> {
        let mut params = LayerParams::new(entry.name.clone());
        params.version = entry.wms_version;

        let mut options = LayerOptions::new(entry.wms_url.clone())
            .with_label(entry.title.clone())
            .with_reprojection(entry.use_reprojection);
        options.extent = self.intersect_with_default_extent(entry.extent.as_ref());

        self.create_layer(params, options)
    }

    /// Create a layer and add it to `map`, at `index` when given.
    pub fn add_to_map<'m>(
        &self,
        map: &'m mut Map,
        params: LayerParams,
        options: LayerOptions,
        index: Option<usize>,
    ) -> WmsResult<&'m RenderableLayer> {
        let layer = self.create_layer(params, options)?;
        Ok(match index {
            Some(index) => map.insert_at(index, layer),
            None => map.add_layer(layer),
        })
    }

    pub fn derive_imagery_provider(&self, layer: &RenderableLayer) -> ImageryProviderDescriptor {
        layer.derive_imagery_provider()
    }

    /// Clip `extent` to the default extent. No extent means the default
    /// extent; an extent outside it means none.
    pub fn intersect_with_default_extent(&self, extent: Option<&BoundingBox>) -> Option<BoundingBox> {
        let default = self.options.default_extent;
        match extent {
            Some(extent) => extent.intersection(&default),
            None => Some(default),
        }
    }

    fn legend_request_url(&self, layer: &RenderableLayer) -> String {
        let params = layer.params();
        let lang = self.lang.current();
        let request = GetLegendGraphic {
            layer: &params.layers,
            style: params.styles(),
            version: params.version,
            lang: &lang,
        };
        request.url(&first_concrete_url(layer.url(), &DEFAULT_SUBDOMAINS))
    }
}

#[async_trait]
impl LegendProvider for WmsLayerFactory {
    async fn get_legend(&self, layer: &RenderableLayer) -> LegendGraphic {
        LegendGraphic::new(self.legend_request_url(layer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::FixedLanguage;

    fn factory() -> WmsLayerFactory {
        WmsLayerFactory::new(
            GlobalOptions::default(),
            Arc::new(LayerConfigRegistry::new()),
            Arc::new(FixedLanguage::new("de")),
        )
    }

    #[test]
    fn test_rejects_empty_layers() {
        let err = factory()
            .create_layer(LayerParams::new(""), LayerOptions::new("https://wms.ch/"))
            .unwrap_err();
        assert!(matches!(err, WmsError::InvalidLayerRequest(_)));
    }

    #[test]
    fn test_rejects_empty_url() {
        let err = factory()
            .create_layer(LayerParams::new("a"), LayerOptions::default())
            .unwrap_err();
        assert!(matches!(err, WmsError::InvalidLayerRequest(_)));
    }

    #[test]
    fn test_defaults() {
        let layer = factory()
            .create_layer(LayerParams::new("a"), LayerOptions::new("https://wms.ch/").with_ratio(0.0))
            .unwrap();
        assert_eq!(layer.source().gutter(), 0);
        assert_eq!(layer.source().ratio(), 1.0);
        assert_eq!(layer.source().projection(), None);
        assert_eq!(layer.opacity, 1.0);
        assert!(layer.visible);
        assert!(layer.display_in_layer_manager());
    }

    #[test]
    fn test_reprojection_needs_version() {
        let layer = factory()
            .create_layer(
                LayerParams::new("a"),
                LayerOptions::new("https://wms.ch/").with_reprojection(true),
            )
            .unwrap();
        assert_eq!(layer.source().projection(), None);
        assert_eq!(layer.id().as_str(), "WMS||||https://wms.ch/||a");
    }

    #[test]
    fn test_intersect_with_default_extent() {
        let factory = factory();
        let default = factory.options().default_extent;
        assert_eq!(factory.intersect_with_default_extent(None), Some(default));
        let inside = BoundingBox::new(2600000.0, 1200000.0, 2700000.0, 1300000.0);
        assert_eq!(factory.intersect_with_default_extent(Some(&inside)), Some(inside));
        let partial = BoundingBox::new(2000000.0, 1000000.0, 2500000.0, 1100000.0);
        assert_eq!(
            factory.intersect_with_default_extent(Some(&partial)),
            Some(BoundingBox::new(2420000.0, 1030000.0, 2500000.0, 1100000.0))
        );
        let outside = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(factory.intersect_with_default_extent(Some(&outside)), None);
    }
}
