//! Imagery-provider descriptors for the 3D globe renderer.
//!
//! The globe requests WMS tiles in a geographic tiling scheme through a URL
//! template. A descriptor is derived from a layer's current parameters and
//! the viewer configuration; nothing is cached.

use serde::Serialize;
use tracing::debug;

use projection::{extent_to_rectangle, Rectangle};
use wms_common::BoundingBox;
use wms_protocol::getmap::{fill_tile_template, GetMapTemplate, TILE_SIZE};
use wms_protocol::query::append;

use crate::config::GlobalOptions;
use crate::params::LayerParams;
use crate::url_utils::{
    normalize_subdomains_tpl, parse_subdomains_tpl, TileProxy, UrlUtils, DEFAULT_SUBDOMAINS,
};

/// Tiling schemes understood by the globe renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TilingScheme {
    /// Plate carrée, two root tiles covering the globe in EPSG:4326.
    Geographic,
}

/// Viewer-wide inputs of imagery derivation, shared by every layer a factory
/// builds.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageryContext {
    pub minimum_retrieving_level: u32,
    pub rectangle: Rectangle,
    pub available_levels: Option<Vec<u32>>,
    pub metadata_url: Option<String>,
    pub proxy: TileProxy,
}

impl ImageryContext {
    pub fn new(options: &GlobalOptions, url_utils: &UrlUtils) -> Self {
        Self {
            minimum_retrieving_level: options.minimum_retrieving_level,
            rectangle: extent_to_rectangle(&options.default_extent, options.map_crs),
            available_levels: options.imagery_available_levels.clone(),
            metadata_url: options.imagery_metadata_url.clone(),
            proxy: url_utils.tile_proxy(),
        }
    }
}

/// Everything a URL-template imagery provider needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageryProviderDescriptor {
    /// GetMap template with `{s}` and bounds placeholders.
    pub url: String,
    pub minimum_retrieving_level: u32,
    /// Area with data, in radians.
    pub rectangle: Rectangle,
    #[serde(skip)]
    pub proxy: TileProxy,
    pub tiling_scheme: TilingScheme,
    pub has_alpha_channel: bool,
    pub available_levels: Option<Vec<u32>>,
    pub metadata_url: Option<String>,
    pub subdomains: Vec<String>,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl ImageryProviderDescriptor {
    /// Concrete request URL of the tile with geographic `bounds` (degrees),
    /// served by the `index`-th request's subdomain in round-robin order.
    pub fn tile_url(&self, index: usize, bounds: &BoundingBox) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            self.subdomains[index % self.subdomains.len()].as_str()
        };
        self.proxy
            .get_url(&fill_tile_template(&self.url, subdomain, bounds))
    }
}

/// Derive the descriptor for a layer served at `layer_url` with `params`.
pub fn derive_imagery_provider(
    layer_url: &str,
    params: &LayerParams,
    context: &ImageryContext,
) -> ImageryProviderDescriptor {
    let template = GetMapTemplate {
        layers: &params.layers,
        format: params.format(),
        version: params.version,
        styles: params.styles(),
    };
    let url = append(
        &normalize_subdomains_tpl(layer_url),
        &template.query().to_key_value(),
    );
    let subdomains = parse_subdomains_tpl(layer_url)
        .unwrap_or_else(|| DEFAULT_SUBDOMAINS.iter().map(|s| s.to_string()).collect());

    debug!(
        layers = %params.layers,
        version = %template.version(),
        subdomains = subdomains.len(),
        "Derived imagery provider"
    );

    ImageryProviderDescriptor {
        url,
        minimum_retrieving_level: context.minimum_retrieving_level,
        rectangle: context.rectangle,
        proxy: context.proxy.clone(),
        tiling_scheme: TilingScheme::Geographic,
        has_alpha_channel: true,
        available_levels: context.available_levels.clone(),
        metadata_url: context.metadata_url.clone(),
        subdomains,
        tile_width: TILE_SIZE,
        tile_height: TILE_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wms_common::WmsVersion;

    fn context() -> ImageryContext {
        let options = GlobalOptions::default();
        ImageryContext::new(&options, &UrlUtils::from_options(&options))
    }

    #[test]
    fn test_subdomain_list_from_template() {
        let descriptor = derive_imagery_provider(
            "https://wms{s:5,6}.geo.admin.ch/",
            &LayerParams::new("ch.kantone"),
            &context(),
        );
        assert_eq!(descriptor.subdomains, vec!["5", "6"]);
        assert!(descriptor.url.starts_with("https://wms{s}.geo.admin.ch/?layers=ch.kantone&"));
    }

    #[test]
    fn test_default_subdomains_without_template() {
        let descriptor = derive_imagery_provider(
            "https://wms.geo.bs.ch/wmsBS",
            &LayerParams::new("a").with_version(WmsVersion::V111),
            &context(),
        );
        assert_eq!(descriptor.subdomains, vec!["", "0", "1", "2", "3", "4"]);
        assert!(descriptor.url.ends_with("&transparent=true&srs=EPSG:4326"));
        assert!(descriptor.has_alpha_channel);
        assert_eq!(descriptor.tiling_scheme, TilingScheme::Geographic);
        assert_eq!((descriptor.tile_width, descriptor.tile_height), (256, 256));
    }

    #[test]
    fn test_tile_url_round_robin() {
        let descriptor = derive_imagery_provider(
            "https://wms{s:5,6}.geo.admin.ch/",
            &LayerParams::new("ch.kantone"),
            &context(),
        );
        let bounds = BoundingBox::new(6.0, 46.0, 7.5, 47.25);
        let first = descriptor.tile_url(0, &bounds);
        let second = descriptor.tile_url(1, &bounds);
        let third = descriptor.tile_url(2, &bounds);
        assert!(first.starts_with("https://wms5.geo.admin.ch/"));
        assert!(second.starts_with("https://wms6.geo.admin.ch/"));
        assert_eq!(first, third);
        assert!(first.contains("&bbox=46,6,47.25,7.5&"));
    }

    #[test]
    fn test_third_party_tiles_are_proxied() {
        let descriptor = derive_imagery_provider(
            "https://wms.geo.bs.ch/wmsBS",
            &LayerParams::new("a"),
            &context(),
        );
        let url = descriptor.tile_url(0, &BoundingBox::new(7.5, 47.5, 7.6, 47.6));
        assert!(url.starts_with("https://proxy.geo.admin.ch/https/wms.geo.bs.ch"));
    }
}
