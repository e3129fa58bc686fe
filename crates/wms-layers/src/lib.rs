//! WMS layer construction for the geoportal map viewer.
//!
//! [`WmsLayerFactory`] turns a WMS endpoint plus layer parameters into a
//! [`RenderableLayer`] for the 2D map engine. Layers derive an
//! [`ImageryProviderDescriptor`] for the 3D globe on demand, and the factory
//! produces legends through the asynchronous [`LegendProvider`] contract.

pub mod config;
pub mod factory;
pub mod imagery;
pub mod lang;
pub mod layer;
pub mod legend;
pub mod map;
pub mod params;
pub mod registry;
pub mod url_utils;

pub use config::GlobalOptions;
pub use factory::WmsLayerFactory;
pub use imagery::{ImageryContext, ImageryProviderDescriptor, TilingScheme};
pub use lang::{FixedLanguage, LanguageProvider, SwitchableLanguage};
pub use layer::{ImageryProvidable, RenderMode, RenderableLayer, WmsSource};
pub use legend::LegendProvider;
pub use map::Map;
pub use params::{LayerOptions, LayerParams};
pub use registry::{LayerConfigEntry, LayerConfigRegistry};
pub use url_utils::{UrlUtils, DEFAULT_SUBDOMAINS};
