//! OGC WMS protocol support for the map client.
//!
//! Supports:
//! - WMS 1.1.1 and WMS 1.3.0 GetMap tile templates and GetLegendGraphic URLs
//! - GetCapabilities parsing for both versions
//! - Query-string encoding compatible with existing permalinks

pub mod capabilities;
pub mod getmap;
pub mod legend;
pub mod query;

pub use capabilities::{CapabilitiesLayer, CapabilityLayer, LayerBoundingBox, WmsCapabilities};
pub use getmap::{bbox_template, fill_tile_template, BboxToken, GetMapTemplate, TILE_SIZE};
pub use legend::{GetLegendGraphic, LegendGraphic, LEGEND_ALT_TEXT};
pub use query::{append, encode_uri_component, encode_uri_query, QueryString};
