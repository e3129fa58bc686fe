//! GetMap tile templates for 3D globe renderers.
//!
//! A globe renderer requests WMS tiles in a geographic tiling scheme and
//! substitutes the tile bounds into a URL template. WMS 1.3.0 expects
//! EPSG:4326 bounds in latitude/longitude order under `CRS`, while 1.1.1
//! expects longitude/latitude order under `SRS`.

use wms_common::{BoundingBox, CrsCode, WmsVersion};

use crate::query::QueryString;

/// Width and height of every tile requested through a template.
pub const TILE_SIZE: u32 = 256;

/// Image format used when the layer does not specify one.
pub const DEFAULT_FORMAT: &str = "image/png";

/// CRS of the geographic tiling scheme.
pub const TILE_CRS: CrsCode = CrsCode::Epsg4326;

/// Bounds placeholders understood by the template consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BboxToken {
    West,
    South,
    East,
    North,
}

impl BboxToken {
    pub fn placeholder(&self) -> &'static str {
        match self {
            BboxToken::West => "{westProjected}",
            BboxToken::South => "{southProjected}",
            BboxToken::East => "{eastProjected}",
            BboxToken::North => "{northProjected}",
        }
    }

    fn value(&self, bbox: &BoundingBox) -> f64 {
        match self {
            BboxToken::West => bbox.min_x,
            BboxToken::South => bbox.min_y,
            BboxToken::East => bbox.max_x,
            BboxToken::North => bbox.max_y,
        }
    }
}

/// Order of the bounds placeholders in the BBOX value for a version.
pub fn bbox_token_order(version: WmsVersion) -> [BboxToken; 4] {
    match version {
        WmsVersion::V111 => [BboxToken::West, BboxToken::South, BboxToken::East, BboxToken::North],
        WmsVersion::V130 => [BboxToken::South, BboxToken::West, BboxToken::North, BboxToken::East],
    }
}

/// The BBOX template value for a version.
pub fn bbox_template(version: WmsVersion) -> String {
    bbox_token_order(version)
        .iter()
        .map(BboxToken::placeholder)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parameters of a GetMap tile template.
#[derive(Debug, Clone, Copy)]
pub struct GetMapTemplate<'a> {
    pub layers: &'a str,
    pub format: Option<&'a str>,
    pub version: Option<WmsVersion>,
    pub styles: Option<&'a str>,
}

impl GetMapTemplate<'_> {
    pub fn version(&self) -> WmsVersion {
        self.version.unwrap_or_default()
    }

    /// Build the query. The CRS parameter of 1.1.1 comes last, after
    /// `transparent`, matching the URLs produced by the browser client.
    pub fn query(&self) -> QueryString {
        let version = self.version();
        let mut query = QueryString::template()
            .push("layers", self.layers)
            .push("format", self.format.unwrap_or(DEFAULT_FORMAT))
            .push("service", "WMS")
            .push("version", version.as_str())
            .push("request", "GetMap");

        if version == WmsVersion::V130 {
            query.insert(version.crs_param(), TILE_CRS.as_str());
        }

        query = query
            .push("bbox", bbox_template(version))
            .push("width", TILE_SIZE.to_string())
            .push("height", TILE_SIZE.to_string())
            .push("styles", self.styles.unwrap_or(""))
            .push("transparent", "true");

        if version == WmsVersion::V111 {
            query.insert(version.crs_param(), TILE_CRS.as_str());
        }

        query
    }
}

/// Substitute a subdomain and geographic tile bounds into a template URL.
pub fn fill_tile_template(template: &str, subdomain: &str, bounds: &BoundingBox) -> String {
    let mut url = template.replace("{s}", subdomain);
    for token in [BboxToken::West, BboxToken::South, BboxToken::East, BboxToken::North] {
        url = url.replace(token.placeholder(), &token.value(bounds).to_string());
    }
    url
}
