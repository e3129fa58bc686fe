//! GetLegendGraphic requests.

use serde::Serialize;

use wms_common::WmsVersion;

use crate::query::{append, QueryString};

/// Style requested when the layer has none. Legend endpoints of most servers
/// reject an empty STYLE, unlike GetMap.
pub const DEFAULT_LEGEND_STYLE: &str = "default";

/// SLD version sent with legend requests.
pub const SLD_VERSION: &str = "1.1.0";

/// Text shown in place of the legend image when the server has none.
pub const LEGEND_ALT_TEXT: &str = "No legend available";

/// Parameters of a GetLegendGraphic request.
#[derive(Debug, Clone, Copy)]
pub struct GetLegendGraphic<'a> {
    pub layer: &'a str,
    pub style: Option<&'a str>,
    pub version: Option<WmsVersion>,
    pub lang: &'a str,
}

impl GetLegendGraphic<'_> {
    pub fn query(&self) -> QueryString {
        QueryString::new()
            .push("request", "GetLegendGraphic")
            .push("layer", self.layer)
            .push("style", self.style.unwrap_or(DEFAULT_LEGEND_STYLE))
            .push("service", "WMS")
            .push("version", self.version.unwrap_or_default().as_str())
            .push("format", "image/png")
            .push("sld_version", SLD_VERSION)
            .push("lang", self.lang)
    }

    /// Full request URL against a service endpoint.
    pub fn url(&self, service_url: &str) -> String {
        append(service_url, &self.query().to_key_value())
    }
}

/// A displayable legend: an image reference with alt-text fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendGraphic {
    pub src: String,
    pub alt: String,
}

impl LegendGraphic {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: LEGEND_ALT_TEXT.to_string(),
        }
    }

    /// HTML fragment for the legend popup.
    pub fn to_html(&self) -> String {
        format!("<img alt=\"{}\" src=\"{}\"></img>", self.alt, self.src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_url_defaults() {
        let request = GetLegendGraphic {
            layer: "ch.kantone",
            style: None,
            version: None,
            lang: "fr",
        };
        assert_eq!(
            request.url("https://wms.geo.admin.ch/"),
            "https://wms.geo.admin.ch/?request=GetLegendGraphic&layer=ch.kantone&style=default\
             &service=WMS&version=1.3.0&format=image%2Fpng&sld_version=1.1.0&lang=fr"
        );
    }

    #[test]
    fn test_legend_url_explicit_style_and_version() {
        let request = GetLegendGraphic {
            layer: "a",
            style: Some("blue"),
            version: Some(WmsVersion::V111),
            lang: "de",
        };
        let url = request.url("https://wms.geo.bs.ch/wmsBS?map=x");
        assert!(url.starts_with("https://wms.geo.bs.ch/wmsBS?map=x&request=GetLegendGraphic"));
        assert!(url.contains("&style=blue&"));
        assert!(url.contains("&version=1.1.1&"));
    }

    #[test]
    fn test_legend_html_has_fallback() {
        let legend = LegendGraphic::new("https://x.ch/?a=1&b=2");
        assert_eq!(
            legend.to_html(),
            "<img alt=\"No legend available\" src=\"https://x.ch/?a=1&b=2\"></img>"
        );
    }
}
