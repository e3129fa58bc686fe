//! Inputs of layer construction: WMS service parameters and display options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use wms_common::{BoundingBox, WmsVersion};

/// WMS service parameters of a layer source.
///
/// Keys serialize in upper case like the parameters sent to the server.
/// Vendor parameters such as `TIME` are carried verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct LayerParams {
    pub layers: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<WmsVersion>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl LayerParams {
    pub fn new(layers: impl Into<String>) -> Self {
        Self {
            layers: layers.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
        self.styles = Some(styles.into());
        self
    }

    pub fn with_version(mut self, version: WmsVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into().to_uppercase(), value.into());
        self
    }

    /// Non-empty `STYLES`, if any.
    pub fn styles(&self) -> Option<&str> {
        self.styles.as_deref().filter(|s| !s.is_empty())
    }

    /// Non-empty `FORMAT`, if any.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref().filter(|s| !s.is_empty())
    }
}

/// Display options of a layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerOptions {
    /// Service endpoint, possibly holding a subdomain template.
    pub url: String,
    pub label: Option<String>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
    pub attribution: Option<String>,
    /// Extent in the map CRS outside which the layer is not rendered.
    pub extent: Option<BoundingBox>,
    pub gutter: Option<u32>,
    pub ratio: Option<f64>,
    pub preview: bool,
    pub use_reprojection: bool,
}

impl LayerOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = Some(attribution.into());
        self
    }

    pub fn with_extent(mut self, extent: BoundingBox) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn with_gutter(mut self, gutter: u32) -> Self {
        self.gutter = Some(gutter);
        self
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_reprojection(mut self, use_reprojection: bool) -> Self {
        self.use_reprojection = use_reprojection;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_serialize_upper_case() {
        let params = LayerParams::new("ch.kantone")
            .with_version(WmsVersion::V111)
            .with_extra("time", "2020");
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["LAYERS"], "ch.kantone");
        assert_eq!(json["VERSION"], "1.1.1");
        assert_eq!(json["TIME"], "2020");
        assert!(json.get("STYLES").is_none());
    }

    #[test]
    fn test_params_deserialize_with_extra() {
        let params: LayerParams =
            serde_json::from_str(r#"{"LAYERS": "a", "VERSION": "1.3.0", "DPI": "96"}"#).unwrap();
        assert_eq!(params.version, Some(WmsVersion::V130));
        assert_eq!(params.extra.get("DPI").map(String::as_str), Some("96"));
    }

    #[test]
    fn test_empty_styles_count_as_unset() {
        assert_eq!(LayerParams::new("a").with_styles("").styles(), None);
        assert_eq!(LayerParams::new("a").with_styles("blue").styles(), Some("blue"));
    }
}
