//! WMS GetCapabilities document parsing.
//!
//! Reads WMS 1.1.1 (`WMT_MS_Capabilities`) and 1.3.0 (`WMS_Capabilities`)
//! documents into a layer tree, then flattens it into entries the layer
//! factory can turn into map layers. Only what the client needs is kept:
//! layer names, titles, supported CRS, extents, styles and the GetMap
//! endpoint.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::Serialize;
use tracing::{debug, warn};

use wms_common::{AxisOrder, BoundingBox, CrsCode, WmsError, WmsResult, WmsVersion};

/// Bounding box declared by a layer for one CRS, stored in x/y order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerBoundingBox {
    pub crs: String,
    pub bbox: BoundingBox,
}

/// A `<Layer>` element of a capabilities document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CapabilitiesLayer {
    /// Missing for category layers that only group children.
    pub name: Option<String>,
    pub title: String,
    pub abstract_text: Option<String>,
    pub crs: Vec<String>,
    /// WGS84 bounds in lon/lat order.
    pub geographic_bbox: Option<BoundingBox>,
    pub bounding_boxes: Vec<LayerBoundingBox>,
    pub styles: Vec<String>,
    pub queryable: bool,
    pub layers: Vec<CapabilitiesLayer>,
}

impl CapabilitiesLayer {
    /// Whether the layer can be requested in `code`.
    pub fn supports(&self, code: CrsCode) -> bool {
        self.crs
            .iter()
            .any(|c| CrsCode::from_wms_string(c).map_or(false, |parsed| parsed == code))
    }

    /// Declared bounding box for `code`, if any.
    pub fn bbox_for(&self, code: CrsCode) -> Option<BoundingBox> {
        self.bounding_boxes
            .iter()
            .find(|b| CrsCode::from_wms_string(&b.crs).map_or(false, |parsed| parsed == code))
            .map(|b| b.bbox)
    }

    /// Copy of this layer with the properties a child inherits from its
    /// parent applied, without children.
    fn inherit_from(&self, parent: &CapabilitiesLayer) -> CapabilitiesLayer {
        let mut layer = CapabilitiesLayer {
            layers: Vec::new(),
            ..self.clone()
        };

        for crs in &parent.crs {
            if !layer.crs.contains(crs) {
                layer.crs.push(crs.clone());
            }
        }
        if layer.geographic_bbox.is_none() {
            layer.geographic_bbox = parent.geographic_bbox;
        }
        for bbox in &parent.bounding_boxes {
            if !layer.bounding_boxes.iter().any(|b| b.crs == bbox.crs) {
                layer.bounding_boxes.push(bbox.clone());
            }
        }
        for style in &parent.styles {
            if !layer.styles.contains(style) {
                layer.styles.push(style.clone());
            }
        }
        layer.queryable |= parent.queryable;
        layer
    }
}

/// A capabilities entry ready to be turned into a map layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityLayer {
    pub name: String,
    pub title: String,
    pub wms_version: Option<WmsVersion>,
    pub wms_url: String,
    /// Extent in the map CRS.
    pub extent: Option<BoundingBox>,
    pub use_reprojection: bool,
}

/// Parsed GetCapabilities document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WmsCapabilities {
    pub version: WmsVersion,
    pub title: Option<String>,
    /// OnlineResource of the GetMap HTTP GET binding.
    pub get_map_url: Option<String>,
    pub layers: Vec<CapabilitiesLayer>,
}

impl WmsCapabilities {
    /// Parse a capabilities document.
    ///
    /// A `ServiceExceptionReport` is returned as [`WmsError::ServiceException`].
    pub fn parse(xml: &str) -> WmsResult<Self> {
        CapabilitiesParser::default().parse(xml)
    }

    /// All named layers, depth first, with inherited properties applied.
    pub fn named_layers(&self) -> Vec<CapabilitiesLayer> {
        let mut out = Vec::new();
        let root = CapabilitiesLayer::default();
        for layer in &self.layers {
            flatten(layer, &root, &mut out);
        }
        out
    }

    /// Entries for every named layer displayable on a map in `map_crs`.
    ///
    /// Layers that support neither `map_crs` nor EPSG:4326 are skipped.
    /// `service_url` is used when the document has no GetMap endpoint.
    pub fn capability_layers(&self, service_url: &str, map_crs: CrsCode) -> Vec<CapabilityLayer> {
        let wms_url = self
            .get_map_url
            .clone()
            .unwrap_or_else(|| service_url.to_string());

        self.named_layers()
            .into_iter()
            .filter_map(|layer| {
                let name = layer.name.clone()?;
                let native = layer.supports(map_crs);
                let use_reprojection = !native && layer.supports(CrsCode::Epsg4326);
                if !native && !use_reprojection {
                    warn!(layer = %name, crs = %map_crs, "Layer not displayable in map CRS, skipping");
                    return None;
                }

                let extent = layer.bbox_for(map_crs).or_else(|| {
                    layer.geographic_bbox.map(|geo| {
                        projection::transform_extent(&geo, CrsCode::Epsg4326, map_crs)
                    })
                });

                Some(CapabilityLayer {
                    title: if layer.title.is_empty() {
                        name.clone()
                    } else {
                        layer.title.clone()
                    },
                    name,
                    wms_version: Some(self.version),
                    wms_url: wms_url.clone(),
                    extent,
                    use_reprojection,
                })
            })
            .collect()
    }
}

fn flatten(layer: &CapabilitiesLayer, parent: &CapabilitiesLayer, out: &mut Vec<CapabilitiesLayer>) {
    let resolved = layer.inherit_from(parent);
    if resolved.name.is_some() {
        out.push(resolved.clone());
    }
    for child in &layer.layers {
        flatten(child, &resolved, out);
    }
}

#[derive(Default)]
struct CapabilitiesParser {
    version: Option<WmsVersion>,
    title: Option<String>,
    get_map_url: Option<String>,
    /// Element names from the root to the current element.
    path: Vec<String>,
    /// Open `<Layer>` elements.
    stack: Vec<CapabilitiesLayer>,
    roots: Vec<CapabilitiesLayer>,
    /// Pending `EX_GeographicBoundingBox` values: west, east, south, north.
    geo_bounds: [Option<f64>; 4],
    exception: Option<(String, String)>,
}

impl CapabilitiesParser {
    fn parse(mut self, xml: &str) -> WmsResult<WmsCapabilities> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        loop {
            let event = reader.read_event().map_err(|e| {
                WmsError::CapabilitiesError(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(e) => {
                    let name = local_name(&e);
                    self.open(&name, &e)?;
                    self.path.push(name);
                }
                Event::Empty(e) => {
                    let name = local_name(&e);
                    self.open(&name, &e)?;
                    self.path.push(name);
                    self.close();
                }
                Event::End(_) => self.close(),
                Event::Text(t) => {
                    let text = t.unescape().map_err(xml_error)?;
                    self.text(text.trim());
                }
                Event::CData(c) => {
                    let raw = c.into_inner();
                    let text = String::from_utf8_lossy(&raw);
                    self.text(text.trim());
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some((code, message)) = self.exception {
            return Err(WmsError::ServiceException { code, message });
        }

        let version = self.version.ok_or_else(|| {
            WmsError::CapabilitiesError("not a WMS capabilities document".to_string())
        })?;

        debug!(
            version = %version,
            root_layers = self.roots.len(),
            "Parsed capabilities document"
        );

        Ok(WmsCapabilities {
            version,
            title: self.title,
            get_map_url: self.get_map_url,
            layers: self.roots,
        })
    }

    fn parent(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    fn in_path(&self, name: &str) -> bool {
        self.path.iter().any(|p| p == name)
    }

    fn open(&mut self, name: &str, e: &BytesStart<'_>) -> WmsResult<()> {
        match name {
            "WMS_Capabilities" | "WMT_MS_Capabilities" => {
                let version = attribute(e, "version")?.ok_or_else(|| {
                    WmsError::CapabilitiesError("missing version attribute".to_string())
                })?;
                self.version = Some(version.parse()?);
            }
            "ServiceExceptionReport" => {
                self.exception = Some(("NoApplicableCode".to_string(), String::new()));
            }
            "ServiceException" => {
                let code = attribute(e, "code")?.unwrap_or_else(|| "NoApplicableCode".to_string());
                self.exception = Some((code, String::new()));
            }
            "Layer" => {
                let queryable = attribute(e, "queryable")?.map_or(false, |q| q == "1" || q == "true");
                self.stack.push(CapabilitiesLayer {
                    queryable,
                    ..Default::default()
                });
            }
            "OnlineResource" if self.in_path("GetMap") && self.in_path("Get") => {
                if let Some(href) = attribute(e, "href")? {
                    self.get_map_url = Some(href);
                }
            }
            "LatLonBoundingBox" if self.parent() == Some("Layer") => {
                let bbox = bbox_attributes(e)?;
                if let Some(layer) = self.stack.last_mut() {
                    layer.geographic_bbox = Some(bbox);
                }
            }
            "BoundingBox" if self.parent() == Some("Layer") => {
                let crs = match attribute(e, "CRS")? {
                    Some(crs) => crs,
                    None => attribute(e, "SRS")?.unwrap_or_default(),
                };
                let mut bbox = bbox_attributes(e)?;
                if let (Ok(code), Some(version)) = (CrsCode::from_wms_string(&crs), self.version) {
                    if version.axis_order(code) == AxisOrder::LatLon {
                        bbox = BoundingBox::new(bbox.min_y, bbox.min_x, bbox.max_y, bbox.max_x);
                    }
                }
                if let Some(layer) = self.stack.last_mut() {
                    layer.bounding_boxes.push(LayerBoundingBox { crs, bbox });
                }
            }
            "EX_GeographicBoundingBox" => self.geo_bounds = [None; 4],
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self) {
        let Some(name) = self.path.pop() else {
            return;
        };

        match name.as_str() {
            "Layer" => {
                if let Some(layer) = self.stack.pop() {
                    match self.stack.last_mut() {
                        Some(parent) => parent.layers.push(layer),
                        None => self.roots.push(layer),
                    }
                }
            }
            "EX_GeographicBoundingBox" => {
                if let [Some(west), Some(east), Some(south), Some(north)] = self.geo_bounds {
                    if let Some(layer) = self.stack.last_mut() {
                        layer.geographic_bbox = Some(BoundingBox::new(west, south, east, north));
                    }
                } else {
                    warn!("Incomplete EX_GeographicBoundingBox ignored");
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let Some(element) = self.path.last().cloned() else {
            return;
        };
        let parent = self
            .path
            .len()
            .checked_sub(2)
            .map(|i| self.path[i].as_str());

        match (parent, element.as_str()) {
            (Some("ServiceExceptionReport"), "ServiceException") => {
                if let Some((_, message)) = self.exception.as_mut() {
                    message.push_str(text);
                }
            }
            (Some("Service"), "Title") => self.title = Some(text.to_string()),
            (Some("Layer"), "Name") => {
                if let Some(layer) = self.stack.last_mut() {
                    layer.name = Some(text.to_string());
                }
            }
            (Some("Layer"), "Title") => {
                if let Some(layer) = self.stack.last_mut() {
                    layer.title = text.to_string();
                }
            }
            (Some("Layer"), "Abstract") => {
                if let Some(layer) = self.stack.last_mut() {
                    layer.abstract_text = Some(text.to_string());
                }
            }
            // 1.1.1 servers sometimes pack several codes in one SRS element
            (Some("Layer"), "CRS" | "SRS") => {
                if let Some(layer) = self.stack.last_mut() {
                    for code in text.split_whitespace() {
                        if !layer.crs.iter().any(|c| c == code) {
                            layer.crs.push(code.to_string());
                        }
                    }
                }
            }
            (Some("Style"), "Name") => {
                if let Some(layer) = self.stack.last_mut() {
                    layer.styles.push(text.to_string());
                }
            }
            (Some("EX_GeographicBoundingBox"), bound) => {
                let index = match bound {
                    "westBoundLongitude" => 0,
                    "eastBoundLongitude" => 1,
                    "southBoundLatitude" => 2,
                    "northBoundLatitude" => 3,
                    _ => return,
                };
                self.geo_bounds[index] = text.parse().ok();
            }
            _ => {}
        }
    }
}

fn xml_error(e: quick_xml::Error) -> WmsError {
    WmsError::CapabilitiesError(e.to_string())
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attribute(e: &BytesStart<'_>, name: &str) -> WmsResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| WmsError::CapabilitiesError(err.to_string()))?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let value = attr.unescape_value().map_err(xml_error)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn bbox_attributes(e: &BytesStart<'_>) -> WmsResult<BoundingBox> {
    let mut values = [0.0; 4];
    for (value, key) in values.iter_mut().zip(["minx", "miny", "maxx", "maxy"]) {
        let raw = attribute(e, key)?.ok_or_else(|| {
            WmsError::CapabilitiesError(format!("bounding box without '{}'", key))
        })?;
        *value = raw.trim().parse().map_err(|_| {
            WmsError::InvalidBbox(format!("{}='{}' is not a number", key, raw))
        })?;
    }
    Ok(BoundingBox::from_array(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_130: &str = r#"<?xml version="1.0"?>
<WMS_Capabilities version="1.3.0" xmlns="http://www.opengis.net/wms">
  <Service><Name>WMS</Name><Title>Test service</Title></Service>
  <Capability>
    <Layer>
      <Title>Root</Title>
      <CRS>EPSG:2056</CRS>
      <Layer queryable="1">
        <Name>roads</Name>
        <Title>Roads</Title>
      </Layer>
    </Layer>
  </Capability>
</WMS_Capabilities>"#;

    #[test]
    fn test_minimal_document() {
        let caps = WmsCapabilities::parse(MINIMAL_130).unwrap();
        assert_eq!(caps.version, WmsVersion::V130);
        assert_eq!(caps.title.as_deref(), Some("Test service"));
        assert_eq!(caps.layers.len(), 1);

        let named = caps.named_layers();
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].name.as_deref(), Some("roads"));
        assert!(named[0].queryable);
        // CRS inherited from the root layer
        assert!(named[0].supports(CrsCode::Epsg2056));
    }

    #[test]
    fn test_not_capabilities() {
        let err = WmsCapabilities::parse("<html><body>nope</body></html>").unwrap_err();
        assert!(matches!(err, WmsError::CapabilitiesError(_)));
    }

    #[test]
    fn test_service_exception() {
        let xml = r#"<ServiceExceptionReport version="1.3.0">
  <ServiceException code="InvalidUpdateSequence">Sequence too old</ServiceException>
</ServiceExceptionReport>"#;
        match WmsCapabilities::parse(xml).unwrap_err() {
            WmsError::ServiceException { code, message } => {
                assert_eq!(code, "InvalidUpdateSequence");
                assert_eq!(message, "Sequence too old");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_version() {
        let xml = r#"<WMT_MS_Capabilities version="1.0.0"></WMT_MS_Capabilities>"#;
        assert!(matches!(
            WmsCapabilities::parse(xml).unwrap_err(),
            WmsError::UnsupportedVersion(_)
        ));
    }
}
