//! Layer identifiers.
//!
//! External WMS layers are identified by a compound string
//! `WMS||<label>||<url>||<layer name>[||<version>[||true]]`. The map uses it to
//! correlate layers across asynchronous reordering and permalink restores, so
//! it has to be reproducible from the same inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::version::WmsVersion;

/// Unique identifier for a layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Separator between identifier components.
pub const ID_SEPARATOR: &str = "||";

/// Kind prefix of external WMS layer identifiers.
pub const WMS_KIND: &str = "WMS";

/// Marker appended when a versioned layer is reprojected client side.
pub const REPROJECTION_MARKER: &str = "true";

/// Structured form of an external WMS layer identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WmsLayerId {
    pub label: String,
    pub url: String,
    pub layer_name: String,
    pub version: Option<WmsVersion>,
    /// Only meaningful together with a version.
    pub reprojection: bool,
}

impl WmsLayerId {
    pub fn new(
        label: impl Into<String>,
        url: impl Into<String>,
        layer_name: impl Into<String>,
        version: Option<WmsVersion>,
        reprojection: bool,
    ) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            layer_name: layer_name.into(),
            reprojection: reprojection && version.is_some(),
            version,
        }
    }

    /// Name of the first component holding [`ID_SEPARATOR`], which would make
    /// the formatted identifier ambiguous.
    pub fn ambiguous_component(&self) -> Option<&'static str> {
        [
            ("label", &self.label),
            ("url", &self.url),
            ("layers", &self.layer_name),
        ]
        .into_iter()
        .find(|(_, value)| value.contains(ID_SEPARATOR))
        .map(|(name, _)| name)
    }

    /// Parse an identifier string produced by [`WmsLayerId::to_layer_id`].
    ///
    /// Returns `None` for identifiers of other layer kinds or malformed input.
    /// Identifiers only round-trip when [`WmsLayerId::ambiguous_component`]
    /// is `None`.
    pub fn parse(id: &str) -> Option<Self> {
        let parts: Vec<&str> = id.split(ID_SEPARATOR).collect();
        if parts.len() < 4 || parts.len() > 6 || parts[0] != WMS_KIND {
            return None;
        }

        let version = match parts.get(4) {
            Some(v) => Some(v.parse().ok()?),
            None => None,
        };
        let reprojection = match parts.get(5) {
            Some(&REPROJECTION_MARKER) => true,
            Some(_) => return None,
            None => false,
        };

        Some(Self {
            label: parts[1].to_string(),
            url: parts[2].to_string(),
            layer_name: parts[3].to_string(),
            version,
            reprojection,
        })
    }

    pub fn to_layer_id(&self) -> LayerId {
        LayerId(self.to_string())
    }
}

impl fmt::Display for WmsLayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{WMS_KIND}{ID_SEPARATOR}{}{ID_SEPARATOR}{}{ID_SEPARATOR}{}",
            self.label, self.url, self.layer_name
        )?;
        if let Some(version) = self.version {
            write!(f, "{ID_SEPARATOR}{version}")?;
            if self.reprojection {
                write!(f, "{ID_SEPARATOR}{REPROJECTION_MARKER}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_without_version() {
        let id = WmsLayerId::new("Parcels", "https://wms.example.ch/", "parcels", None, true);
        assert_eq!(id.to_string(), "WMS||Parcels||https://wms.example.ch/||parcels");
        assert!(!id.reprojection);
    }

    #[test]
    fn test_format_with_version_and_reprojection() {
        let id = WmsLayerId::new(
            "Parcels",
            "https://wms.example.ch/",
            "parcels",
            Some(WmsVersion::V111),
            true,
        );
        assert_eq!(
            id.to_string(),
            "WMS||Parcels||https://wms.example.ch/||parcels||1.1.1||true"
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let id = WmsLayerId::new("", "http://{s}.x.ch/wms?", "a,b", Some(WmsVersion::V130), false);
        let parsed = WmsLayerId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_separator_in_component_is_ambiguous() {
        let id = WmsLayerId::new("A||B", "https://wms.example.ch/", "parcels", None, false);
        assert_eq!(id.ambiguous_component(), Some("label"));
        assert_ne!(WmsLayerId::parse(&id.to_string()), Some(id));

        let id = WmsLayerId::new("A|B", "https://wms.example.ch/", "parcels", None, false);
        assert_eq!(id.ambiguous_component(), None);
        assert_eq!(WmsLayerId::parse(&id.to_string()), Some(id));
    }

    #[test]
    fn test_parse_rejects_foreign_ids() {
        assert!(WmsLayerId::parse("ch.swisstopo.pixelkarte-farbe").is_none());
        assert!(WmsLayerId::parse("KML||https://x.ch/a.kml").is_none());
        assert!(WmsLayerId::parse("WMS||a||b||c||9.9.9").is_none());
        assert!(WmsLayerId::parse("WMS||a||b||c||1.3.0||false").is_none());
    }
}
