//! WMS protocol versions.
//!
//! The two revisions in use disagree on the CRS parameter name (`SRS` in
//! 1.1.1, `CRS` in 1.3.0) and on the axis order of geographic bounding boxes,
//! so version-dependent behavior matches on this enum instead of comparing
//! strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::crs::{AxisOrder, CrsCode};

/// Supported WMS protocol versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WmsVersion {
    /// WMS 1.1.1
    V111,
    /// WMS 1.3.0
    V130,
}

impl WmsVersion {
    /// Version assumed when a request or layer does not name one.
    pub const DEFAULT: WmsVersion = WmsVersion::V130;

    pub fn as_str(&self) -> &'static str {
        match self {
            WmsVersion::V111 => "1.1.1",
            WmsVersion::V130 => "1.3.0",
        }
    }

    /// Name of the CRS query parameter for this version.
    pub fn crs_param(&self) -> &'static str {
        match self {
            WmsVersion::V111 => "srs",
            WmsVersion::V130 => "crs",
        }
    }

    /// Axis order of BBOX values expressed in `crs`.
    pub fn axis_order(&self, crs: CrsCode) -> AxisOrder {
        match self {
            WmsVersion::V111 => crs.axis_order_wms_1_1(),
            WmsVersion::V130 => crs.axis_order_wms_1_3(),
        }
    }
}

impl Default for WmsVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for WmsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WmsVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1.1.1" => Ok(WmsVersion::V111),
            "1.3.0" => Ok(WmsVersion::V130),
            other => Err(VersionParseError::Unsupported(other.to_string())),
        }
    }
}

impl TryFrom<String> for WmsVersion {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WmsVersion> for String {
    fn from(version: WmsVersion) -> Self {
        version.as_str().to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VersionParseError {
    #[error("Unsupported WMS version: {0}")]
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versions() {
        assert_eq!("1.1.1".parse::<WmsVersion>().unwrap(), WmsVersion::V111);
        assert_eq!("1.3.0".parse::<WmsVersion>().unwrap(), WmsVersion::V130);
        assert!("1.0.0".parse::<WmsVersion>().is_err());
        assert!("".parse::<WmsVersion>().is_err());
    }

    #[test]
    fn test_crs_param_name() {
        assert_eq!(WmsVersion::V111.crs_param(), "srs");
        assert_eq!(WmsVersion::V130.crs_param(), "crs");
    }

    #[test]
    fn test_geographic_axis_order_differs() {
        assert_eq!(WmsVersion::V111.axis_order(CrsCode::Epsg4326), AxisOrder::XY);
        assert_eq!(
            WmsVersion::V130.axis_order(CrsCode::Epsg4326),
            AxisOrder::LatLon
        );
        assert_eq!(WmsVersion::V130.axis_order(CrsCode::Epsg2056), AxisOrder::XY);
    }

    #[test]
    fn test_default_is_130() {
        assert_eq!(WmsVersion::default().as_str(), "1.3.0");
    }
}
