//! Global options of the map viewer.
//!
//! Everything the layer factory reads besides its inputs lives here and is
//! passed in explicitly, so two factories built from the same options behave
//! identically.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use wms_common::{BoundingBox, CrsCode, WmsError, WmsResult};

/// Environment variable names understood by [`GlobalOptions::apply_env`].
pub const ENV_PROXY_URL: &str = "GEOPORTAL_PROXY_URL";
pub const ENV_LANG: &str = "GEOPORTAL_LANG";
pub const ENV_METADATA_URL: &str = "GEOPORTAL_METADATA_URL";
pub const ENV_MIN_RETRIEVING_LEVEL: &str = "GEOPORTAL_MIN_RETRIEVING_LEVEL";

/// Viewer-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalOptions {
    /// Working projection of the 2D map.
    pub map_crs: CrsCode,
    /// Default viewing extent, in `map_crs`.
    pub default_extent: BoundingBox,
    /// Lowest level a 3D imagery provider requests tiles for.
    pub minimum_retrieving_level: u32,
    /// Levels for which 3D imagery is available, if restricted.
    pub imagery_available_levels: Option<Vec<u32>>,
    /// Metadata endpoint handed to 3D imagery providers.
    pub imagery_metadata_url: Option<String>,
    /// Proxy prefix for requests to untrusted origins.
    pub proxy_url: String,
    /// Domains operated by the administration; everything else is third party.
    pub admin_domains: Vec<String>,
    /// Language used until the UI selects one.
    pub default_lang: String,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            map_crs: CrsCode::Epsg2056,
            default_extent: CrsCode::Epsg2056.valid_bounds(),
            minimum_retrieving_level: 6,
            imagery_available_levels: None,
            imagery_metadata_url: None,
            proxy_url: "https://proxy.geo.admin.ch/".to_string(),
            admin_domains: vec![
                "admin.ch".to_string(),
                "bgdi.ch".to_string(),
                "swisstopo.cloud".to_string(),
            ],
            default_lang: "de".to_string(),
        }
    }
}

impl GlobalOptions {
    /// Load options from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> WmsResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            WmsError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let options = Self::from_yaml_str(&contents)?;
        info!(path = %path.display(), map_crs = %options.map_crs, "Loaded global options");
        Ok(options)
    }

    pub fn from_yaml_str(contents: &str) -> WmsResult<Self> {
        let options: Self = serde_yaml::from_str(contents)
            .map_err(|e| WmsError::ConfigError(format!("Invalid options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> WmsResult<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by the `GEOPORTAL_*` names.
    pub fn apply_overrides<F>(mut self, lookup: F) -> WmsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(proxy) = lookup(ENV_PROXY_URL) {
            self.proxy_url = proxy;
        }
        if let Some(lang) = lookup(ENV_LANG) {
            self.default_lang = lang;
        }
        if let Some(url) = lookup(ENV_METADATA_URL) {
            self.imagery_metadata_url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(level) = lookup(ENV_MIN_RETRIEVING_LEVEL) {
            self.minimum_retrieving_level = level.parse().map_err(|_| {
                WmsError::ConfigError(format!(
                    "{} must be an unsigned integer, got '{}'",
                    ENV_MIN_RETRIEVING_LEVEL, level
                ))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check invariants the factory relies on.
    pub fn validate(&self) -> WmsResult<()> {
        if self.default_extent.is_empty() {
            return Err(WmsError::ConfigError(format!(
                "default_extent is empty: {:?}",
                self.default_extent.to_array()
            )));
        }
        if !self.default_extent.intersects(&self.map_crs.valid_bounds()) {
            warn!(
                extent = ?self.default_extent.to_array(),
                crs = %self.map_crs,
                "default_extent lies outside the map CRS bounds"
            );
        }
        if self.default_lang.is_empty() {
            return Err(WmsError::ConfigError("default_lang must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_swiss() {
        let options = GlobalOptions::default();
        assert_eq!(options.map_crs, CrsCode::Epsg2056);
        assert_eq!(
            options.default_extent.to_array(),
            [2420000.0, 1030000.0, 2900000.0, 1350000.0]
        );
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let options = GlobalOptions::from_yaml_str(
            "map_crs: EPSG:21781\ndefault_extent: {min_x: 420000, min_y: 30000, max_x: 900000, max_y: 350000}\n",
        )
        .unwrap();
        assert_eq!(options.map_crs, CrsCode::Epsg21781);
        assert_eq!(options.default_lang, "de");
        assert_eq!(options.minimum_retrieving_level, 6);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = GlobalOptions::from_yaml_str("map_crs: EPSG:1234\n").unwrap_err();
        assert!(matches!(err, WmsError::ConfigError(_)));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_LANG, "it"),
            (ENV_MIN_RETRIEVING_LEVEL, "4"),
            (ENV_METADATA_URL, "https://3d.geo.admin.ch/meta"),
        ]
        .into_iter()
        .collect();
        let options = GlobalOptions::default()
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(options.default_lang, "it");
        assert_eq!(options.minimum_retrieving_level, 4);
        assert_eq!(
            options.imagery_metadata_url.as_deref(),
            Some("https://3d.geo.admin.ch/meta")
        );
        assert_eq!(options.proxy_url, GlobalOptions::default().proxy_url);
    }

    #[test]
    fn test_bad_override() {
        let err = GlobalOptions::default()
            .apply_overrides(|k| (k == ENV_MIN_RETRIEVING_LEVEL).then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, WmsError::ConfigError(_)));
    }
}
