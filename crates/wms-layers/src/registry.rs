//! Layer configuration registry.
//!
//! Holds the per-layer settings published by the layers configuration
//! service, keyed by layer name. The factory only needs the gutter; label and
//! attribution are kept for callers that display configured layers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use wms_common::{WmsError, WmsResult};

/// Settings of one configured layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerConfigEntry {
    #[serde(default)]
    pub label: Option<String>,
    /// Pixel padding around requested images.
    #[serde(default)]
    pub gutter: Option<u32>,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(default, rename = "type")]
    pub layer_type: Option<String>,
}

/// Registry of layer configurations keyed by layer name.
#[derive(Debug, Clone, Default)]
pub struct LayerConfigRegistry {
    layers: HashMap<String, LayerConfigEntry>,
}

impl LayerConfigRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a `.json`, `.yaml` or `.yml` file holding a map of layer
    /// name to entry.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> WmsResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            WmsError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let registry = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Self::from_json_str(&contents)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents)?,
            _ => {
                return Err(WmsError::ConfigError(format!(
                    "Unsupported layers config format: {}",
                    path.display()
                )))
            }
        };

        info!(path = %path.display(), layers = registry.len(), "Layer config registry loaded");
        Ok(registry)
    }

    pub fn from_json_str(contents: &str) -> WmsResult<Self> {
        let layers: HashMap<String, LayerConfigEntry> = serde_json::from_str(contents)?;
        Ok(Self { layers })
    }

    pub fn from_yaml_str(contents: &str) -> WmsResult<Self> {
        let layers: HashMap<String, LayerConfigEntry> = serde_yaml::from_str(contents)
            .map_err(|e| WmsError::ConfigError(format!("Invalid layers config: {}", e)))?;
        Ok(Self { layers })
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: LayerConfigEntry) {
        self.layers.insert(name.into(), entry);
    }

    /// Get layer config by layer name
    pub fn get_layer(&self, name: &str) -> Option<&LayerConfigEntry> {
        self.layers.get(name)
    }

    /// Configured gutter for `name`. A zero gutter counts as unset.
    pub fn gutter_for(&self, name: &str) -> Option<u32> {
        let gutter = self.get_layer(name)?.gutter.filter(|g| *g > 0);
        if let Some(gutter) = gutter {
            debug!(layer = name, gutter, "Using configured gutter");
        }
        gutter
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl FromIterator<(String, LayerConfigEntry)> for LayerConfigRegistry {
    fn from_iter<I: IntoIterator<Item = (String, LayerConfigEntry)>>(iter: I) -> Self {
        Self {
            layers: iter.into_iter().collect(),
        }
    }
}
