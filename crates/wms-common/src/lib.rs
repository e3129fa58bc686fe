//! Common types and utilities shared across the geoportal WMS crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod layer;
pub mod version;

pub use bbox::BoundingBox;
pub use crs::{AxisOrder, CrsCode};
pub use error::{WmsError, WmsResult};
pub use layer::{LayerId, WmsLayerId};
pub use version::WmsVersion;
