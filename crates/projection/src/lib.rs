//! Coordinate reference system transformations.
//!
//! Implements the few projections the geoportal client needs without
//! external dependencies: the Swiss national grids and Web Mercator, all
//! expressed relative to WGS84.

pub mod mercator;
pub mod swiss;
pub mod transform;

pub use swiss::SwissGrid;
pub use transform::{extent_to_rectangle, transform, transform_extent, Rectangle};
