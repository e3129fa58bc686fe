//! Transformations between the CRS codes known to the client.

use serde::{Deserialize, Serialize};

use wms_common::{BoundingBox, CrsCode};

use crate::mercator;
use crate::swiss::SwissGrid;

/// Points sampled along each edge when transforming an extent, so curved
/// edges in the target CRS are still covered.
const EDGE_SAMPLES: usize = 8;

/// Convert a coordinate in `crs` to WGS84 (lon, lat in degrees).
pub fn to_wgs84(crs: CrsCode, x: f64, y: f64) -> (f64, f64) {
    match crs {
        CrsCode::Epsg4326 => (x, y),
        CrsCode::Epsg3857 => mercator::to_wgs84(x, y),
        CrsCode::Epsg2056 => SwissGrid::Lv95.to_wgs84(x, y),
        CrsCode::Epsg21781 => SwissGrid::Lv03.to_wgs84(x, y),
    }
}

/// Convert WGS84 (lon, lat in degrees) to a coordinate in `crs`.
pub fn from_wgs84(crs: CrsCode, lon: f64, lat: f64) -> (f64, f64) {
    match crs {
        CrsCode::Epsg4326 => (lon, lat),
        CrsCode::Epsg3857 => mercator::from_wgs84(lon, lat),
        CrsCode::Epsg2056 => SwissGrid::Lv95.from_wgs84(lon, lat),
        CrsCode::Epsg21781 => SwissGrid::Lv03.from_wgs84(lon, lat),
    }
}

/// Transform a single coordinate between two CRS.
pub fn transform(from: CrsCode, to: CrsCode, x: f64, y: f64) -> (f64, f64) {
    if from == to {
        return (x, y);
    }
    let (lon, lat) = to_wgs84(from, x, y);
    from_wgs84(to, lon, lat)
}

/// Transform an extent, returning the bounding box of its sampled outline.
pub fn transform_extent(extent: &BoundingBox, from: CrsCode, to: CrsCode) -> BoundingBox {
    if from == to {
        return *extent;
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    let corners = extent.corners();
    for (i, &(x0, y0)) in corners.iter().enumerate() {
        let (x1, y1) = corners[(i + 1) % corners.len()];
        for step in 0..EDGE_SAMPLES {
            let t = step as f64 / EDGE_SAMPLES as f64;
            let (x, y) = transform(from, to, x0 + (x1 - x0) * t, y0 + (y1 - y0) * t);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    BoundingBox::new(min_x, min_y, max_x, max_y)
}

/// A geographic rectangle in radians, as consumed by 3D globe renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Rectangle {
    pub fn from_degrees(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west: west.to_radians(),
            south: south.to_radians(),
            east: east.to_radians(),
            north: north.to_radians(),
        }
    }

    /// The rectangle as a WGS84 bounding box in degrees.
    pub fn to_degrees(&self) -> BoundingBox {
        BoundingBox::new(
            self.west.to_degrees(),
            self.south.to_degrees(),
            self.east.to_degrees(),
            self.north.to_degrees(),
        )
    }
}

/// Transform an extent in `crs` to a geographic rectangle.
pub fn extent_to_rectangle(extent: &BoundingBox, crs: CrsCode) -> Rectangle {
    let geo = transform_extent(extent, crs, CrsCode::Epsg4326);
    Rectangle::from_degrees(geo.min_x, geo.min_y, geo.max_x, geo.max_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;
    use test_utils::fixtures::bbox::{BERN_LV95, SWITZERLAND_WGS84};

    #[test]
    fn test_identity_transform() {
        let extent = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(
            transform_extent(&extent, CrsCode::Epsg2056, CrsCode::Epsg2056),
            extent
        );
    }

    #[test]
    fn test_swiss_extent_to_wgs84_covers_switzerland() {
        let extent = CrsCode::Epsg2056.valid_bounds();
        let geo = transform_extent(&extent, CrsCode::Epsg2056, CrsCode::Epsg4326);
        let (w, s, e, n) = SWITZERLAND_WGS84;
        assert!(geo.min_x < w && geo.max_x > e, "lon range {:?}", geo);
        assert!(geo.min_y < s && geo.max_y > n, "lat range {:?}", geo);
    }

    #[test]
    fn test_small_extent_roundtrip() {
        let (w, s, e, n) = BERN_LV95;
        let extent = BoundingBox::new(w, s, e, n);
        let geo = transform_extent(&extent, CrsCode::Epsg2056, CrsCode::Epsg4326);
        let back = transform_extent(&geo, CrsCode::Epsg4326, CrsCode::Epsg2056);
        assert_approx_eq!(back.min_x, w, 5.0);
        assert_approx_eq!(back.max_y, n, 5.0);
    }

    #[test]
    fn test_lv03_lv95_offset() {
        let (e, n) = transform(CrsCode::Epsg21781, CrsCode::Epsg2056, 600000.0, 200000.0);
        assert_approx_eq!(e, 2600000.0, 5.0);
        assert_approx_eq!(n, 1200000.0, 5.0);
    }

    #[test]
    fn test_rectangle_in_radians() {
        let rect = extent_to_rectangle(
            &BoundingBox::new(-180.0, -90.0, 180.0, 90.0),
            CrsCode::Epsg4326,
        );
        assert_approx_eq!(rect.west, -std::f64::consts::PI, 1e-12);
        assert_approx_eq!(rect.north, std::f64::consts::FRAC_PI_2, 1e-12);
        assert_approx_eq!(rect.to_degrees().max_x, 180.0, 1e-9);
    }
}
