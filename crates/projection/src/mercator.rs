//! Spherical Web Mercator (EPSG:3857).

use std::f64::consts::PI;

/// WGS84 semi-major axis used by Web Mercator (meters).
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Latitude limit where Web Mercator becomes square (degrees).
pub const MAX_LATITUDE: f64 = 85.0511287798066;

/// Convert WGS84 (lon, lat in degrees) to Web Mercator meters.
///
/// Latitudes beyond [`MAX_LATITUDE`] are clamped.
pub fn from_wgs84(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

/// Convert Web Mercator meters to WGS84 (lon, lat in degrees).
pub fn to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{assert_approx_eq, assert_coords_approx_eq};

    #[test]
    fn test_origin() {
        let (x, y) = from_wgs84(0.0, 0.0);
        assert_coords_approx_eq!((x, y), (0.0, 0.0), 1e-9);
    }

    #[test]
    fn test_world_edge() {
        let (x, y) = from_wgs84(180.0, MAX_LATITUDE);
        assert_approx_eq!(x, 20037508.342789244, 1e-6);
        assert_approx_eq!(y, 20037508.342789244, 1e-3);
    }

    #[test]
    fn test_roundtrip() {
        let (x, y) = from_wgs84(7.44, 46.95);
        let (lon, lat) = to_wgs84(x, y);
        assert_coords_approx_eq!((lon, lat), (7.44, 46.95), 1e-9);
    }
}
