//! Swiss national grids (CH1903 / LV03 and CH1903+ / LV95).
//!
//! Uses the swisstopo approximate formulas, accurate to about one meter
//! inside Switzerland. That is enough for extents and tiling rectangles; it is
//! not a geodetic-grade transformation.
//!
//! Intermediate values are expressed in units of 10000" (latitude/longitude)
//! and 1000 km (easting/northing) relative to the old Bern observatory.

/// Which Swiss grid the coordinates are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwissGrid {
    /// CH1903 / LV03 (EPSG:21781), origin 600000 / 200000.
    Lv03,
    /// CH1903+ / LV95 (EPSG:2056), origin 2600000 / 1200000.
    Lv95,
}

impl SwissGrid {
    /// False easting/northing of the grid origin (Bern).
    fn origin(&self) -> (f64, f64) {
        match self {
            SwissGrid::Lv03 => (600000.0, 200000.0),
            SwissGrid::Lv95 => (2600000.0, 1200000.0),
        }
    }

    /// Convert grid coordinates (easting, northing in meters) to WGS84 (lon, lat in degrees).
    pub fn to_wgs84(&self, easting: f64, northing: f64) -> (f64, f64) {
        let (e0, n0) = self.origin();
        let y = (easting - e0) / 1_000_000.0;
        let x = (northing - n0) / 1_000_000.0;

        let lon = 2.6779094 + 4.728982 * y + 0.791484 * y * x + 0.1306 * y * x * x
            - 0.0436 * y * y * y;
        let lat = 16.9023892 + 3.238272 * x
            - 0.270978 * y * y
            - 0.002528 * x * x
            - 0.0447 * y * y * x
            - 0.0140 * x * x * x;

        // Units of 10000" to degrees
        (lon * 100.0 / 36.0, lat * 100.0 / 36.0)
    }

    /// Convert WGS84 (lon, lat in degrees) to grid coordinates (easting, northing in meters).
    pub fn from_wgs84(&self, lon: f64, lat: f64) -> (f64, f64) {
        let phi = (lat * 3600.0 - 169028.66) / 10000.0;
        let lambda = (lon * 3600.0 - 26782.5) / 10000.0;

        let easting = 600072.37 + 211455.93 * lambda
            - 10938.51 * lambda * phi
            - 0.36 * lambda * phi * phi
            - 44.54 * lambda * lambda * lambda;
        let northing = 200147.07 + 308807.95 * phi + 3745.25 * lambda * lambda
            + 76.63 * phi * phi
            - 194.56 * lambda * lambda * phi
            + 119.79 * phi * phi * phi;

        match self {
            SwissGrid::Lv03 => (easting, northing),
            SwissGrid::Lv95 => (easting + 2_000_000.0, northing + 1_000_000.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_coords_approx_eq;
    use test_utils::fixtures::points::{BERN_LV03, BERN_LV95, BERN_WGS84};

    #[test]
    fn test_bern_origin_lv95() {
        let (lon, lat) = SwissGrid::Lv95.to_wgs84(BERN_LV95.0, BERN_LV95.1);
        assert_coords_approx_eq!((lon, lat), (BERN_WGS84.0, BERN_WGS84.1), 1e-5);
    }

    #[test]
    fn test_bern_origin_lv03() {
        let (lon, lat) = SwissGrid::Lv03.to_wgs84(BERN_LV03.0, BERN_LV03.1);
        assert_coords_approx_eq!((lon, lat), (BERN_WGS84.0, BERN_WGS84.1), 1e-5);
    }

    #[test]
    fn test_swisstopo_reference_point() {
        // Reference values from the swisstopo approximate-formula documentation
        let (e, n) = SwissGrid::Lv95.from_wgs84(8.730497, 46.044130);
        assert!((e - 2700000.0).abs() < 2.0, "easting off: {}", e);
        assert!((n - 1100000.0).abs() < 2.0, "northing off: {}", n);
    }

    #[test]
    fn test_roundtrip_within_a_few_meters() {
        for &(e, n) in &[(2485000.0, 1110000.0), (2780000.0, 1250000.0)] {
            let (lon, lat) = SwissGrid::Lv95.to_wgs84(e, n);
            let (e2, n2) = SwissGrid::Lv95.from_wgs84(lon, lat);
            assert!((e - e2).abs() < 5.0, "easting roundtrip {} vs {}", e, e2);
            assert!((n - n2).abs() < 5.0, "northing roundtrip {} vs {}", n, n2);
        }
    }
}
