use crate::core::constants::MAX_LATITUDE;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a new coordinate
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance to another point in kilometres
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        crate::game::scoring::great_circle_distance_km(self, other)
    }

    /// Wraps longitude to [-180, 180] range
    pub fn wrap_lng(lng: f64) -> f64 {
        if (-180.0..=180.0).contains(&lng) {
            return lng;
        }
        let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
        if wrapped == -180.0 && lng > 0.0 {
            180.0
        } else {
            wrapped
        }
    }

    /// Clamps latitude to the Web Mercator range
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Returns a copy that is safe to project: Mercator latitude, wrapped longitude
    pub fn normalized(&self) -> GeoPoint {
        GeoPoint::new(Self::clamp_lat(self.lat), Self::wrap_lng(self.lng))
    }

    /// Component-wise comparison with a tolerance in degrees
    pub fn approx_eq(&self, other: &GeoPoint, epsilon: f64) -> bool {
        (self.lat - other.lat).abs() <= epsilon && (self.lng - other.lng).abs() <= epsilon
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen, pixel or fractional tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        self.subtract(other).length()
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::zero()
    }
}

/// A tile address in the slippy map scheme.
///
/// `x` is not clamped: grids that straddle the antimeridian produce raw
/// columns outside `[0, 2^z)`. Use [`TileIndex::normalized`] before
/// addressing tile storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileIndex {
    pub x: i64,
    pub y: i64,
    pub z: u8,
}

impl TileIndex {
    pub fn new(x: i64, y: i64, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Number of tiles along one axis at `zoom`
    pub fn tiles_per_axis(zoom: u8) -> i64 {
        1_i64 << zoom.min(62)
    }

    /// Creates the tile containing `point` at `zoom`
    pub fn from_geo_point(point: &GeoPoint, zoom: u8) -> Self {
        let fraction = tile_fraction(point, zoom);
        let max_index = (Self::tiles_per_axis(zoom) - 1) as f64;
        let y = fraction.y.floor();
        let y = if y.is_nan() { 0.0 } else { y.clamp(0.0, max_index) };

        Self::new(fraction.x.floor() as i64, y as i64, zoom)
    }

    /// North-west corner of the tile
    pub fn to_geo_point(&self) -> GeoPoint {
        to_geo_point(Point::new(self.x as f64, self.y as f64), self.z)
    }

    /// Geographic centre of the tile
    pub fn center(&self) -> GeoPoint {
        to_geo_point(Point::new(self.x as f64 + 0.5, self.y as f64 + 0.5), self.z)
    }

    /// Wraps `x` around the antimeridian and clamps `y` into the tile range
    pub fn normalized(&self) -> TileIndex {
        let n = Self::tiles_per_axis(self.z);
        TileIndex::new(self.x.rem_euclid(n), self.y.clamp(0, n - 1), self.z)
    }

    /// Checks if the tile is addressable at its zoom level
    pub fn is_valid(&self) -> bool {
        let n = Self::tiles_per_axis(self.z);
        (0..n).contains(&self.x) && (0..n).contains(&self.y)
    }

    /// Angular extent of one tile at `zoom`, in degrees of longitude
    pub fn lng_span(zoom: u8) -> f64 {
        360.0 / Self::tiles_per_axis(zoom) as f64
    }
}

/// Projects `point` to fractional tile coordinates at `zoom`.
///
/// Longitude maps linearly to `x`. Latitude goes through the Mercator
/// transform `ln(tan φ + sec φ)`, evaluated as `asinh(tan φ)` which is the
/// same function without the cancellation near the south pole.
pub fn tile_fraction(point: &GeoPoint, zoom: u8) -> Point {
    let n = TileIndex::tiles_per_axis(zoom) as f64;
    let lat_rad = point.lat.to_radians();

    let x = (point.lng + 180.0) / 360.0 * n;
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n;

    Point::new(x, y)
}

/// Tile containing `point` at `zoom`. `y` is clamped, `x` is not.
pub fn to_tile(point: &GeoPoint, zoom: u8) -> TileIndex {
    TileIndex::from_geo_point(point, zoom)
}

/// Inverse projection from fractional tile coordinates at `zoom`
pub fn to_geo_point(tile: Point, zoom: u8) -> GeoPoint {
    let n = TileIndex::tiles_per_axis(zoom) as f64;
    let lng = tile.x / n * 360.0 - 180.0;
    let lat_rad = (PI * (1.0 - 2.0 * tile.y / n)).sinh().atan();

    GeoPoint::new(lat_rad.to_degrees(), lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_creation() {
        let coord = GeoPoint::new(40.7128, -74.0060);
        assert_eq!(coord.lat, 40.7128);
        assert_eq!(coord.lng, -74.0060);
        assert!(coord.is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn test_wrap_lng() {
        assert_eq!(GeoPoint::wrap_lng(10.0), 10.0);
        assert_eq!(GeoPoint::wrap_lng(180.0), 180.0);
        assert!((GeoPoint::wrap_lng(190.0) - -170.0).abs() < 1e-9);
        assert!((GeoPoint::wrap_lng(-190.0) - 170.0).abs() < 1e-9);
        assert!((GeoPoint::wrap_lng(540.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_tile_at_origin() {
        let tile = to_tile(&GeoPoint::new(0.0, 0.0), 1);
        assert_eq!(tile, TileIndex::new(1, 1, 1));

        let tile = to_tile(&GeoPoint::new(20.0, 0.0), 3);
        assert_eq!(tile, TileIndex::new(4, 3, 3));
    }

    #[test]
    fn test_tile_y_is_clamped() {
        let north = to_tile(&GeoPoint::new(89.9, 0.0), 4);
        let south = to_tile(&GeoPoint::new(-90.0, 0.0), 4);
        assert_eq!(north.y, 0);
        assert_eq!(south.y, 15);
    }

    #[test]
    fn test_tile_x_is_not_clamped() {
        let tile = to_tile(&GeoPoint::new(0.0, 180.0), 2);
        assert_eq!(tile.x, 4);
        assert!(!tile.is_valid());
        assert_eq!(tile.normalized(), TileIndex::new(0, 2, 2));
    }

    #[test]
    fn test_normalized_wraps_negative_columns() {
        let tile = TileIndex::new(-1, -3, 3);
        assert_eq!(tile.normalized(), TileIndex::new(7, 0, 3));
    }

    #[test]
    fn test_tile_round_trip_within_one_tile() {
        let points = [
            GeoPoint::new(48.8584, 2.2945),
            GeoPoint::new(-33.8688, 151.2093),
            GeoPoint::new(40.7128, -74.006),
            GeoPoint::new(84.0, -179.5),
            GeoPoint::new(-84.0, 179.5),
            GeoPoint::new(0.0, 0.0),
        ];

        for zoom in 2..=18u8 {
            for point in &points {
                let tile = to_tile(point, zoom);
                let nw = to_geo_point(Point::new(tile.x as f64, tile.y as f64), zoom);
                let se = to_geo_point(Point::new(tile.x as f64 + 1.0, tile.y as f64 + 1.0), zoom);

                assert!(point.lng >= nw.lng - 1e-9 && point.lng <= se.lng + 1e-9);
                assert!(point.lat <= nw.lat + 1e-9 && point.lat >= se.lat - 1e-9);
                assert!((nw.lng - point.lng).abs() <= TileIndex::lng_span(zoom));
            }
        }
    }

    #[test]
    fn test_fractional_round_trip_is_exact() {
        let point = GeoPoint::new(35.6762, 139.6503);
        for zoom in [2u8, 7, 12, 18] {
            let back = to_geo_point(tile_fraction(&point, zoom), zoom);
            assert!(back.approx_eq(&point, 1e-9), "zoom {zoom}: {back:?}");
        }
    }

    #[test]
    fn test_tile_center_inside_tile() {
        let tile = TileIndex::new(4, 3, 3);
        let center = tile.center();
        assert_eq!(to_tile(&center, 3), tile);
    }
}
