//! Conversions from geographic coordinates to distances.
//!
//! Two different measures live here. The elevation profile uses a simple
//! projection onto the WGS84 ellipsoid and takes straight-line distances
//! between the projected points. That is good enough for showing relative
//! distances along a single contiguous route but it is not a true ECEF or
//! local tangent plane transform, so don't use it for absolute positioning.
//! The route summary uses great-circle distances from the `geo` crate.

use geo::{point, EuclideanDistance, HaversineDistance, Point};

use crate::model::{CartesianPoint, TrackPoint, Waypoint};

/// WGS84 semi-major axis, metres.
pub const WGS84_A: f64 = 6378137.0;

/// WGS84 semi-minor axis, metres.
pub const WGS84_B: f64 = 6356752.3142;

/// First eccentricity squared, e² = 1 - b²/a².
pub fn eccentricity_squared() -> f64 {
    1.0 - (WGS84_B.powi(2) / WGS84_A.powi(2))
}

/// Radius of curvature in the prime vertical, N, at latitude `lat` (degrees).
/// The absolute latitude is used; sin² makes the sign irrelevant anyway.
pub fn prime_vertical_radius(lat: f64) -> f64 {
    let sin_lat = lat.abs().to_radians().sin();
    WGS84_A / (1.0 - eccentricity_squared() * sin_lat.powi(2)).sqrt()
}

/// Projects a geographic point (degrees, degrees, metres) onto the plane
/// used for distance measurement.
///
/// X = (N + h) cos(lat) cos(lon)
/// Y = (N + h) cos(lat) sin(lon)
pub fn geo_to_cartesian(lon: f64, lat: f64, ele: f64) -> CartesianPoint {
    let n = prime_vertical_radius(lat);
    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();

    CartesianPoint {
        x: (n + ele) * lat_rad.cos() * lon_rad.cos(),
        y: (n + ele) * lat_rad.cos() * lon_rad.sin(),
    }
}

impl From<&TrackPoint> for CartesianPoint {
    fn from(value: &TrackPoint) -> Self {
        geo_to_cartesian(value.lon, value.lat, value.ele)
    }
}

impl From<CartesianPoint> for Point {
    fn from(value: CartesianPoint) -> Self {
        point!(x: value.x, y: value.y)
    }
}

impl CartesianPoint {
    /// Straight-line distance in metres. Exactly 0.0 for identical points.
    pub fn distance_to(&self, other: &CartesianPoint) -> f64 {
        Point::from(*self).euclidean_distance(&Point::from(*other))
    }
}

/// Great-circle distance between two points, ignoring elevation.
/// n.b. x=lon, y=lat. If you do it the other way round the distances
/// are wrong - a lot wrong.
pub fn distance_2d_metres(p1: &Waypoint, p2: &Waypoint) -> f64 {
    let a = point!(x: p1.lon, y: p1.lat);
    let b = point!(x: p2.lon, y: p2.lat);
    a.haversine_distance(&b)
}

/// Great-circle distance combined with the change in elevation. If either
/// point has no elevation this is the same as the 2D distance.
pub fn distance_3d_metres(p1: &Waypoint, p2: &Waypoint) -> f64 {
    let d = distance_2d_metres(p1, p2);
    match (p1.ele, p2.ele) {
        (Some(e1), Some(e2)) => d.hypot(e1 - e2),
        _ => d,
    }
}
