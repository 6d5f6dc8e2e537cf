//! Building the distance/elevation profile of a route.

use anyhow::{bail, Result};
use log::debug;
use logging_timer::time;

use crate::model::{CartesianPoint, DistanceProfile, ElevationProfile, Gpx, TrackPoint};

/// Calculates the distance travelled to reach each point, measured along the
/// route on the projected plane. The first point is at 0.0; each later point
/// adds the straight-line distance from its predecessor. The last point has
/// no successor so it contributes nothing further.
pub fn cumulative_distances(points: &[TrackPoint]) -> DistanceProfile {
    let mut distances = Vec::with_capacity(points.len());
    if points.is_empty() {
        return DistanceProfile(distances);
    }

    let projected: Vec<CartesianPoint> = points.iter().map(CartesianPoint::from).collect();

    let mut running_metres = 0.0;
    distances.push(running_metres);
    for pair in projected.windows(2) {
        running_metres += pair[0].distance_to(&pair[1]);
        distances.push(running_metres);
    }

    DistanceProfile(distances)
}

impl ElevationProfile {
    /// Builds the profile from every point in the file. All points must have
    /// an elevation and a time.
    #[time]
    pub fn from_gpx(gpx: &Gpx) -> Result<Self> {
        Self::new(gpx.track_points()?)
    }

    pub fn new(points: Vec<TrackPoint>) -> Result<Self> {
        if points.is_empty() {
            bail!("Cannot build an elevation profile from an empty list of trackpoints");
        }

        let distances = cumulative_distances(&points);
        debug!(
            "Elevation profile has {} points over {:.0} metres",
            points.len(),
            distances.total_metres()
        );

        Ok(Self { points, distances })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the length of the route in metres, as measured by the profile.
    pub fn total_distance_metres(&self) -> f64 {
        self.distances.total_metres()
    }

    /// Returns the elevation of each point, in order.
    pub fn elevations(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.ele).collect()
    }

    /// Returns the lowest elevation on the route.
    pub fn min_elevation(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.ele)
            .fold(f64::INFINITY, f64::min)
    }

    /// Returns the highest elevation on the route.
    pub fn max_elevation(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.ele)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// (distance, elevation) pairs for the elevation panel of the chart.
    pub fn distance_elevation_series(&self) -> Vec<(f64, f64)> {
        self.distances
            .iter()
            .copied()
            .zip(self.points.iter().map(|p| p.ele))
            .collect()
    }

    /// (lon, lat) pairs for the route panel of the chart.
    pub fn lon_lat_series(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.lon, p.lat)).collect()
    }
}
