use anyhow::{bail, Context, Result};
use log::debug;
use time::OffsetDateTime;

use crate::{
    geodesy::{distance_2d_metres, distance_3d_metres},
    model::{DistanceProfile, Gpx, Lat, Lon, Track, TrackPoint, Waypoint},
};

impl Gpx {
    /// Returns the total number of points across all tracks and segments.
    pub fn num_points(&self) -> usize {
        self.tracks.iter().map(|track| track.num_points()).sum()
    }

    /// Iterates over every point in the file, in document order, crossing
    /// track and segment boundaries.
    pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.tracks
            .iter()
            .flat_map(|track| track.segments.iter())
            .flat_map(|segment| segment.points.iter())
    }

    /// Returns every point in the file as a validated TrackPoint. Fails on the
    /// first point that lacks an elevation or a time; such points are never
    /// skipped or defaulted.
    pub fn track_points(&self) -> Result<Vec<TrackPoint>> {
        let points = self
            .waypoints()
            .enumerate()
            .map(|(idx, wp)| {
                TrackPoint::try_from(wp).with_context(|| {
                    format!("Invalid trackpoint at index {idx} ({}, {})", wp.lat, wp.lon)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Validated {} trackpoints across {} tracks",
            points.len(),
            self.tracks.len()
        );

        Ok(points)
    }
}

impl Track {
    /// Returns the number of points across all segments of this track.
    pub fn num_points(&self) -> usize {
        self.segments.iter().map(|s| s.points.len()).sum()
    }

    /// Iterates over the points of all segments in order.
    pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.segments.iter().flat_map(|s| s.points.iter())
    }

    /// Returns the times of the first and last points that have a time.
    /// None if no point in the track is timed.
    pub fn time_bounds(&self) -> Option<(OffsetDateTime, OffsetDateTime)> {
        let start = self.waypoints().find_map(|p| p.time)?;
        let end = self.waypoints().filter_map(|p| p.time).last()?;
        Some((start, end))
    }

    /// Returns the first point recorded at exactly `time`.
    pub fn point_at(&self, time: OffsetDateTime) -> Option<&Waypoint> {
        self.waypoints().find(|p| p.time == Some(time))
    }

    /// Length in metres ignoring elevation. Segments are measured separately,
    /// the gap between the end of one segment and the start of the next is
    /// not part of the track.
    pub fn length_2d_metres(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| {
                s.points
                    .windows(2)
                    .map(|w| distance_2d_metres(&w[0], &w[1]))
                    .sum::<f64>()
            })
            .sum()
    }

    /// Length in metres including the elevation change between points.
    pub fn length_3d_metres(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| {
                s.points
                    .windows(2)
                    .map(|w| distance_3d_metres(&w[0], &w[1]))
                    .sum::<f64>()
            })
            .sum()
    }
}

impl Waypoint {
    pub fn with_lat_lon(lat: Lat, lon: Lon) -> Self {
        Self {
            lat,
            lon,
            ..Default::default()
        }
    }
}

impl TryFrom<&Waypoint> for TrackPoint {
    type Error = anyhow::Error;

    fn try_from(value: &Waypoint) -> Result<Self> {
        let Some(ele) = value.ele else {
            bail!("Trackpoint has no <ele> element");
        };

        let Some(time) = value.time else {
            bail!("Trackpoint has no <time> element");
        };

        Ok(Self {
            lon: value.lon,
            lat: value.lat,
            ele,
            time,
        })
    }
}

impl TrackPoint {
    /// The clock time of the point as an offset into its day, in whole
    /// seconds. The date is discarded, so this wraps at midnight.
    pub fn seconds_since_midnight(&self) -> u32 {
        let (h, m, s) = self.time.time().as_hms();
        h as u32 * 3600 + m as u32 * 60 + s as u32
    }
}

impl DistanceProfile {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// The cumulative distance at the final point, i.e. the route length.
    pub fn total_metres(&self) -> f64 {
        self.0.last().copied().unwrap_or_default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::model::TrackSegment;

    fn wp(lat: f64, lon: f64, ele: Option<f64>, time: Option<OffsetDateTime>) -> Waypoint {
        Waypoint { lat, lon, ele, time }
    }

    #[test]
    fn seconds_since_midnight_ignores_date() {
        let tp = TrackPoint {
            lon: 0.0,
            lat: 0.0,
            ele: 0.0,
            time: datetime!(2014-06-14 13:05:09 UTC),
        };
        assert_eq!(tp.seconds_since_midnight(), 13 * 3600 + 5 * 60 + 9);
    }

    #[test]
    fn track_points_rejects_missing_elevation() {
        let mut gpx = Gpx::default();
        gpx.tracks.push(Track {
            segments: vec![TrackSegment {
                points: vec![
                    wp(1.0, 2.0, Some(10.0), Some(datetime!(2020-01-01 0:00 UTC))),
                    wp(1.0, 2.0, None, Some(datetime!(2020-01-01 0:01 UTC))),
                ],
            }],
            ..Default::default()
        });

        let err = gpx.track_points().unwrap_err();
        assert!(format!("{err:#}").contains("index 1"));
        assert!(format!("{err:#}").contains("<ele>"));
    }

    #[test]
    fn track_points_rejects_missing_time() {
        let mut gpx = Gpx::default();
        gpx.tracks.push(Track {
            segments: vec![TrackSegment {
                points: vec![wp(1.0, 2.0, Some(10.0), None)],
            }],
            ..Default::default()
        });

        assert!(gpx.track_points().is_err());
    }

    #[test]
    fn time_bounds_skip_untimed_points() {
        let track = Track {
            segments: vec![
                TrackSegment {
                    points: vec![
                        wp(0.0, 0.0, None, None),
                        wp(0.0, 0.0, None, Some(datetime!(2020-01-01 10:00 UTC))),
                    ],
                },
                TrackSegment {
                    points: vec![
                        wp(0.0, 0.0, None, Some(datetime!(2020-01-01 11:30 UTC))),
                        wp(0.0, 0.0, None, None),
                    ],
                },
            ],
            ..Default::default()
        };

        let (start, end) = track.time_bounds().unwrap();
        assert_eq!(start, datetime!(2020-01-01 10:00 UTC));
        assert_eq!(end, datetime!(2020-01-01 11:30 UTC));
    }

    #[test]
    fn time_bounds_none_when_untimed() {
        let track = Track {
            segments: vec![TrackSegment {
                points: vec![wp(0.0, 0.0, Some(1.0), None)],
            }],
            ..Default::default()
        };
        assert!(track.time_bounds().is_none());
    }

    #[test]
    fn length_does_not_bridge_segments() {
        let one_segment = Track {
            segments: vec![TrackSegment {
                points: vec![wp(0.0, 0.0, None, None), wp(0.0, 0.01, None, None)],
            }],
            ..Default::default()
        };
        let mut two_segments = one_segment.clone();
        two_segments.segments.push(TrackSegment {
            points: vec![wp(5.0, 5.0, None, None), wp(5.0, 5.0, None, None)],
        });

        assert_eq!(one_segment.length_2d_metres(), two_segments.length_2d_metres());
    }
}
