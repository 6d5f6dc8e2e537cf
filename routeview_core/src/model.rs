use std::path::PathBuf;

use serde::Serialize;
use time::{Duration, OffsetDateTime};

/// Data parsed from a GPX file. Only the parts of the XSD at
/// https://www.topografix.com/GPX/1/1/gpx.xsd that we need for route
/// reporting are kept, everything else is skipped by the reader.
#[derive(Debug, Clone, Default)]
pub struct Gpx {
    /// The filename is not part of the XSD, but it is convenient to have
    /// it so it can be used as an identifier for the GPX data.
    pub filename: Option<PathBuf>,
    /// The 'version' attribute. This should always be "1.1".
    pub version: String,
    /// The 'creator' attribute.
    pub creator: String,
    /// Metadata about the file.
    pub metadata: Metadata,
    /// A list of tracks.
    pub tracks: Vec<Track>,
}

/// The subset of the 'metadata' element that we report on.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    /// The name of the GPX file.
    pub name: Option<String>,
    /// The creation date of the file.
    pub time: Option<OffsetDateTime>,
}

pub type Lat = f64; // -90..90
pub type Lon = f64; // -180..180

/// A Track is an ordered list of points describing a path.
#[derive(Debug, Clone, Default)]
pub struct Track {
    /// GPS name of the track.
    pub name: Option<String>,
    /// Type (classification) of the track.
    pub r#type: Option<String>,
    /// List of segments in the track. To represent a single GPS track where
    /// GPS reception was lost, or the GPS receiver was turned off, a new
    /// Track Segment is started for each continuous span of track data.
    pub segments: Vec<TrackSegment>,
}

/// A Track Segment holds a list of Track Points which are logically connected
/// in order.
#[derive(Debug, Clone, Default)]
pub struct TrackSegment {
    /// The set of points in the segment.
    pub points: Vec<Waypoint>,
}

/// A 'trkpt' exactly as it appears in the file. Both 'ele' and 'time' are
/// optional according to the XSD.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Waypoint {
    /// The latitude of the point. This is always in decimal degrees, and always
    /// in WGS84 datum.
    pub lat: Lat,
    /// The longitude of the point. This is always in decimal degrees, and
    /// always in WGS84 datum.
    pub lon: Lon,
    /// Elevation (in meters) of the point.
    pub ele: Option<f64>,
    /// Timestamp of the point. Date and time are in UTC, not local time!
    #[serde(with = "time::serde::rfc3339::option")]
    pub time: Option<OffsetDateTime>,
}

/// A validated track point. Unlike a [`Waypoint`] every field is mandatory,
/// the conversion fails if the file did not supply an elevation or a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    /// Decimal degrees, WGS84.
    pub lon: Lon,
    /// Decimal degrees, WGS84.
    pub lat: Lat,
    /// Metres.
    pub ele: f64,
    /// The time as read from the <time> tag.
    pub time: OffsetDateTime,
}

/// A point projected onto the approximate Cartesian plane used for
/// measuring distances along a route. Metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
}

/// Cumulative distances in metres, one per [`TrackPoint`]. The first entry
/// is always 0.0 and the sequence never decreases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceProfile(pub(crate) Vec<f64>);

/// The points of a GPX file together with the distance travelled to reach
/// each one. This is everything the elevation chart needs.
#[derive(Debug, Clone)]
pub struct ElevationProfile {
    pub points: Vec<TrackPoint>,
    pub distances: DistanceProfile,
}

/// Aggregate statistics for a single 'trk'.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    /// The track name, if the file gave one.
    pub name: Option<String>,
    /// Great-circle length in km, rounded to 2 d.p.
    pub length_2d_km: f64,
    /// Length including the elevation changes in km, rounded to 2 d.p.
    pub length_3d_km: f64,
    /// Time between the first and last timed points in the track.
    #[serde(serialize_with = "crate::formatting::serialize_duration")]
    pub duration: Duration,
    /// Rounded to 2 d.p.
    pub average_speed_kmh: f64,
    /// The point at which the track starts (the first timed point).
    pub start: Waypoint,
    /// The point at which the track ends (the last timed point).
    pub end: Waypoint,
}

/// The parsed file and its track summaries, before any of it is printed or
/// rendered. The elevation profile is stricter about its input, so it is
/// built separately with `ElevationProfile::from_gpx` when it is needed.
#[derive(Debug, Clone)]
pub struct RouteAnalysis {
    pub gpx: Gpx,
    pub summaries: Vec<RouteSummary>,
}
