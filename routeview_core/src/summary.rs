//! The per-track route summary: lengths, duration, speed and endpoints.

use core::fmt;

use anyhow::{bail, Context, Result};
use log::debug;
use time::Duration;

use crate::{
    formatting::{format_duration, format_elevation, format_utc_date},
    model::{Gpx, RouteSummary, Track},
};

/// Rounds to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Calculates the average speed in km/h, rounded to 2 d.p. A zero duration
/// is an error rather than an infinite speed.
pub fn average_speed_kmh(km: f64, duration: Duration) -> Result<f64> {
    let hours = duration.as_seconds_f64() / 3600.0;
    if hours == 0.0 {
        bail!("Cannot calculate average speed, the duration is zero");
    }

    Ok(round2(km / hours))
}

/// Summarises each track in the file, in document order.
pub fn summarise_gpx(gpx: &Gpx) -> Result<Vec<RouteSummary>> {
    gpx.tracks
        .iter()
        .enumerate()
        .map(|(idx, track)| {
            summarise_track(track).with_context(|| {
                format!(
                    "Could not summarise track {idx} ({})",
                    track.name.as_deref().unwrap_or("unnamed")
                )
            })
        })
        .collect()
}

/// Summarises a single track. The track must have at least one timed point
/// and must not start and end at the same instant.
pub fn summarise_track(track: &Track) -> Result<RouteSummary> {
    let (start_time, end_time) = track
        .time_bounds()
        .context("Track has no timed points, cannot determine its time bounds")?;

    let duration = end_time - start_time;
    let length_2d_km = round2(track.length_2d_metres() / 1000.0);
    let length_3d_km = round2(track.length_3d_metres() / 1000.0);
    let average_speed_kmh = average_speed_kmh(length_2d_km, duration)?;

    let start = track
        .point_at(start_time)
        .context("No point found at the start time")?
        .clone();
    let end = track
        .point_at(end_time)
        .context("No point found at the end time")?
        .clone();

    debug!(
        "Summarised track {:?}: {} points, {} km in {} starting at {}",
        track.name,
        track.num_points(),
        length_2d_km,
        format_duration(duration),
        format_utc_date(&start_time)
    );

    Ok(RouteSummary {
        name: track.name.clone(),
        length_2d_km,
        length_3d_km,
        duration,
        average_speed_kmh,
        start,
        end,
    })
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Track name: {}", self.name.as_deref().unwrap_or("None"))?;
        writeln!(f, "Track 2D length: {:.2} km", self.length_2d_km)?;
        writeln!(f, "Track 3D length: {:.2} km", self.length_3d_km)?;
        writeln!(f, "Duration: {}", format_duration(self.duration))?;
        writeln!(f, "Avg speed: {:.2} km/h", self.average_speed_kmh)?;
        writeln!(
            f,
            "Start point at: {},{},{}",
            self.start.lat,
            self.start.lon,
            format_elevation(self.start.ele)
        )?;
        write!(
            f,
            "End point at: {},{},{}",
            self.end.lat,
            self.end.lon,
            format_elevation(self.end.ele)
        )
    }
}
