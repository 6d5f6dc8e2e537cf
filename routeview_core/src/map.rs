//! Overlays a route on an OpenStreetMap basemap as a standalone Leaflet page.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{bail, Context, Result};
use geo::{Centroid, MultiPoint, Point};
use log::info;
use logging_timer::time;

use crate::model::{Gpx, Lat, Lon};

/// The zoom used when none is given.
pub const DEFAULT_ZOOM: u8 = 7;

const MAP_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"></script>
  <style>
    html, body { height: 100%; margin: 0; }
    #map { position: absolute; inset: 0; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
    const map = L.map('map', { center: {{CENTRE}}, zoom: {{ZOOM}} });
    L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
      maxZoom: 19,
      attribution: '&copy; OpenStreetMap contributors'
    }).addTo(map);
    L.polyline({{POINTS}}, { color: 'red', weight: 2.5, opacity: 1 }).addTo(map);
  </script>
</body>
</html>
"#;

/// Returns every (lat, lon) in the file in document order, across all
/// tracks and segments.
pub fn route_coordinates(gpx: &Gpx) -> Vec<(Lat, Lon)> {
    gpx.waypoints().map(|p| (p.lat, p.lon)).collect()
}

/// The arithmetic mean of all the recorded coordinates, as (lat, lon).
/// An empty file has no centre; we never fall back to (0, 0).
pub fn map_centre(gpx: &Gpx) -> Result<(Lat, Lon)> {
    let points: MultiPoint = gpx
        .waypoints()
        .map(|p| Point::new(p.lon, p.lat))
        .collect();

    match points.centroid() {
        Some(c) => Ok((c.y(), c.x())),
        None => bail!("Cannot centre a map on a route with no trackpoints"),
    }
}

/// Renders the map page for the route without writing it anywhere.
pub fn render_route_map(gpx: &Gpx, zoom: u8) -> Result<String> {
    let (lat, lon) = map_centre(gpx)?;
    let points: Vec<[f64; 2]> = route_coordinates(gpx)
        .into_iter()
        .map(|(lat, lon)| [lat, lon])
        .collect();

    let title = gpx
        .tracks
        .iter()
        .find_map(|t| t.name.as_deref())
        .or(gpx.metadata.name.as_deref())
        .unwrap_or("Route");

    Ok(MAP_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{CENTRE}}", &serde_json::to_string(&[lat, lon])?)
        .replace("{{ZOOM}}", &zoom.to_string())
        .replace("{{POINTS}}", &serde_json::to_string(&points)?))
}

/// Writes the map page for the route to `path`.
#[time]
pub fn write_route_map<P: AsRef<Path>>(path: P, gpx: &Gpx, zoom: u8) -> Result<()> {
    let path = path.as_ref();
    let html = render_route_map(gpx, zoom)?;

    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut w = BufWriter::new(file);
    w.write_all(html.as_bytes())?;
    w.flush()?;

    info!("Wrote route map {:?}, {} Kb", path, html.len() / 1024);
    Ok(())
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
