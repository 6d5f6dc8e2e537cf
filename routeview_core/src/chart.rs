//! The two-panel route chart: the route as traveled on the left and the
//! elevation profile on the right.

use std::{ops::Range, path::Path};

use anyhow::{bail, Result};
use log::info;
use logging_timer::time;
use plotters::{coord::Shift, prelude::*};

use crate::model::ElevationProfile;

/// Size of the rendered chart in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 400,
        }
    }
}

/// The output formats we can render to. Picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Png,
    Svg,
}

impl ChartKind {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ChartKind::Svg,
            _ => ChartKind::Png,
        }
    }
}

/// Returns a range that covers all `values` with a little padding. A range
/// of zero width, e.g. a flat route, is widened so the chart is not
/// degenerate.
pub fn padded_range<I: IntoIterator<Item = f64>>(values: I) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }

    let span = max - min;
    let pad = if span > 0.0 { span * 0.05 } else { min.abs().max(1.0) * 0.01 };
    (min - pad)..(max + pad)
}

/// Renders the chart to `path`, as SVG if the extension is '.svg' and PNG
/// otherwise.
#[time]
pub fn write_profile_chart<P: AsRef<Path>>(
    path: P,
    profile: &ElevationProfile,
    options: &ChartOptions,
) -> Result<()> {
    let path = path.as_ref();
    if profile.is_empty() {
        bail!("Cannot chart an empty elevation profile");
    }

    let size = (options.width, options.height);
    match ChartKind::from_path(path) {
        ChartKind::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_profile_chart(root, profile)?;
        }
        ChartKind::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_profile_chart(root, profile)?;
        }
    }

    info!("Wrote elevation chart {:?}", path);
    Ok(())
}

fn draw_profile_chart<DB>(root: DrawingArea<DB, Shift>, profile: &ElevationProfile) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let (route_area, elevation_area) = root.split_horizontally((root.dim_in_pixel().0 / 2) as i32);

    let route = profile.lon_lat_series();
    let mut chart = ChartBuilder::on(&route_area)
        .caption("Route Traveled", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(
            padded_range(route.iter().map(|p| p.0)),
            padded_range(route.iter().map(|p| p.1)),
        )?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .x_label_formatter(&|v| format!("{:.3}", v))
        .y_label_formatter(&|v| format!("{:.3}", v))
        .draw()?;
    chart.draw_series(LineSeries::new(route.iter().copied(), &BLACK))?;

    let series = profile.distance_elevation_series();
    let y_range = padded_range(profile.elevations());
    let baseline = y_range.start;
    let mut chart = ChartBuilder::on(&elevation_area)
        .caption("Elevation Profile", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(padded_range(series.iter().map(|p| p.0)), y_range)?;

    chart
        .configure_mesh()
        .x_desc("Distance (metres)")
        .y_desc("Elevation (metres)")
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;
    chart.draw_series(
        AreaSeries::new(series.iter().copied(), baseline, BLUE.mix(0.1)).border_style(BLUE),
    )?;

    root.present()?;
    Ok(())
}
