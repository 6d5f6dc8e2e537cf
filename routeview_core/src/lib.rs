use std::path::Path;

use anyhow::Result;
use logging_timer::time;

use model::RouteAnalysis;

pub mod chart;
pub mod formatting;
pub mod geodesy;
pub mod map;
pub mod model;
pub mod model_impls;
pub mod profile;
pub mod read;
pub mod summary;

/// Reads a GPX file once and summarises each track. Nothing is printed or
/// rendered here. Points without an elevation are fine for the summaries;
/// only the elevation profile insists on one.
#[time]
pub fn analyse_file<P: AsRef<Path>>(input_file: P) -> Result<RouteAnalysis> {
    let gpx = read::read_gpx_from_file(input_file)?;
    let summaries = summary::summarise_gpx(&gpx)?;

    Ok(RouteAnalysis { gpx, summaries })
}
