use std::path::PathBuf;

use clap::{value_parser, Parser};
use routeview_core::{chart::ChartOptions, map::DEFAULT_ZOOM};

/// Returns the parsed command line options. Uses the 'wild' crate to do glob
/// expansion on Windows. so that Windows and Linux behave identically.
pub fn parse_args() -> Args {
    Args::parse_from(wild::args())
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(
        long,
        help = "Write the route outline and elevation profile chart to this file. \
                The format is SVG if the extension is '.svg', otherwise PNG."
    )]
    pub chart: Option<PathBuf>,

    #[arg(
        long,
        help = "Write an HTML page showing the route over an OpenStreetMap basemap to this file"
    )]
    pub map: Option<PathBuf>,

    #[arg(
        short,
        long,
        default_value_t = DEFAULT_ZOOM,
        help = "Initial zoom level of the map",
        value_parser = value_parser!(u8).range(1..=18)
    )]
    pub zoom: u8,

    #[arg(
        long,
        default_value_t = 1200,
        help = "Width of the chart in pixels",
        value_parser = value_parser!(u32).range(200..=10000)
    )]
    pub width: u32,

    #[arg(
        long,
        default_value_t = 400,
        help = "Height of the chart in pixels",
        value_parser = value_parser!(u32).range(100..=10000)
    )]
    pub height: u32,

    #[arg(
        short,
        long,
        default_value = "false",
        help = "Print the track summaries as JSON instead of text"
    )]
    pub json: bool,

    #[arg(help = "The GPX file to report on")]
    pub file: PathBuf,
}

impl Args {
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["routeview", "ride.gpx"]).unwrap();
        assert_eq!(args.file, PathBuf::from("ride.gpx"));
        assert_eq!(args.zoom, 7);
        assert!(args.chart.is_none());
        assert!(args.map.is_none());
        assert!(!args.json);
        assert_eq!(args.chart_options(), ChartOptions::default());
    }

    #[test]
    fn outputs_and_zoom() {
        let args = Args::try_parse_from([
            "routeview",
            "--chart",
            "ride.svg",
            "--map",
            "ride.html",
            "-z",
            "12",
            "--json",
            "ride.gpx",
        ])
        .unwrap();
        assert_eq!(args.chart, Some(PathBuf::from("ride.svg")));
        assert_eq!(args.map, Some(PathBuf::from("ride.html")));
        assert_eq!(args.zoom, 12);
        assert!(args.json);
    }

    #[test]
    fn zoom_out_of_range() {
        assert!(Args::try_parse_from(["routeview", "-z", "30", "ride.gpx"]).is_err());
    }

    #[test]
    fn file_is_required() {
        assert!(Args::try_parse_from(["routeview"]).is_err());
    }
}
