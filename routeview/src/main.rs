use anyhow::Result;
use args::{parse_args, Args};
use clap::builder::styling::AnsiColor;
use env_logger::Builder;
use log::{debug, info};
use logging_timer::time;
use routeview_core::{
    analyse_file,
    chart::write_profile_chart,
    map::write_route_map,
    model::{ElevationProfile, RouteAnalysis},
};
use std::io::Write;

mod args;

pub const PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");

#[time]
fn main() -> Result<()> {
    configure_logging();
    info!("Starting {PROGRAM_NAME}");

    let args = parse_args();
    debug!("{:?}", &args);

    let analysis = analyse_file(&args.file)?;
    print_summaries(&analysis, &args)?;

    // The profile needs an elevation on every point, so only build it when
    // there is a chart to draw.
    if let Some(chart_file) = &args.chart {
        let profile = ElevationProfile::from_gpx(&analysis.gpx)?;
        write_profile_chart(chart_file, &profile, &args.chart_options())?;
    }

    if let Some(map_file) = &args.map {
        write_route_map(map_file, &analysis.gpx, args.zoom)?;
    }

    Ok(())
}

fn print_summaries(analysis: &RouteAnalysis, args: &Args) -> Result<()> {
    let stdout = std::io::stdout();
    let mut w = stdout.lock();

    if args.json {
        serde_json::to_writer_pretty(&mut w, &analysis.summaries)?;
        writeln!(w)?;
    } else {
        for summary in &analysis.summaries {
            writeln!(w, "{summary}")?;
        }
    }

    w.flush()?;
    Ok(())
}

fn configure_logging() {
    let mut builder = Builder::from_default_env();

    builder.format(|buf, record| {
        let level_style = buf.default_level_style(record.level());
        let level_style = match record.level() {
            log::Level::Error => level_style.fg_color(Some(AnsiColor::Red.into())),
            log::Level::Warn => level_style.fg_color(Some(AnsiColor::Yellow.into())),
            log::Level::Info => level_style.fg_color(Some(AnsiColor::Green.into())),
            log::Level::Debug => level_style.fg_color(Some(AnsiColor::Blue.into())),
            log::Level::Trace => level_style.fg_color(Some(AnsiColor::Magenta.into())),
        };

        let line_number_style = buf
            .default_level_style(record.level())
            .fg_color(Some(AnsiColor::Cyan.into()));

        match (record.file(), record.line()) {
            (Some(file), Some(line)) => writeln!(
                buf,
                "[{} {level_style}{}{level_style:#} {}/{line_number_style}{}{line_number_style:#}] {}",
                buf.timestamp(),
                record.level(),
                file,
                line,
                record.args()
            ),
            (Some(file), None) => writeln!(
                buf,
                "[{} {level_style}{}{level_style:#} {}] {}",
                buf.timestamp(),
                record.level(),
                file,
                record.args()
            ),
            (None, _) => writeln!(
                buf,
                "[{} {level_style}{}{level_style:#}] {}",
                buf.timestamp(),
                record.level(),
                record.args()
            ),
        }
    });

    builder.init();
}
