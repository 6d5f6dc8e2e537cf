#![allow(clippy::single_match)]

use std::{borrow::Cow, path::Path, str::FromStr};

use anyhow::{bail, Context, Result};
use gpx::{parse_gpx, parse_gpx_attributes};
use log::info;
use logging_timer::time;
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use time::{format_description::well_known, OffsetDateTime, PrimitiveDateTime};

use crate::model::Gpx;

mod attributes;
mod gpx;
mod metadata;
mod track;
mod track_segment;
mod waypoint;

/// The XSD, which defines the format of a GPX file, is at https://www.topografix.com/GPX/1/1/gpx.xsd
/// The whole file is read into memory first, so the file handle is closed
/// before any parsing happens.
#[time]
pub fn read_gpx_from_file<P: AsRef<Path>>(input_file: P) -> Result<Gpx> {
    let input_file = input_file.as_ref();
    info!("Reading GPX file {:?}", input_file);
    let contents =
        std::fs::read(input_file).with_context(|| format!("Failed to read {:?}", input_file))?;
    let mut gpx = read_gpx_from_slice(&contents)
        .with_context(|| format!("Failed to parse {:?}", input_file))?;
    gpx.filename = Some(input_file.to_owned());
    info!(
        "Read {} tracks with {} trackpoints from {:?}",
        gpx.tracks.len(),
        gpx.num_points(),
        input_file
    );
    Ok(gpx)
}

pub fn read_gpx_from_slice(data: &[u8]) -> Result<Gpx> {
    let xml_reader = Reader::from_reader(data);
    read_gpx_from_reader(xml_reader)
}

pub fn read_gpx_from_reader(mut xml_reader: Reader<&[u8]>) -> Result<Gpx> {
    let mut gpx: Option<Gpx> = None;

    loop {
        match xml_reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"gpx" => {
                    let attrs = parse_gpx_attributes(&e, &xml_reader)?;
                    let mut partial_gpx = parse_gpx(&mut xml_reader)?;
                    partial_gpx.creator = attrs.creator;
                    partial_gpx.version = attrs.version;
                    gpx = Some(partial_gpx);
                }
                other => bail!(
                    "Unexpected Start element {:?}",
                    xml_reader.bytes_to_cow(other)
                ),
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"gpx" => {
                    let attrs = parse_gpx_attributes(&e, &xml_reader)?;
                    gpx = Some(Gpx {
                        creator: attrs.creator,
                        version: attrs.version,
                        ..Default::default()
                    });
                }
                _ => (),
            },
            Ok(Event::Eof) => {
                // We should already have consumed the closing '</gpx>' tag in parse_gpx().
                // So the next thing will be EOF.
                return gpx.context("Did not find the 'gpx' element");
            }
            Err(e) => bail!("Error at position {}: {:?}", xml_reader.error_position(), e),
            _ => (),
        }
    }
}

/// Parses a GPX timestamp. These should be RFC 3339, but some devices omit
/// the zone designator; such times are taken to be UTC.
pub fn parse_gpx_time(value: &str) -> Result<OffsetDateTime> {
    let value = value.trim();
    if let Ok(t) = OffsetDateTime::parse(value, &well_known::Rfc3339) {
        return Ok(t);
    }

    let t = PrimitiveDateTime::parse(value, &well_known::Iso8601::DEFAULT)
        .with_context(|| format!("Could not parse {:?} as a time", value))?;
    Ok(t.assume_utc())
}

pub(crate) trait XmlReaderConversions {
    fn bytes_to_cow<'a, 'b>(&'a self, bytes: &'b [u8]) -> Result<Cow<'b, str>>;
    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String>;
    fn cow_to_string(&self, bytes: Cow<'_, [u8]>) -> Result<String>;
}

impl<R> XmlReaderConversions for Reader<R> {
    #[inline]
    fn bytes_to_cow<'a, 'b>(&'a self, bytes: &'b [u8]) -> Result<Cow<'b, str>> {
        Ok(self.decoder().decode(bytes)?)
    }

    #[inline]
    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String> {
        // Ensure everything goes through decode().
        Ok(self.bytes_to_cow(bytes)?.into())
    }

    #[inline]
    fn cow_to_string(&self, bytes: Cow<'_, [u8]>) -> Result<String> {
        match bytes {
            // Ensure everything goes through decode().
            Cow::Borrowed(slice) => Ok(self.bytes_to_string(slice)?),
            Cow::Owned(vec) => Ok(self.bytes_to_string(&vec)?),
        }
    }
}

pub(crate) trait XmlReaderExtensions {
    fn read_inner_as_string(&mut self) -> Result<String>;
    fn read_inner_as_time(&mut self) -> Result<OffsetDateTime>;
    fn read_inner_as<T: FromStr>(&mut self) -> Result<T>;
    fn skip_element(&mut self, start: &BytesStart<'_>) -> Result<()>;
}

impl XmlReaderExtensions for Reader<&[u8]> {
    /// Reads the 'INNER TEXT' from a tag such as <tag>INNER TEXT</tag>.
    /// An element with no content, <tag></tag>, gives an empty string.
    #[inline]
    fn read_inner_as_string(&mut self) -> Result<String> {
        match self.read_event() {
            Ok(Event::Text(text)) => Ok(text.unescape()?.into_owned()),
            Ok(Event::CData(cdata)) => Ok(self.bytes_to_string(&cdata)?),
            Ok(Event::End(_)) => Ok(String::new()),
            e => bail!(
                "Got unexpected XML element {:?} (was expecting Event::Text), this is either a bug or the document is corrupt",
                e
            ),
        }
    }

    #[inline]
    fn read_inner_as_time(&mut self) -> Result<OffsetDateTime> {
        let t = self.read_inner_as_string()?;
        parse_gpx_time(&t)
    }

    #[inline]
    fn read_inner_as<T: FromStr>(&mut self) -> Result<T> {
        let t = self.read_inner_as_string()?;

        match t.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => bail!("Could not parse {:?} into {}", t, std::any::type_name::<T>()),
        }
    }

    /// Consumes everything up to and including the end tag matching `start`.
    /// Used for elements we don't report on, such as links and extensions.
    #[inline]
    fn skip_element(&mut self, start: &BytesStart<'_>) -> Result<()> {
        self.read_to_end(start.name())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="Garmin Connect" xmlns="http://www.topografix.com/GPX/1/1">
  <metadata>
    <name>Laramie Enduro 2014</name>
    <link href="connect.garmin.com"><text>Garmin Connect</text></link>
    <time>2014-07-26T05:59:00Z</time>
  </metadata>
  <trk>
    <name>Laramie Enduro &amp; friends</name>
    <type>cycling</type>
    <trkseg>
      <trkpt lat="41.3100" lon="-105.5900">
        <ele>2200.0</ele>
        <time>2014-07-26T06:00:00Z</time>
        <extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>120</gpxtpx:hr></gpxtpx:TrackPointExtension></extensions>
      </trkpt>
      <trkpt lat="41.3110" lon="-105.5910">
        <time>2014-07-26T06:00:10.500Z</time>
        <ele> 2201.5 </ele>
      </trkpt>
      <trkpt lat="41.3120" lon="-105.5920"/>
    </trkseg>
    <trkseg>
      <trkpt lat="41.3130" lon="-105.5930"><ele>2203</ele><time>2014-07-26T06:00:30</time></trkpt>
    </trkseg>
  </trk>
  <trk>
    <trkseg/>
  </trk>
</gpx>
"#;

    #[test]
    fn reads_tracks_segments_and_points() {
        let gpx = read_gpx_from_slice(SAMPLE.as_bytes()).unwrap();

        assert_eq!(gpx.creator, "Garmin Connect");
        assert_eq!(gpx.version, "1.1");
        assert_eq!(gpx.metadata.name.as_deref(), Some("Laramie Enduro 2014"));
        assert_eq!(gpx.metadata.time, Some(datetime!(2014-07-26 05:59 UTC)));

        assert_eq!(gpx.tracks.len(), 2);
        let track = &gpx.tracks[0];
        assert_eq!(track.name.as_deref(), Some("Laramie Enduro & friends"));
        assert_eq!(track.r#type.as_deref(), Some("cycling"));
        assert_eq!(track.segments.len(), 2);
        assert_eq!(track.segments[0].points.len(), 3);
        assert_eq!(gpx.num_points(), 4);
        assert_eq!(gpx.tracks[1].segments.len(), 1);
        assert!(gpx.tracks[1].segments[0].points.is_empty());
    }

    #[test]
    fn reads_point_fields_in_either_order() {
        let gpx = read_gpx_from_slice(SAMPLE.as_bytes()).unwrap();
        let points = &gpx.tracks[0].segments[0].points;

        assert_eq!(points[0].lat, 41.31);
        assert_eq!(points[0].lon, -105.59);
        assert_eq!(points[0].ele, Some(2200.0));
        assert_eq!(points[0].time, Some(datetime!(2014-07-26 06:00 UTC)));

        assert_eq!(points[1].ele, Some(2201.5));
        assert_eq!(
            points[1].time,
            Some(datetime!(2014-07-26 06:00:10.5 UTC))
        );

        // Self-closing point has neither.
        assert_eq!(points[2].ele, None);
        assert_eq!(points[2].time, None);

        // No zone designator, assumed to be UTC.
        let last = &gpx.tracks[0].segments[1].points[0];
        assert_eq!(last.time, Some(datetime!(2014-07-26 06:00:30 UTC)));
    }

    #[test]
    fn missing_lat_is_an_error() {
        let doc = r#"<gpx version="1.1" creator="x"><trk><trkseg>
            <trkpt lon="1.0"><ele>1</ele></trkpt>
            </trkseg></trk></gpx>"#;
        let err = read_gpx_from_slice(doc.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("lat"));
    }

    #[test]
    fn bad_number_is_an_error() {
        let doc = r#"<gpx version="1.1" creator="x"><trk><trkseg>
            <trkpt lat="1.0" lon="1.0"><ele>high</ele></trkpt>
            </trkseg></trk></gpx>"#;
        assert!(read_gpx_from_slice(doc.as_bytes()).is_err());
    }

    #[test]
    fn bad_time_is_an_error() {
        let doc = r#"<gpx version="1.1" creator="x"><trk><trkseg>
            <trkpt lat="1.0" lon="1.0"><time>yesterday</time></trkpt>
            </trkseg></trk></gpx>"#;
        assert!(read_gpx_from_slice(doc.as_bytes()).is_err());
    }

    #[test]
    fn self_closing_track_is_kept() {
        let doc = r#"<gpx version="1.1" creator="x">
            <wpt lat="1.0" lon="1.0"/>
            <trk/>
            <trk><name>Second</name></trk>
            </gpx>"#;
        let gpx = read_gpx_from_slice(doc.as_bytes()).unwrap();

        assert_eq!(gpx.tracks.len(), 2);
        assert_eq!(gpx.tracks[0].name, None);
        assert!(gpx.tracks[0].segments.is_empty());
        assert_eq!(gpx.tracks[1].name.as_deref(), Some("Second"));
        // An empty track has no time bounds, so it can't be summarised.
        assert!(crate::summary::summarise_gpx(&gpx).is_err());
    }

    #[test]
    fn truncated_document_is_an_error() {
        let doc = r#"<gpx version="1.1" creator="x"><trk><trkseg>
            <trkpt lat="1.0" lon="1.0">"#;
        assert!(read_gpx_from_slice(doc.as_bytes()).is_err());
    }

    #[test]
    fn document_without_gpx_is_an_error() {
        assert!(read_gpx_from_slice(b"<?xml version=\"1.0\"?>").is_err());
        assert!(read_gpx_from_slice(b"<kml></kml>").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_gpx_from_file("/definitely/not/here.gpx").unwrap_err();
        assert!(format!("{err:#}").contains("here.gpx"));
    }

    #[test]
    fn gpx_times() {
        assert_eq!(
            parse_gpx_time("2014-07-26T06:00:00Z").unwrap(),
            datetime!(2014-07-26 06:00 UTC)
        );
        assert_eq!(
            parse_gpx_time("2014-07-26T08:00:00+02:00").unwrap(),
            datetime!(2014-07-26 06:00 UTC)
        );
        assert!(parse_gpx_time("06:00:00").is_err());
    }
}
